//! Markdown-to-fragment stages of the mdpage pipeline.
//!
//! Three stages run in order over a source document:
//!
//! - [`RegionExtractor`]: isolates the text between two sentinel markers and
//!   drops lines flagged as pending work
//! - [`DiagramRewriter`]: rewrites fenced diagram blocks into container
//!   elements rendered client-side
//! - [`MarkdownRenderer`]: renders the region to an HTML fragment with
//!   pulldown-cmark, keeping the rewritten diagram containers out of parsing
//!
//! # Example
//!
//! ```
//! use mdpage_renderer::{DiagramFence, DiagramRewriter, MarkdownOptions, MarkdownRenderer, RegionExtractor};
//!
//! let source = "<!-- START -->\n# Title\n```mermaid\ngraph TD; A-->B\n```\n<!-- END -->";
//! let region = RegionExtractor::new("<!-- START -->", "<!-- END -->")
//!     .extract(source)
//!     .unwrap();
//!
//! let rewriter = DiagramRewriter::new(DiagramFence::default()).unwrap();
//! let result = MarkdownRenderer::new(MarkdownOptions::default())
//!     .with_diagrams(&rewriter)
//!     .render(&region);
//! assert!(result.html.contains(r#"<div class="mermaid">"#));
//! ```

mod diagrams;
mod error;
mod extract;
mod markdown;
mod toc;

pub use diagrams::{DiagramFence, DiagramRewriter, DiagramStash};
pub use error::{MarkerKind, RenderError};
pub use extract::RegionExtractor;
pub use markdown::{MarkdownOptions, MarkdownRenderer, RenderResult};
pub use toc::{TocEntry, escape_html, slugify};
