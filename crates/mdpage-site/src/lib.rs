//! Single-page HTML builder for mdpage.
//!
//! [`PageBuilder`] runs the whole pipeline for one configured source file:
//! extract the marked region, rewrite diagram fences, render Markdown,
//! post-process the fragment, then either wrap it in a [`PageTemplate`] or
//! splice it into a section of an existing page.

mod builder;
mod template;

pub use builder::{BuildError, BuildOutcome, PageBuilder, RenderedPage};
pub use template::{PageTemplate, TITLE_PLACEHOLDER};
