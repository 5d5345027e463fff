//! HTML fragment post-processing and section splicing.
//!
//! Rendered fragments are parsed into a [`TreeNode`] tree with quick-xml,
//! adjusted by [`HtmlPostProcessor`] and serialized back. Edits are
//! attribute-only: element structure and text content are preserved.
//!
//! [`replace_section_content`] splices a fragment into one section of an
//! existing HTML page, leaving every byte outside that section untouched.

mod entities;
mod error;
mod parser;
mod post_process;
mod raw_text;
mod section;
mod serializer;
mod tree;

pub use error::HtmlError;
pub use parser::HtmlParser;
pub use post_process::{HtmlPostProcessor, PostProcessConfig, PostProcessReport};
pub use section::{SectionSelector, SectionSplice, replace_section_content};
pub use serializer::HtmlSerializer;
pub use tree::TreeNode;
