//! Error types for HTML processing.

/// Error while tokenizing or splicing HTML.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum HtmlError {
    /// Markup could not be tokenized.
    #[error("HTML parse error")]
    Xml(#[from] quick_xml::Error),

    /// Encoding error while decoding names or text.
    #[error("encoding error")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    /// The target section was opened but never closed.
    #[error("<{tag} id=\"{id}\"> has no closing tag")]
    UnclosedSection {
        /// Section tag name.
        tag: String,
        /// Section id.
        id: String,
    },

    /// A reader offset does not fit the input.
    #[error("reader offset {0} out of range")]
    Offset(u64),
}
