//! Error types for the rendering stages.

use std::fmt;

/// Which sentinel marker an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// Marker opening the region.
    Start,
    /// Marker closing the region.
    End,
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::End => f.write_str("end"),
        }
    }
}

/// Error produced by the extraction and rewriting stages.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RenderError {
    /// A sentinel marker is absent (or the end marker does not follow the start marker).
    #[error("{kind} marker not found: {marker}")]
    MissingMarker {
        /// Which marker is missing.
        kind: MarkerKind,
        /// The marker text that was searched for.
        marker: String,
    },

    /// The diagram fence pattern could not be compiled.
    #[error("invalid diagram fence pattern")]
    Pattern(#[from] regex::Error),
}
