//! Extraction of the published region of a source document.

use crate::error::{MarkerKind, RenderError};

/// Isolates the text between two sentinel markers.
///
/// The first start marker opens the region and the first end marker after it
/// closes it. Lines whose content begins with the skip prefix are dropped,
/// and the result is trimmed.
#[derive(Debug, Clone)]
pub struct RegionExtractor {
    start_marker: String,
    end_marker: String,
    skip_prefix: Option<String>,
}

impl RegionExtractor {
    /// Create an extractor that keeps every line.
    #[must_use]
    pub fn new(start_marker: impl Into<String>, end_marker: impl Into<String>) -> Self {
        Self {
            start_marker: start_marker.into(),
            end_marker: end_marker.into(),
            skip_prefix: None,
        }
    }

    /// Drop lines whose content (ignoring leading whitespace) starts with `prefix`.
    ///
    /// An empty prefix keeps every line.
    #[must_use]
    pub fn with_skip_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.skip_prefix = (!prefix.is_empty()).then_some(prefix);
        self
    }

    /// Extract the region between the markers.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::MissingMarker`] if the start marker is absent, or
    /// if no end marker follows it.
    pub fn extract(&self, document: &str) -> Result<String, RenderError> {
        let start = document
            .find(&self.start_marker)
            .ok_or_else(|| self.missing(MarkerKind::Start))?
            + self.start_marker.len();
        let len = document[start..]
            .find(&self.end_marker)
            .ok_or_else(|| self.missing(MarkerKind::End))?;
        let region = &document[start..start + len];

        let Some(prefix) = &self.skip_prefix else {
            return Ok(region.trim().to_owned());
        };

        let mut dropped = 0usize;
        let kept: Vec<&str> = region
            .lines()
            .filter(|line| {
                let skip = line.trim_start().starts_with(prefix.as_str());
                dropped += usize::from(skip);
                !skip
            })
            .collect();
        if dropped > 0 {
            tracing::debug!(dropped, prefix = %prefix, "Dropped flagged lines");
        }

        Ok(kept.join("\n").trim().to_owned())
    }

    fn missing(&self, kind: MarkerKind) -> RenderError {
        let marker = match kind {
            MarkerKind::Start => &self.start_marker,
            MarkerKind::End => &self.end_marker,
        };
        RenderError::MissingMarker {
            kind,
            marker: marker.clone(),
        }
    }
}
