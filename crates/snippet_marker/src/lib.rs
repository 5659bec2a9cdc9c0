// crates/snippet_marker/src/lib.rs

//! Marker literals shared by every stage of the snippet extractor.

use thiserror::Error;

/// Default opening marker, matched exactly (after trimming the line).
pub const DEFAULT_START_MARKER: &str = "/* obsi-snip-coll start */";

/// Default closing marker, matched exactly (after trimming the line).
pub const DEFAULT_END_MARKER: &str = "/* obsi-snip-coll end */";

/// A start/end marker pair delimiting extractable blocks.
///
/// Constructed through [`MarkerPair::new`], which enforces that both markers
/// are non-empty and different from one another.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkerPair {
    start: String,
    end: String,
}

/// Reason a marker pair was rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MarkerPairError {
    #[error("start marker is empty")]
    EmptyStart,
    #[error("end marker is empty")]
    EmptyEnd,
    #[error("start and end markers are identical ('{0}')")]
    Identical(String),
}

impl MarkerPair {
    /// Builds a marker pair. Markers are stored trimmed, since lines are
    /// compared after trimming.
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Result<Self, MarkerPairError> {
        let start = start.into().trim().to_string();
        let end = end.into().trim().to_string();
        if start.is_empty() {
            return Err(MarkerPairError::EmptyStart);
        }
        if end.is_empty() {
            return Err(MarkerPairError::EmptyEnd);
        }
        if start == end {
            return Err(MarkerPairError::Identical(start));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn end(&self) -> &str {
        &self.end
    }

    /// True when `line`, trimmed, is exactly the start marker.
    pub fn is_start(&self, line: &str) -> bool {
        line.trim() == self.start
    }

    /// True when `line`, trimmed, is exactly the end marker.
    pub fn is_end(&self, line: &str) -> bool {
        line.trim() == self.end
    }
}

impl Default for MarkerPair {
    fn default() -> Self {
        Self {
            start: DEFAULT_START_MARKER.to_string(),
            end: DEFAULT_END_MARKER.to_string(),
        }
    }
}
