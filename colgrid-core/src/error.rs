use thiserror::Error;

use crate::types::CutoffKind;

/// Configuration errors raised while editing or validating a layout.
///
/// These are rejected synchronously before any fragment is processed and
/// are never silently corrected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("invalid boundary for column '{name}': {reason}")]
    InvalidBoundary { name: String, reason: String },

    #[error("a column named '{0}' already exists")]
    DuplicateName(String),

    #[error("column '{0}' not found")]
    NotFound(String),

    #[error("index {index} is out of range for {len} columns")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("invalid {kind} cutoff: ymin ({ymin}) must be less than ymax ({ymax})")]
    InvalidCutoff { kind: CutoffKind, ymin: f64, ymax: f64 },

    #[error("no columns defined; add at least one column boundary before extracting")]
    NoColumns,
}

impl LayoutError {
    pub(crate) fn invalid_boundary(name: &str, reason: impl Into<String>) -> Self {
        LayoutError::InvalidBoundary {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors that abort an extraction run. A run that fails returns no
/// partial table.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("page {0} is not present in the document")]
    UnknownPage(u32),

    #[error("invalid extraction config: {0}")]
    InvalidConfig(String),
}
