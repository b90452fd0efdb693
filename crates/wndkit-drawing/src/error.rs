//! Error types for drawing emission and import.

use thiserror::Error;

/// Errors raised while producing or reading an SVG drawing.
#[derive(Debug, Error)]
pub enum DrawingError {
    /// The drawing is not usable XML/SVG.
    #[error("invalid drawing: {reason}")]
    InvalidDrawing { reason: String },

    /// The drawing declares no usable canvas size (neither
    /// width/height nor a viewBox).
    #[error("drawing declares no canvas size")]
    MissingCanvas,

    /// Serializing the drawing failed.
    #[error("failed to write drawing: {reason}")]
    WriteFailed { reason: String },
}

/// Result type alias for drawing operations.
pub type Result<T> = std::result::Result<T, DrawingError>;

impl DrawingError {
    /// Create an InvalidDrawing error.
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidDrawing {
            reason: reason.into(),
        }
    }

    /// Create a WriteFailed error.
    pub fn write_failed(reason: impl std::fmt::Display) -> Self {
        Self::WriteFailed {
            reason: reason.to_string(),
        }
    }
}
