//! Error types for the merge engine.

use thiserror::Error;

/// Errors raised while merging drawing updates into a descriptor.
#[derive(Debug, Error)]
pub enum MergeError {
    /// A drawing shape references an element the descriptor does not
    /// have. The drawing and descriptor are out of sync; merging would
    /// corrupt the layout, so the whole operation fails.
    #[error("unknown target: shape #{index} ({name}) matches no descriptor element")]
    UnknownTarget { index: usize, name: String },

    /// Update mode was requested without the original descriptor.
    #[error("update mode requires the original descriptor")]
    MissingOriginal,
}

/// Result type alias for merge operations.
pub type Result<T> = std::result::Result<T, MergeError>;
