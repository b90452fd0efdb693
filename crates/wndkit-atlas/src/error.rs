//! Error types for atlas resolution.

use thiserror::Error;

/// Errors raised while resolving mapped-image references.
#[derive(Debug, Error)]
pub enum AtlasError {
    /// No loaded table declares the referenced image. Recoverable: the
    /// caller renders the element without a fill and reports a warning.
    #[error("unresolved image reference: {name}")]
    UnresolvedImageReference { name: String },
}

/// Result type alias for atlas operations.
pub type Result<T> = std::result::Result<T, AtlasError>;
