//! Error types for descriptor parsing.

use thiserror::Error;

/// Errors raised while parsing a descriptor file.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Required geometry is absent or non-numeric, or block nesting is
    /// unbalanced. Fatal for the conversion.
    #[error("malformed descriptor at line {line}: {reason}")]
    MalformedDescriptor { line: usize, reason: String },

    /// The requested scheme section does not exist in the file.
    #[error("control bar scheme section not found: {section}")]
    SectionNotFound { section: String },
}

/// Result type alias for descriptor parsing.
pub type Result<T> = std::result::Result<T, IngestError>;

impl IngestError {
    /// Create a MalformedDescriptor error (1-based line number).
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedDescriptor {
            line,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_names_the_line() {
        let err = IngestError::malformed(12, "SCREENRECT outside WINDOW");
        assert_eq!(
            format!("{err}"),
            "malformed descriptor at line 12: SCREENRECT outside WINDOW"
        );
    }
}
