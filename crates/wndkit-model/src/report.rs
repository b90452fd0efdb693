//! Recoverable conditions collected while converting a single file.
//!
//! Fatal failures are crate-local error enums; everything the engine
//! can work around lands here and is reported alongside the result.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

/// The recoverable condition taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// An image reference matched no loaded atlas table; the shape is
    /// emitted without a fill.
    UnresolvedImageReference,
    /// A drawing shape carries no usable back-reference; treated as
    /// user annotation and dropped from the update set.
    UnlinkedShape,
    /// The drawing's canvas differs from the one recorded at emission;
    /// the declared reference resolution will be rewritten on merge.
    CanvasResized,
}

impl WarningKind {
    pub fn severity(&self) -> Severity {
        match self {
            WarningKind::CanvasResized => Severity::Info,
            WarningKind::UnresolvedImageReference | WarningKind::UnlinkedShape => {
                Severity::Warning
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WarningKind::UnresolvedImageReference => "unresolved image reference",
            WarningKind::UnlinkedShape => "unlinked shape",
            WarningKind::CanvasResized => "canvas resized",
        }
    }
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recoverable condition with the element/shape that triggered it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub severity: Severity,
    /// The element, shape, or image name involved.
    pub subject: String,
    pub message: String,
}

/// All recoverable conditions from one conversion, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionReport {
    pub warnings: Vec<Warning>,
}

impl ConversionReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        kind: WarningKind,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.warnings.push(Warning {
            kind,
            severity: kind.severity(),
            subject: subject.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn count_of(&self, kind: WarningKind) -> usize {
        self.warnings.iter().filter(|w| w.kind == kind).count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| w.severity == Severity::Warning)
            .count()
    }

    /// Absorb another report, keeping discovery order.
    pub fn extend(&mut self, other: ConversionReport) {
        self.warnings.extend(other.warnings);
    }
}
