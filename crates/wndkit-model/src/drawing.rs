//! Join metadata between drawing shapes and descriptor elements.
//!
//! Shapes carry a synthetic back-reference assigned at emission time:
//! the element's index in the original sequence plus a digest of its
//! pre-edit identity. Names are not a join key (they may collide) and
//! positions are not a join key (they are what gets edited).

use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};

use crate::descriptor::DescriptorKind;
use crate::geometry::{Canvas, Point, Rect};
use crate::report::ConversionReport;

/// Hex digest of an element's pre-edit identity, truncated to 16 chars.
///
/// The rectangle is deliberately excluded so a drawing can be applied
/// again after an earlier merge moved the element.
pub fn identity_digest(kind: DescriptorKind, index: usize, name: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(kind.as_str().as_bytes());
    hasher.update(b"|");
    hasher.update(index.to_string().as_bytes());
    hasher.update(b"|");
    hasher.update(name.as_bytes());
    let digest = hasher.finalize();
    hex::encode(&digest[..8])
}

/// Stable link from a drawing shape back to its source element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackRef {
    pub index: usize,
    pub digest: String,
}

impl BackRef {
    pub fn new(kind: DescriptorKind, index: usize, name: &str) -> Self {
        Self {
            index,
            digest: identity_digest(kind, index, name),
        }
    }

    /// True when this reference was minted for the given element
    /// identity.
    pub fn matches(&self, kind: DescriptorKind, name: &str) -> bool {
        self.digest == identity_digest(kind, self.index, name)
    }
}

/// A geometry edit recovered from a drawing, in drawing space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeometryUpdate {
    pub backref: BackRef,
    /// Shape name as recorded in the drawing; informational, and the
    /// element name when synthesizing a fresh descriptor.
    pub name: String,
    pub rect: Rect,
}

/// A parsed drawing plus everything recorded at emission time.
#[derive(Debug, Clone)]
pub struct ImportedDrawing {
    pub kind: DescriptorKind,
    /// The drawing's own size, possibly edited by the user.
    pub canvas: Canvas,
    /// Canvas recorded when the drawing was emitted.
    pub emitted_canvas: Canvas,
    /// Anchor recorded when the drawing was emitted.
    pub anchor: Point,
    /// Updates in document order.
    pub updates: Vec<GeometryUpdate>,
    pub report: ConversionReport,
}

impl ImportedDrawing {
    /// True when the drawing was resized after emission.
    pub fn canvas_resized(&self) -> bool {
        self.canvas != self.emitted_canvas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_stable_and_distinct() {
        let a = identity_digest(DescriptorKind::Wnd, 0, "ButtonOptions");
        let b = identity_digest(DescriptorKind::Wnd, 0, "ButtonOptions");
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);

        assert_ne!(a, identity_digest(DescriptorKind::Wnd, 1, "ButtonOptions"));
        assert_ne!(a, identity_digest(DescriptorKind::Wnd, 0, "ButtonExit"));
        assert_ne!(a, identity_digest(DescriptorKind::Scheme, 0, "ButtonOptions"));
    }

    #[test]
    fn backref_matches_its_identity() {
        let backref = BackRef::new(DescriptorKind::Scheme, 3, "ImagePart");
        assert!(backref.matches(DescriptorKind::Scheme, "ImagePart"));
        assert!(!backref.matches(DescriptorKind::Scheme, "MoneyDisplay"));
        assert!(!backref.matches(DescriptorKind::Wnd, "ImagePart"));
    }
}
