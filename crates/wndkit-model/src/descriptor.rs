//! The descriptor-side contract shared by WND layouts and control bar
//! schemes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geometry::{Canvas, Point, Rect};

/// Which descriptor family a document (and every drawing derived from
/// it) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptorKind {
    /// A `.wnd` window layout file.
    Wnd,
    /// A `ControlBarScheme` section of an INI scheme file.
    Scheme,
}

impl DescriptorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DescriptorKind::Wnd => "wnd",
            DescriptorKind::Scheme => "scheme",
        }
    }
}

impl fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DescriptorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wnd" => Ok(DescriptorKind::Wnd),
            "scheme" => Ok(DescriptorKind::Scheme),
            other => Err(format!("unknown descriptor kind: {other}")),
        }
    }
}

/// One element or region as the drawing emitter sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitNode {
    /// Position in the document's element sequence.
    pub index: usize,
    pub name: String,
    /// Geometry in descriptor space.
    pub rect: Rect,
    /// Base mapped-image reference, if the element declares one.
    pub image: Option<String>,
    /// Per-state mapped images, enabled state last.
    pub states: Vec<(String, String)>,
}

/// Flattened, read-only view of a descriptor, ready for emission.
#[derive(Debug, Clone)]
pub struct EmitSource {
    pub kind: DescriptorKind,
    pub resolution: Canvas,
    pub anchor: Point,
    pub nodes: Vec<EmitNode>,
}

/// Uniform surface the merge engine and drawing emitter need from a
/// layout document, regardless of its on-disk format.
pub trait LayoutDescriptor {
    fn kind(&self) -> DescriptorKind;

    /// Declared reference resolution.
    fn resolution(&self) -> Canvas;

    /// Rewrite the declared reference resolution everywhere the format
    /// states it.
    fn set_resolution(&mut self, canvas: Canvas);

    /// Offset region all element positions are expressed against.
    fn anchor(&self) -> Point;

    fn node_count(&self) -> usize;

    fn node_name(&self, index: usize) -> Option<&str>;

    /// Replace the geometry of the element at `index`, in descriptor
    /// space.
    fn apply_rect(&mut self, index: usize, rect: Rect);

    /// Flatten into the emitter's view.
    fn emit_source(&self) -> EmitSource;

    /// Render back to descriptor text. Untouched input round-trips
    /// byte-for-byte.
    fn serialize(&self) -> String;

    /// Build a minimal document containing only the given nodes, in
    /// descriptor space.
    fn synthesize(resolution: Canvas, anchor: Point, nodes: &[(String, Rect)]) -> Self
    where
        Self: Sized;
}
