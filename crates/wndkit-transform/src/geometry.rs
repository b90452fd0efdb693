//! Mapping between descriptor space and drawing space.
//!
//! Element placement is anchor-relative pixel offsets: the drawing puts
//! the anchor region at the origin of its coordinate system. The canvas
//! is a declared viewport, not a scale factor, so the mapping is a pure
//! translation and inverts exactly.

use wndkit_model::{Point, Rect};

/// Descriptor space to drawing space: subtract the anchor.
pub fn to_drawing_space(rect: Rect, anchor: Point) -> Rect {
    rect.translated(-anchor.x, -anchor.y)
}

/// Drawing space back to descriptor space: add the anchor.
pub fn to_descriptor_space(rect: Rect, anchor: Point) -> Rect {
    rect.translated(anchor.x, anchor.y)
}

/// Round an SVG coordinate to the nearest whole pixel. Editors write
/// floats; descriptor geometry is integral, and rounding once at the
/// boundary keeps repeated round trips from drifting.
pub fn round_coordinate(value: f64) -> i32 {
    value.round() as i32
}
