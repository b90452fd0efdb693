//! SVG emission.
//!
//! One `<g>` per element, holding the geometry-bearing `<rect>` and any
//! resolved image decorations. The rect's stored geometry is always the
//! element's own rectangle in drawing space; atlas rectangles ride
//! along as data attributes for the editor, never as geometry.
//!
//! Emission is deterministic: the same inputs produce byte-identical
//! output. Fill colors come from the shape's identity digest, not an
//! RNG.

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use tracing::{debug, warn};

use wndkit_atlas::AtlasRegistry;
use wndkit_model::{BackRef, Canvas, ConversionReport, EmitSource, Rect, WarningKind};
use wndkit_transform::to_drawing_space;

use crate::error::{DrawingError, Result};

pub(crate) const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Inert metadata attributes joining the drawing back to the
/// descriptor.
pub(crate) const ATTR_KIND: &str = "data-wnd-kind";
pub(crate) const ATTR_CANVAS: &str = "data-wnd-canvas";
pub(crate) const ATTR_ANCHOR: &str = "data-wnd-anchor";
pub(crate) const ATTR_INDEX: &str = "data-wnd-index";
pub(crate) const ATTR_DIGEST: &str = "data-wnd-digest";
pub(crate) const ATTR_NAME: &str = "data-wnd-name";
pub(crate) const ATTR_TEXTURE: &str = "data-wnd-texture";
pub(crate) const ATTR_ATLAS: &str = "data-wnd-atlas";

/// The button state shown by default.
const VISIBLE_STATE: &str = "Enable";

const STYLE: &str = "rect { stroke: none; } \
                     text { font-family: Arial, sans-serif; font-size: 10px; fill: black; \
                     text-anchor: middle; dominant-baseline: middle; pointer-events: none; }";

/// An emitted drawing plus the recoverable conditions hit on the way.
#[derive(Debug)]
pub struct EmittedDrawing {
    pub svg: String,
    pub report: ConversionReport,
}

/// Serialize a descriptor view into an SVG drawing.
///
/// The canvas defaults to the descriptor's declared reference
/// resolution. Unresolvable image references degrade to fill-less
/// shapes and a warning; they never abort the emission.
pub fn emit(
    source: &EmitSource,
    atlas: &AtlasRegistry,
    canvas_override: Option<Canvas>,
) -> Result<EmittedDrawing> {
    let canvas = canvas_override.unwrap_or(source.resolution);
    let mut report = ConversionReport::new();
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    let width = canvas.width.to_string();
    let height = canvas.height.to_string();
    let view_box = format!("0 0 {} {}", canvas.width, canvas.height);
    let canvas_record = format!("{} {}", canvas.width, canvas.height);
    let anchor_record = source.anchor.to_string();

    let mut root = BytesStart::new("svg");
    root.push_attribute(("width", width.as_str()));
    root.push_attribute(("height", height.as_str()));
    root.push_attribute(("viewBox", view_box.as_str()));
    root.push_attribute(("xmlns", SVG_NS));
    root.push_attribute((ATTR_KIND, source.kind.as_str()));
    root.push_attribute((ATTR_CANVAS, canvas_record.as_str()));
    root.push_attribute((ATTR_ANCHOR, anchor_record.as_str()));
    writer
        .write_event(Event::Start(root))
        .map_err(DrawingError::write_failed)?;

    writer
        .write_event(Event::Start(BytesStart::new("style")))
        .map_err(DrawingError::write_failed)?;
    writer
        .write_event(Event::Text(BytesText::new(STYLE)))
        .map_err(DrawingError::write_failed)?;
    writer
        .write_event(Event::End(BytesEnd::new("style")))
        .map_err(DrawingError::write_failed)?;

    for node in &source.nodes {
        let rect = to_drawing_space(node.rect, source.anchor);
        let backref = BackRef::new(source.kind, node.index, &node.name);

        let mut group = BytesStart::new("g");
        group.push_attribute(("id", node.name.as_str()));
        writer
            .write_event(Event::Start(group))
            .map_err(DrawingError::write_failed)?;

        let mut decorated = false;
        if node.states.is_empty() {
            if let Some(image) = &node.image {
                decorated = write_image(&mut writer, atlas, &mut report, node.name.as_str(), None, image, rect)?;
            }
        } else {
            for (state, image) in &node.states {
                let shown = write_image(
                    &mut writer,
                    atlas,
                    &mut report,
                    node.name.as_str(),
                    Some(state.as_str()),
                    image,
                    rect,
                )?;
                decorated = decorated || (shown && state == VISIBLE_STATE);
            }
        }

        if !decorated {
            write_label(&mut writer, node.name.as_str(), rect)?;
        }

        write_shape_rect(&mut writer, node.name.as_str(), &backref, rect)?;

        writer
            .write_event(Event::End(BytesEnd::new("g")))
            .map_err(DrawingError::write_failed)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("svg")))
        .map_err(DrawingError::write_failed)?;

    let mut svg = String::from_utf8(writer.into_inner())
        .map_err(|e| DrawingError::write_failed(format!("drawing is not UTF-8: {e}")))?;
    svg.push('\n');

    debug!(
        shapes = source.nodes.len(),
        %canvas,
        warnings = report.len(),
        "emitted drawing"
    );
    Ok(EmittedDrawing { svg, report })
}

/// Emit one `<image>` decoration. Returns whether the image resolved.
fn write_image(
    writer: &mut Writer<Vec<u8>>,
    atlas: &AtlasRegistry,
    report: &mut ConversionReport,
    name: &str,
    state: Option<&str>,
    image: &str,
    rect: Rect,
) -> Result<bool> {
    let resolved = match atlas.resolve(image) {
        Ok(resolved) => resolved,
        Err(error) => {
            warn!(element = name, image, "image reference did not resolve");
            report.push(WarningKind::UnresolvedImageReference, name, error.to_string());
            return Ok(false);
        }
    };

    let id = match state {
        Some(state) => format!("{name}_{state}"),
        None => format!("{name}_image"),
    };
    let href = format!("images/{image}.png");
    let x = rect.x.to_string();
    let y = rect.y.to_string();
    let w = rect.w.to_string();
    let h = rect.h.to_string();
    let atlas_rect = format!(
        "{} {} {} {}",
        resolved.rect.left, resolved.rect.top, resolved.rect.right, resolved.rect.bottom
    );

    let mut element = BytesStart::new("image");
    element.push_attribute(("id", id.as_str()));
    element.push_attribute(("href", href.as_str()));
    element.push_attribute(("x", x.as_str()));
    element.push_attribute(("y", y.as_str()));
    element.push_attribute(("width", w.as_str()));
    element.push_attribute(("height", h.as_str()));
    if let Some(state) = state {
        let visibility = if state == VISIBLE_STATE {
            "visible"
        } else {
            "hidden"
        };
        element.push_attribute(("visibility", visibility));
    }
    element.push_attribute((ATTR_TEXTURE, resolved.texture));
    element.push_attribute((ATTR_ATLAS, atlas_rect.as_str()));
    writer
        .write_event(Event::Empty(element))
        .map_err(DrawingError::write_failed)?;
    Ok(true)
}

/// Centered name label for shapes with no visible image.
fn write_label(writer: &mut Writer<Vec<u8>>, name: &str, rect: Rect) -> Result<()> {
    let center = rect.center();
    let x = center.x.to_string();
    let y = center.y.to_string();
    let mut element = BytesStart::new("text");
    element.push_attribute(("x", x.as_str()));
    element.push_attribute(("y", y.as_str()));
    writer
        .write_event(Event::Start(element))
        .map_err(DrawingError::write_failed)?;
    writer
        .write_event(Event::Text(BytesText::new(name)))
        .map_err(DrawingError::write_failed)?;
    writer
        .write_event(Event::End(BytesEnd::new("text")))
        .map_err(DrawingError::write_failed)?;
    Ok(())
}

/// The geometry-bearing rectangle with its back-reference.
fn write_shape_rect(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    backref: &BackRef,
    rect: Rect,
) -> Result<()> {
    let id = format!("{name}_rect");
    let x = rect.x.to_string();
    let y = rect.y.to_string();
    let w = rect.w.to_string();
    let h = rect.h.to_string();
    let fill = format!("#{}", &backref.digest[..6]);
    let index = backref.index.to_string();

    let mut element = BytesStart::new("rect");
    element.push_attribute(("id", id.as_str()));
    element.push_attribute(("x", x.as_str()));
    element.push_attribute(("y", y.as_str()));
    element.push_attribute(("width", w.as_str()));
    element.push_attribute(("height", h.as_str()));
    element.push_attribute(("fill", fill.as_str()));
    element.push_attribute(("fill-opacity", "0.25"));
    element.push_attribute((ATTR_INDEX, index.as_str()));
    element.push_attribute((ATTR_DIGEST, backref.digest.as_str()));
    element.push_attribute((ATTR_NAME, name));
    writer
        .write_event(Event::Empty(element))
        .map_err(DrawingError::write_failed)?;
    Ok(())
}
