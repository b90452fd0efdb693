//! SVG import.
//!
//! Recovers the ordered geometry updates from an edited drawing. Only
//! `<rect>` elements carrying a back-reference count as layout data;
//! anything else a hand edit left behind is annotation, reported and
//! skipped. A resized canvas is surfaced, never silently rescaled:
//! resizing is an edit of the declared reference resolution.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use wndkit_model::{
    BackRef, Canvas, ConversionReport, DescriptorKind, GeometryUpdate, ImportedDrawing, Point,
    Rect, WarningKind,
};
use wndkit_transform::round_coordinate;

use crate::emit::{ATTR_ANCHOR, ATTR_CANVAS, ATTR_DIGEST, ATTR_INDEX, ATTR_KIND, ATTR_NAME};
use crate::error::{DrawingError, Result};

/// Parse an SVG drawing back into geometry updates.
pub fn import(svg: &str) -> Result<ImportedDrawing> {
    let mut reader = Reader::from_str(svg);
    let mut report = ConversionReport::new();
    let mut updates: Vec<GeometryUpdate> = Vec::new();
    let mut root: Option<RootInfo> = None;
    let mut rect_count = 0usize;

    loop {
        match reader.read_event() {
            Err(error) => {
                return Err(DrawingError::invalid(format!(
                    "XML error at byte {}: {error}",
                    reader.buffer_position()
                )));
            }
            Ok(Event::Eof) => break,
            Ok(Event::Start(element)) | Ok(Event::Empty(element)) => {
                match element.local_name().as_ref() {
                    b"svg" => {
                        if root.is_none() {
                            root = Some(parse_root(&element)?);
                        }
                    }
                    b"rect" => {
                        rect_count += 1;
                        collect_rect(&element, rect_count, &mut updates, &mut report)?;
                    }
                    _ => {}
                }
            }
            Ok(_) => {}
        }
    }

    let root = root.ok_or(DrawingError::MissingCanvas)?;
    if root.canvas != root.emitted_canvas {
        report.push(
            WarningKind::CanvasResized,
            "drawing",
            format!("{} -> {}", root.emitted_canvas, root.canvas),
        );
    }

    debug!(
        updates = updates.len(),
        canvas = %root.canvas,
        warnings = report.len(),
        "imported drawing"
    );
    Ok(ImportedDrawing {
        kind: root.kind,
        canvas: root.canvas,
        emitted_canvas: root.emitted_canvas,
        anchor: root.anchor,
        updates,
        report,
    })
}

struct RootInfo {
    kind: DescriptorKind,
    canvas: Canvas,
    emitted_canvas: Canvas,
    anchor: Point,
}

fn parse_root(element: &BytesStart<'_>) -> Result<RootInfo> {
    let attrs = read_attributes(element)?;

    let canvas = canvas_from_dimensions(&attrs)
        .or_else(|| canvas_from_view_box(&attrs))
        .ok_or(DrawingError::MissingCanvas)?;

    let emitted_canvas = attr(&attrs, ATTR_CANVAS)
        .and_then(parse_pair)
        .map(|(w, h)| Canvas::new(w.max(0) as u32, h.max(0) as u32))
        .unwrap_or(canvas);

    let anchor = attr(&attrs, ATTR_ANCHOR)
        .and_then(parse_pair)
        .map(|(x, y)| Point::new(x, y))
        .unwrap_or(Point::ORIGIN);

    let kind = attr(&attrs, ATTR_KIND)
        .and_then(|value| value.parse().ok())
        .unwrap_or(DescriptorKind::Wnd);

    Ok(RootInfo {
        kind,
        canvas,
        emitted_canvas,
        anchor,
    })
}

fn collect_rect(
    element: &BytesStart<'_>,
    ordinal: usize,
    updates: &mut Vec<GeometryUpdate>,
    report: &mut ConversionReport,
) -> Result<()> {
    let attrs = read_attributes(element)?;
    let subject = attr(&attrs, "id")
        .map(ToString::to_string)
        .unwrap_or_else(|| format!("rect#{ordinal}"));

    let backref = match (
        attr(&attrs, ATTR_INDEX).and_then(|v| v.parse::<usize>().ok()),
        attr(&attrs, ATTR_DIGEST),
    ) {
        (Some(index), Some(digest)) => BackRef {
            index,
            digest: digest.to_string(),
        },
        _ => {
            report.push(
                WarningKind::UnlinkedShape,
                subject,
                "no back-reference, treating as annotation",
            );
            return Ok(());
        }
    };

    let (Some(w), Some(h)) = (pixels(&attrs, "width"), pixels(&attrs, "height")) else {
        report.push(
            WarningKind::UnlinkedShape,
            subject,
            "back-reference without width/height, treating as annotation",
        );
        return Ok(());
    };
    let x = pixels(&attrs, "x").unwrap_or(0);
    let y = pixels(&attrs, "y").unwrap_or(0);

    let name = attr(&attrs, ATTR_NAME)
        .map(ToString::to_string)
        .unwrap_or_else(|| subject.trim_end_matches("_rect").to_string());

    updates.push(GeometryUpdate {
        backref,
        name,
        rect: Rect::new(x, y, w, h),
    });
    Ok(())
}

fn read_attributes(element: &BytesStart<'_>) -> Result<Vec<(String, String)>> {
    let mut out = Vec::new();
    for attribute in element.attributes() {
        let attribute =
            attribute.map_err(|e| DrawingError::invalid(format!("bad attribute: {e}")))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|e| DrawingError::invalid(format!("bad attribute value: {e}")))?
            .into_owned();
        out.push((key, value));
    }
    Ok(out)
}

fn attr<'a>(attrs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

/// Read a pixel-valued attribute, tolerating a `px` suffix and floats.
fn pixels(attrs: &[(String, String)], name: &str) -> Option<i32> {
    let raw = attr(attrs, name)?;
    let trimmed = raw.trim().trim_end_matches("px").trim();
    trimmed.parse::<f64>().ok().map(round_coordinate)
}

fn canvas_from_dimensions(attrs: &[(String, String)]) -> Option<Canvas> {
    let w = pixels(attrs, "width")?;
    let h = pixels(attrs, "height")?;
    if w <= 0 || h <= 0 {
        return None;
    }
    Some(Canvas::new(w as u32, h as u32))
}

fn canvas_from_view_box(attrs: &[(String, String)]) -> Option<Canvas> {
    let raw = attr(attrs, "viewBox")?;
    let parts: Vec<f64> = raw
        .split_whitespace()
        .filter_map(|p| p.parse().ok())
        .collect();
    if parts.len() != 4 {
        return None;
    }
    let w = round_coordinate(parts[2]);
    let h = round_coordinate(parts[3]);
    if w <= 0 || h <= 0 {
        return None;
    }
    Some(Canvas::new(w as u32, h as u32))
}

/// Parse the `"<a> <b>"` pairs the emitter records.
fn parse_pair(raw: &str) -> Option<(i32, i32)> {
    let mut parts = raw.split_whitespace();
    let a = parts.next()?.parse().ok()?;
    let b = parts.next()?.parse().ok()?;
    Some((a, b))
}
