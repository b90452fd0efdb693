//! WND window layout files.
//!
//! A WND file is a tree of `WINDOW` ... `END` blocks. The parser models
//! only what the conversion needs (`SCREENRECT`, `NAME`, `WINDOWTYPE`
//! and the enabled draw image) and keeps every other line as an opaque
//! span, so style flags, callbacks and comments survive a full
//! emit/import/merge cycle untouched.

use tracing::{debug, warn};

use wndkit_model::{
    Canvas, DescriptorKind, EmitNode, EmitSource, LayoutDescriptor, Point, Rect,
};

use crate::error::{IngestError, Result};
use crate::span::{SpanBuilder, SplicedSpan, find_ci, int_after, next_int};

/// Fallback when a file declares no creation resolution.
const DEFAULT_RESOLUTION: Canvas = Canvas {
    width: 800,
    height: 600,
};

/// Draw-data entries use this sentinel for "no image".
const NO_IMAGE: &str = "NoImage";

/// Slot layout of a SCREENRECT span: UL x/y, LR x/y, then optionally
/// the creation resolution pair.
const SLOT_UL_X: usize = 0;
const SLOT_UL_Y: usize = 1;
const SLOT_LR_X: usize = 2;
const SLOT_LR_Y: usize = 3;
const SLOT_RES_W: usize = 4;
const SLOT_RES_H: usize = 5;

/// What a window declares itself to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    Window,
    Button,
    /// Any other gadget type (`STATICTEXT`, `SCROLLLISTBOX`, ...),
    /// carried as declared.
    Gadget(String),
}

impl ElementKind {
    fn from_window_type(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "USER" => ElementKind::Window,
            "PUSHBUTTON" => ElementKind::Button,
            other => ElementKind::Gadget(other.to_string()),
        }
    }
}

/// One `WINDOW` block, in document (pre-order) position.
#[derive(Debug, Clone)]
pub struct WndElement {
    pub name: String,
    pub kind: ElementKind,
    /// First enabled draw image that is not the `NoImage` sentinel.
    pub image: Option<String>,
    /// Geometry in descriptor space.
    pub rect: Rect,
    rect_span: usize,
}

#[derive(Debug)]
enum WndSpan {
    Opaque(String),
    ScreenRect(SplicedSpan),
}

/// A parsed WND file.
#[derive(Debug)]
pub struct WndDocument {
    resolution: Canvas,
    spans: Vec<WndSpan>,
    elements: Vec<WndElement>,
}

/// Parser-internal element under construction.
struct PendingElement {
    start_line: usize,
    name: Option<String>,
    kind: ElementKind,
    image: Option<String>,
    rect: Option<Rect>,
    rect_span: Option<usize>,
}

impl PendingElement {
    fn new(start_line: usize) -> Self {
        Self {
            start_line,
            name: None,
            kind: ElementKind::Window,
            image: None,
            rect: None,
            rect_span: None,
        }
    }
}

impl WndDocument {
    /// Parse WND text into a document.
    pub fn parse(input: &str) -> Result<WndDocument> {
        let lines: Vec<&str> = input.split_inclusive('\n').collect();
        let mut spans: Vec<WndSpan> = Vec::with_capacity(lines.len());
        let mut pending: Vec<PendingElement> = Vec::new();
        let mut open: Vec<usize> = Vec::new();
        let mut resolution: Option<Canvas> = None;

        let mut i = 0;
        while i < lines.len() {
            let line = lines[i];
            let trimmed = line.trim();
            let upper = trimmed.to_ascii_uppercase();

            if upper == "WINDOW" || is_window_opener(&upper) {
                let mut element = PendingElement::new(i + 1);
                if let Some(window_type) = field_value(trimmed, "WINDOWTYPE") {
                    element.kind = ElementKind::from_window_type(&window_type);
                }
                open.push(pending.len());
                pending.push(element);
                spans.push(WndSpan::Opaque(line.to_string()));
                i += 1;
                continue;
            }

            if upper == "END" {
                let idx = open.pop().ok_or_else(|| {
                    IngestError::malformed(i + 1, "END without a matching WINDOW")
                })?;
                let element = &pending[idx];
                if element.rect.is_none() {
                    return Err(IngestError::malformed(
                        element.start_line,
                        "WINDOW block has no SCREENRECT",
                    ));
                }
                if element.name.is_none() {
                    return Err(IngestError::malformed(
                        element.start_line,
                        "WINDOW block has no NAME",
                    ));
                }
                spans.push(WndSpan::Opaque(line.to_string()));
                i += 1;
                continue;
            }

            if upper.starts_with("SCREENRECT") {
                let Some(&current) = open.last() else {
                    return Err(IngestError::malformed(i + 1, "SCREENRECT outside a WINDOW"));
                };
                let start_line = i + 1;
                let (raw, consumed) = take_statement(&lines, i).ok_or_else(|| {
                    IngestError::malformed(start_line, "unterminated SCREENRECT")
                })?;
                i += consumed;
                let span = parse_screen_rect(&raw, start_line)?;
                let rect = Rect::from_corners(
                    Point::new(span.value(SLOT_UL_X) as i32, span.value(SLOT_UL_Y) as i32),
                    Point::new(span.value(SLOT_LR_X) as i32, span.value(SLOT_LR_Y) as i32),
                );
                if span.slot_count() > SLOT_RES_H && resolution.is_none() {
                    resolution = Some(Canvas::new(
                        span.value(SLOT_RES_W) as u32,
                        span.value(SLOT_RES_H) as u32,
                    ));
                }
                let element = &mut pending[current];
                element.rect = Some(rect);
                element.rect_span = Some(spans.len());
                spans.push(WndSpan::ScreenRect(span));
                continue;
            }

            if upper.starts_with("ENABLEDDRAWDATA") {
                let start_line = i + 1;
                let (raw, consumed) = take_statement(&lines, i).ok_or_else(|| {
                    IngestError::malformed(start_line, "unterminated ENABLEDDRAWDATA")
                })?;
                i += consumed;
                if let Some(&current) = open.last() {
                    if pending[current].image.is_none() {
                        pending[current].image = first_draw_image(&raw);
                    }
                }
                spans.push(WndSpan::Opaque(raw));
                continue;
            }

            if upper.starts_with("NAME") {
                if let (Some(&current), Some(name)) = (open.last(), quoted_value(trimmed)) {
                    pending[current].name = Some(name);
                }
                spans.push(WndSpan::Opaque(line.to_string()));
                i += 1;
                continue;
            }

            if upper.starts_with("WINDOWTYPE") {
                if let (Some(&current), Some(value)) =
                    (open.last(), field_value(trimmed, "WINDOWTYPE"))
                {
                    pending[current].kind = ElementKind::from_window_type(&value);
                }
                spans.push(WndSpan::Opaque(line.to_string()));
                i += 1;
                continue;
            }

            spans.push(WndSpan::Opaque(line.to_string()));
            i += 1;
        }

        if let Some(&unclosed) = open.last() {
            return Err(IngestError::malformed(
                pending[unclosed].start_line,
                "WINDOW block is never closed",
            ));
        }

        let resolution = resolution.unwrap_or_else(|| {
            warn!(
                default = %DEFAULT_RESOLUTION,
                "no CREATIONRESOLUTION declared, using default"
            );
            DEFAULT_RESOLUTION
        });

        let elements = pending
            .into_iter()
            .map(|p| WndElement {
                // Both checked at the block's END above.
                name: p.name.unwrap_or_default(),
                kind: p.kind,
                image: p.image,
                rect: p.rect.unwrap_or_default(),
                rect_span: p.rect_span.unwrap_or_default(),
            })
            .collect();

        let doc = WndDocument {
            resolution,
            spans,
            elements,
        };
        debug!(elements = doc.elements.len(), resolution = %doc.resolution, "parsed WND document");
        Ok(doc)
    }

    pub fn elements(&self) -> &[WndElement] {
        &self.elements
    }
}

impl LayoutDescriptor for WndDocument {
    fn kind(&self) -> DescriptorKind {
        DescriptorKind::Wnd
    }

    fn resolution(&self) -> Canvas {
        self.resolution
    }

    fn set_resolution(&mut self, canvas: Canvas) {
        for span in &mut self.spans {
            if let WndSpan::ScreenRect(rect_span) = span {
                if rect_span.slot_count() > SLOT_RES_H {
                    rect_span.set(SLOT_RES_W, i64::from(canvas.width));
                    rect_span.set(SLOT_RES_H, i64::from(canvas.height));
                }
            }
        }
        self.resolution = canvas;
    }

    fn anchor(&self) -> Point {
        // Window layouts place elements in absolute screen coordinates.
        Point::ORIGIN
    }

    fn node_count(&self) -> usize {
        self.elements.len()
    }

    fn node_name(&self, index: usize) -> Option<&str> {
        self.elements.get(index).map(|e| e.name.as_str())
    }

    fn apply_rect(&mut self, index: usize, rect: Rect) {
        let rect_span = self.elements[index].rect_span;
        self.elements[index].rect = rect;
        let lower_right = rect.lower_right();
        if let WndSpan::ScreenRect(span) = &mut self.spans[rect_span] {
            span.set(SLOT_UL_X, i64::from(rect.x));
            span.set(SLOT_UL_Y, i64::from(rect.y));
            span.set(SLOT_LR_X, i64::from(lower_right.x));
            span.set(SLOT_LR_Y, i64::from(lower_right.y));
        }
    }

    fn emit_source(&self) -> EmitSource {
        EmitSource {
            kind: DescriptorKind::Wnd,
            resolution: self.resolution,
            anchor: self.anchor(),
            nodes: self
                .elements
                .iter()
                .enumerate()
                .map(|(index, element)| EmitNode {
                    index,
                    name: element.name.clone(),
                    rect: element.rect,
                    image: element.image.clone(),
                    states: Vec::new(),
                })
                .collect(),
        }
    }

    fn serialize(&self) -> String {
        let mut out = String::new();
        for span in &self.spans {
            match span {
                WndSpan::Opaque(raw) => out.push_str(raw),
                WndSpan::ScreenRect(rect_span) => rect_span.render_into(&mut out),
            }
        }
        out
    }

    fn synthesize(resolution: Canvas, _anchor: Point, nodes: &[(String, Rect)]) -> Self {
        let mut spans = Vec::new();
        let mut elements = Vec::new();
        spans.push(WndSpan::Opaque("FILE_VERSION = 2;\n\n".to_string()));
        for (name, rect) in nodes {
            spans.push(WndSpan::Opaque("WINDOW WINDOWTYPE = USER;\n".to_string()));
            let rect_span = spans.len();
            spans.push(WndSpan::ScreenRect(build_screen_rect(*rect, resolution)));
            spans.push(WndSpan::Opaque(format!("  NAME = \"{name}\";\n")));
            spans.push(WndSpan::Opaque("END\n\n".to_string()));
            elements.push(WndElement {
                name: name.clone(),
                kind: ElementKind::Window,
                image: None,
                rect: *rect,
                rect_span,
            });
        }
        WndDocument {
            resolution,
            spans,
            elements,
        }
    }
}

/// `WINDOW WINDOWTYPE = USER;` style openers: `WINDOW` followed by
/// fields on the same line (but not `WINDOWTYPE` itself).
fn is_window_opener(upper: &str) -> bool {
    upper.starts_with("WINDOW ") && !upper.starts_with("WINDOWTYPE")
}

/// Collect lines from `start` until the statement's closing `;`.
/// Returns the joined text and the number of lines consumed.
fn take_statement(lines: &[&str], start: usize) -> Option<(String, usize)> {
    let mut raw = String::new();
    for (offset, line) in lines[start..].iter().enumerate() {
        raw.push_str(line);
        if line.contains(';') {
            return Some((raw, offset + 1));
        }
    }
    None
}

fn parse_screen_rect(raw: &str, line: usize) -> Result<SplicedSpan> {
    let mut slots = Vec::with_capacity(6);
    let mut cursor = 0;
    for keyword in ["UPPERLEFT", "BOTTOMRIGHT"] {
        let at = find_ci(raw, keyword, cursor).ok_or_else(|| {
            IngestError::malformed(line, format!("SCREENRECT is missing {keyword}"))
        })?;
        let x = next_int(raw, at + keyword.len()).ok_or_else(|| {
            IngestError::malformed(line, format!("{keyword} has a non-numeric X"))
        })?;
        let y = next_int(raw, x.end).ok_or_else(|| {
            IngestError::malformed(line, format!("{keyword} has a non-numeric Y"))
        })?;
        cursor = y.end;
        slots.push(x);
        slots.push(y);
    }
    // Older files omit the per-window creation resolution.
    if let Some(w) = int_after(raw, "CREATIONRESOLUTION", cursor) {
        if let Some(h) = next_int(raw, w.end) {
            slots.push(w);
            slots.push(h);
        }
    }
    Ok(SplicedSpan::new(raw.to_string(), slots))
}

fn build_screen_rect(rect: Rect, resolution: Canvas) -> SplicedSpan {
    let lower_right = rect.lower_right();
    let mut builder = SpanBuilder::new();
    builder
        .text("  SCREENRECT = UPPERLEFT: ")
        .slot(i64::from(rect.x))
        .text(" ")
        .slot(i64::from(rect.y))
        .text(",\n               BOTTOMRIGHT: ")
        .slot(i64::from(lower_right.x))
        .text(" ")
        .slot(i64::from(lower_right.y))
        .text(",\n               CREATIONRESOLUTION: ")
        .slot(i64::from(resolution.width))
        .text(" ")
        .slot(i64::from(resolution.height))
        .text(";\n");
    builder.build()
}

/// Extract `NAME = "..."` style quoted values.
fn quoted_value(line: &str) -> Option<String> {
    let open = line.find('"')?;
    let rest = &line[open + 1..];
    let close = rest.find('"')?;
    Some(rest[..close].to_string())
}

/// Extract the value of a `KEY = value;` field on a single line.
fn field_value(line: &str, key: &str) -> Option<String> {
    let at = find_ci(line, key, 0)?;
    let rest = &line[at + key.len()..];
    let eq = rest.find('=')?;
    let value = rest[eq + 1..].trim().trim_end_matches(';').trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// First `IMAGE:` reference in a draw-data statement that is not the
/// `NoImage` sentinel.
fn first_draw_image(raw: &str) -> Option<String> {
    let mut cursor = 0;
    while let Some(at) = find_ci(raw, "IMAGE:", cursor) {
        let rest = &raw[at + "IMAGE:".len()..];
        let token: String = rest
            .trim_start()
            .chars()
            .take_while(|c| !c.is_whitespace() && *c != ',' && *c != ';')
            .collect();
        cursor = at + "IMAGE:".len();
        if !token.is_empty() && token != NO_IMAGE {
            return Some(token);
        }
    }
    None
}
