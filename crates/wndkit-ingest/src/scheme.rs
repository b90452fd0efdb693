//! ControlBarScheme INI sections.
//!
//! A scheme file holds one `ControlBarScheme <Name>` ... `End` section
//! per faction/resolution variant. Only the requested section is
//! modeled; every other line, sibling sections included, is an opaque
//! span and replays verbatim.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use wndkit_model::{
    Canvas, DescriptorKind, EmitNode, EmitSource, LayoutDescriptor, Point, Rect,
};

use crate::error::{IngestError, Result};
use crate::span::{SpanBuilder, SplicedSpan, int_after};

const DEFAULT_RESOLUTION: Canvas = Canvas {
    width: 800,
    height: 600,
};

/// The anchor region's block name.
const IMAGE_PART: &str = "ImagePart";

/// The button state that is shown by default in the drawing.
const ENABLE_STATE: &str = "Enable";

/// How a region's geometry is written in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RegionGeometry {
    /// `<Name>UL X: Y:` / `<Name>LR X: Y:` corner pair.
    Corners { ul: usize, lr: usize },
    /// `ImagePart` block with `Position` and `Size` lines.
    Block { position: usize, size: usize },
}

/// A named region of the scheme section.
#[derive(Debug, Clone)]
pub struct SchemeRegion {
    pub name: String,
    /// Geometry in descriptor space (absolute screen coordinates).
    pub rect: Rect,
    /// Base image declared by the `ImagePart` block.
    pub image: Option<String>,
    /// Per-state mapped images, enabled state last.
    pub states: Vec<(String, String)>,
    geometry: RegionGeometry,
}

#[derive(Debug)]
enum SchemeSpan {
    Opaque(String),
    Numbers(SplicedSpan),
}

/// One parsed `ControlBarScheme` section plus the untouched remainder
/// of its file.
#[derive(Debug)]
pub struct SchemeDocument {
    section: String,
    resolution: Canvas,
    spans: Vec<SchemeSpan>,
    regions: Vec<SchemeRegion>,
    res_span: Option<usize>,
}

/// Region under construction while scanning the section.
struct PendingRegion {
    name: String,
    image: Option<String>,
    ul: Option<(usize, Point)>,
    lr: Option<(usize, Point)>,
    position: Option<(usize, Point)>,
    size: Option<(usize, Point)>,
}

impl PendingRegion {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: None,
            ul: None,
            lr: None,
            position: None,
            size: None,
        }
    }

    fn finish(self) -> Option<SchemeRegion> {
        match (self.ul, self.lr, self.position, self.size) {
            (Some((ul_span, ul)), Some((lr_span, lr)), _, _) => Some(SchemeRegion {
                name: self.name,
                rect: Rect::from_corners(ul, lr),
                image: self.image,
                states: Vec::new(),
                geometry: RegionGeometry::Corners {
                    ul: ul_span,
                    lr: lr_span,
                },
            }),
            (_, _, Some((pos_span, pos)), Some((size_span, size))) => Some(SchemeRegion {
                name: self.name,
                rect: Rect::new(pos.x, pos.y, size.x, size.y),
                image: self.image,
                states: Vec::new(),
                geometry: RegionGeometry::Block {
                    position: pos_span,
                    size: size_span,
                },
            }),
            _ => {
                debug!(region = %self.name, "dropping region with incomplete geometry");
                None
            }
        }
    }
}

impl SchemeDocument {
    /// Parse one `ControlBarScheme` section out of a scheme file.
    pub fn parse(input: &str, section: &str) -> Result<SchemeDocument> {
        let lines: Vec<&str> = input.split_inclusive('\n').collect();
        let mut spans: Vec<SchemeSpan> = Vec::with_capacity(lines.len());
        let mut pending: Vec<PendingRegion> = Vec::new();
        let mut by_name: BTreeMap<String, usize> = BTreeMap::new();
        let mut states: Vec<(String, String, String)> = Vec::new();

        let mut found = false;
        let mut in_section = false;
        let mut in_image_part = false;
        let mut resolution: Option<Canvas> = None;
        let mut res_span: Option<usize> = None;

        for (i, line) in lines.iter().enumerate() {
            let trimmed = line.trim();
            let lower = trimmed.to_ascii_lowercase();

            if lower.starts_with("controlbarscheme") {
                let name = trimmed.split_whitespace().nth(1).unwrap_or("");
                in_section = !found && name.eq_ignore_ascii_case(section);
                if in_section {
                    found = true;
                    in_image_part = false;
                }
                spans.push(SchemeSpan::Opaque(line.to_string()));
                continue;
            }

            if !in_section || trimmed.is_empty() || trimmed.starts_with(';') {
                spans.push(SchemeSpan::Opaque(line.to_string()));
                continue;
            }

            if lower == "end" {
                if in_image_part {
                    in_image_part = false;
                } else {
                    in_section = false;
                }
                spans.push(SchemeSpan::Opaque(line.to_string()));
                continue;
            }

            if lower == "imagepart" {
                in_image_part = true;
                by_name.insert(IMAGE_PART.to_string(), pending.len());
                pending.push(PendingRegion::new(IMAGE_PART));
                spans.push(SchemeSpan::Opaque(line.to_string()));
                continue;
            }

            if in_image_part {
                let part = pending
                    .last_mut()
                    .ok_or_else(|| IngestError::malformed(i + 1, "ImagePart body without block"))?;
                if lower.starts_with("position") {
                    let (span, point) = parse_xy(line, i + 1, "Position")?;
                    part.position = Some((spans.len(), point));
                    spans.push(SchemeSpan::Numbers(span));
                } else if lower.starts_with("size") {
                    let (span, point) = parse_xy(line, i + 1, "Size")?;
                    part.size = Some((spans.len(), point));
                    spans.push(SchemeSpan::Numbers(span));
                } else {
                    if lower.starts_with("imagename") {
                        part.image = trimmed.split_whitespace().nth(1).map(String::from);
                    }
                    spans.push(SchemeSpan::Opaque(line.to_string()));
                }
                continue;
            }

            if lower.starts_with("screencreationres") {
                let (span, point) = parse_xy(line, i + 1, "ScreenCreationRes")?;
                resolution = Some(Canvas::new(point.x as u32, point.y as u32));
                res_span = Some(spans.len());
                spans.push(SchemeSpan::Numbers(span));
                continue;
            }

            let first = trimmed.split_whitespace().next().unwrap_or("");
            if let Some(name) = corner_region_name(first) {
                let (span, point) = parse_xy(line, i + 1, first)?;
                let idx = *by_name.entry(name.to_string()).or_insert_with(|| {
                    pending.push(PendingRegion::new(name));
                    pending.len() - 1
                });
                if first.ends_with("UL") {
                    pending[idx].ul = Some((spans.len(), point));
                } else {
                    pending[idx].lr = Some((spans.len(), point));
                }
                spans.push(SchemeSpan::Numbers(span));
                continue;
            }

            if let Some((name, state)) = button_state(first) {
                if let Some(image) = trimmed.split_whitespace().nth(1) {
                    states.push((name, state, image.to_string()));
                }
                spans.push(SchemeSpan::Opaque(line.to_string()));
                continue;
            }

            spans.push(SchemeSpan::Opaque(line.to_string()));
        }

        if !found {
            return Err(IngestError::SectionNotFound {
                section: section.to_string(),
            });
        }

        let mut regions: Vec<SchemeRegion> = pending
            .into_iter()
            .filter_map(PendingRegion::finish)
            .collect();
        attach_states(&mut regions, states);

        let resolution = resolution.unwrap_or_else(|| {
            warn!(
                section,
                default = %DEFAULT_RESOLUTION,
                "no ScreenCreationRes declared, using default"
            );
            DEFAULT_RESOLUTION
        });

        let doc = SchemeDocument {
            section: section.to_string(),
            resolution,
            spans,
            regions,
            res_span,
        };
        debug!(
            section = %doc.section,
            regions = doc.regions.len(),
            resolution = %doc.resolution,
            "parsed scheme section"
        );
        Ok(doc)
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    pub fn regions(&self) -> &[SchemeRegion] {
        &self.regions
    }
}

impl LayoutDescriptor for SchemeDocument {
    fn kind(&self) -> DescriptorKind {
        DescriptorKind::Scheme
    }

    fn resolution(&self) -> Canvas {
        self.resolution
    }

    fn set_resolution(&mut self, canvas: Canvas) {
        if let Some(idx) = self.res_span {
            if let SchemeSpan::Numbers(span) = &mut self.spans[idx] {
                span.set(0, i64::from(canvas.width));
                span.set(1, i64::from(canvas.height));
            }
        }
        self.resolution = canvas;
    }

    fn anchor(&self) -> Point {
        self.regions
            .iter()
            .find(|r| r.name == IMAGE_PART)
            .map(|r| Point::new(r.rect.x, r.rect.y))
            .unwrap_or(Point::ORIGIN)
    }

    fn node_count(&self) -> usize {
        self.regions.len()
    }

    fn node_name(&self, index: usize) -> Option<&str> {
        self.regions.get(index).map(|r| r.name.as_str())
    }

    fn apply_rect(&mut self, index: usize, rect: Rect) {
        let geometry = self.regions[index].geometry;
        self.regions[index].rect = rect;
        match geometry {
            RegionGeometry::Corners { ul, lr } => {
                let lower_right = rect.lower_right();
                if let SchemeSpan::Numbers(span) = &mut self.spans[ul] {
                    span.set(0, i64::from(rect.x));
                    span.set(1, i64::from(rect.y));
                }
                if let SchemeSpan::Numbers(span) = &mut self.spans[lr] {
                    span.set(0, i64::from(lower_right.x));
                    span.set(1, i64::from(lower_right.y));
                }
            }
            RegionGeometry::Block { position, size } => {
                if let SchemeSpan::Numbers(span) = &mut self.spans[position] {
                    span.set(0, i64::from(rect.x));
                    span.set(1, i64::from(rect.y));
                }
                if let SchemeSpan::Numbers(span) = &mut self.spans[size] {
                    span.set(0, i64::from(rect.w));
                    span.set(1, i64::from(rect.h));
                }
            }
        }
    }

    fn emit_source(&self) -> EmitSource {
        EmitSource {
            kind: DescriptorKind::Scheme,
            resolution: self.resolution,
            anchor: self.anchor(),
            nodes: self
                .regions
                .iter()
                .enumerate()
                .map(|(index, region)| EmitNode {
                    index,
                    name: region.name.clone(),
                    rect: region.rect,
                    image: region.image.clone(),
                    states: region.states.clone(),
                })
                .collect(),
        }
    }

    fn serialize(&self) -> String {
        let mut out = String::new();
        for span in &self.spans {
            match span {
                SchemeSpan::Opaque(raw) => out.push_str(raw),
                SchemeSpan::Numbers(span) => span.render_into(&mut out),
            }
        }
        out
    }

    fn synthesize(resolution: Canvas, _anchor: Point, nodes: &[(String, Rect)]) -> Self {
        let mut spans = Vec::new();
        let mut regions = Vec::new();

        spans.push(SchemeSpan::Opaque("ControlBarScheme Exported\n".to_string()));
        let res_span = spans.len();
        let mut builder = SpanBuilder::new();
        builder
            .text("  ScreenCreationRes X:")
            .slot(i64::from(resolution.width))
            .text(" Y:")
            .slot(i64::from(resolution.height))
            .text("\n");
        spans.push(SchemeSpan::Numbers(builder.build()));

        for (name, rect) in nodes {
            if name == IMAGE_PART {
                spans.push(SchemeSpan::Opaque("  ImagePart\n".to_string()));
                let position = spans.len();
                let mut pos = SpanBuilder::new();
                pos.text("    Position X:")
                    .slot(i64::from(rect.x))
                    .text(" Y:")
                    .slot(i64::from(rect.y))
                    .text("\n");
                spans.push(SchemeSpan::Numbers(pos.build()));
                let size = spans.len();
                let mut sz = SpanBuilder::new();
                sz.text("    Size X:")
                    .slot(i64::from(rect.w))
                    .text(" Y:")
                    .slot(i64::from(rect.h))
                    .text("\n");
                spans.push(SchemeSpan::Numbers(sz.build()));
                spans.push(SchemeSpan::Opaque("  End\n".to_string()));
                regions.push(SchemeRegion {
                    name: name.clone(),
                    rect: *rect,
                    image: None,
                    states: Vec::new(),
                    geometry: RegionGeometry::Block { position, size },
                });
            } else {
                let lower_right = rect.lower_right();
                let ul = spans.len();
                let mut ul_builder = SpanBuilder::new();
                ul_builder
                    .text(&format!("  {name}UL X:"))
                    .slot(i64::from(rect.x))
                    .text(" Y:")
                    .slot(i64::from(rect.y))
                    .text("\n");
                spans.push(SchemeSpan::Numbers(ul_builder.build()));
                let lr = spans.len();
                let mut lr_builder = SpanBuilder::new();
                lr_builder
                    .text(&format!("  {name}LR X:"))
                    .slot(i64::from(lower_right.x))
                    .text(" Y:")
                    .slot(i64::from(lower_right.y))
                    .text("\n");
                spans.push(SchemeSpan::Numbers(lr_builder.build()));
                regions.push(SchemeRegion {
                    name: name.clone(),
                    rect: *rect,
                    image: None,
                    states: Vec::new(),
                    geometry: RegionGeometry::Corners { ul, lr },
                });
            }
        }
        spans.push(SchemeSpan::Opaque("End\n".to_string()));

        SchemeDocument {
            section: "Exported".to_string(),
            resolution,
            spans,
            regions,
            res_span: Some(res_span),
        }
    }
}

/// Parse the `X:<n> Y:<n>` pair on a line. Anchoring on `X:`/`Y:`
/// keeps region names containing those letters out of the search.
fn parse_xy(line: &str, line_no: usize, what: &str) -> Result<(SplicedSpan, Point)> {
    let x = int_after(line, "X:", 0)
        .ok_or_else(|| IngestError::malformed(line_no, format!("{what} has a non-numeric X")))?;
    let y = int_after(line, "Y:", x.end)
        .ok_or_else(|| IngestError::malformed(line_no, format!("{what} has a non-numeric Y")))?;
    let point = Point::new(x.value as i32, y.value as i32);
    Ok((SplicedSpan::new(line.to_string(), vec![x, y]), point))
}

/// `MoneyUL` / `MoneyLR` style tokens name a region corner.
fn corner_region_name(token: &str) -> Option<&str> {
    let name = token
        .strip_suffix("UL")
        .or_else(|| token.strip_suffix("LR"))?;
    if name.is_empty() || name.eq_ignore_ascii_case("ScreenCreationRes") {
        return None;
    }
    Some(name)
}

/// `OptionsButtonEnable` style tokens map a button state to an image.
/// The scheme format spells two buttons inconsistently; normalize them
/// to the region names the corner lines use.
fn button_state(token: &str) -> Option<(String, String)> {
    let (name, state) = token.split_once("Button")?;
    if name.is_empty() || state.is_empty() {
        return None;
    }
    let name = match name {
        "IdleWorker" => "Worker",
        "Buddy" => "Chat",
        other => other,
    };
    Some((name.to_string(), state.to_string()))
}

/// Attach collected state mappings to their regions, enabled state
/// last so it is the one visible in the drawing.
fn attach_states(regions: &mut [SchemeRegion], states: Vec<(String, String, String)>) {
    for (name, state, image) in states {
        if let Some(region) = regions.iter_mut().find(|r| r.name == name) {
            region.states.push((state, image));
        } else {
            debug!(button = %name, "button state for unknown region");
        }
    }
    for region in regions {
        region
            .states
            .sort_by_key(|(state, _)| (state == ENABLE_STATE, state.clone()));
    }
}
