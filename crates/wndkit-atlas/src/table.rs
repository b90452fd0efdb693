//! MappedImage table parsing.
//!
//! Tables are INI-style files of `MappedImage <Name>` ... `End` blocks.
//! They are lookup inputs, never round-tripped, so parsing is tolerant:
//! comments, `Status` lines and unknown keys are skipped, and entries
//! with incomplete coordinates are dropped rather than failing the
//! whole table.

use serde::{Deserialize, Serialize};
use tracing::debug;

use wndkit_model::Size;

/// A sub-rectangle of a texture, as declared in `Coords = Left:..
/// Top:.. Right:.. Bottom:..`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtlasRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl AtlasRect {
    /// Authoritative image width: right minus left.
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Authoritative image height: bottom minus top. There is no
    /// independent height field in the format.
    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// One `MappedImage` entry. Identity is the entry name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedImageEntry {
    pub name: String,
    /// Source texture file name.
    pub texture: String,
    /// Declared `TextureWidth`/`TextureHeight`. Informational: used
    /// only when coordinates need normalizing against the real texture,
    /// never to size the sub-rectangle.
    pub declared_size: Option<Size>,
    pub coords: AtlasRect,
}

#[derive(Default)]
struct PendingEntry {
    name: String,
    texture: Option<String>,
    width: Option<i32>,
    height: Option<i32>,
    coords: Option<AtlasRect>,
}

impl PendingEntry {
    fn finish(self) -> Option<MappedImageEntry> {
        let (Some(texture), Some(coords)) = (self.texture, self.coords) else {
            debug!(entry = %self.name, "dropping mapped image with incomplete definition");
            return None;
        };
        let declared_size = match (self.width, self.height) {
            (Some(w), Some(h)) => Some(Size::new(w, h)),
            _ => None,
        };
        Some(MappedImageEntry {
            name: self.name,
            texture,
            declared_size,
            coords,
        })
    }
}

/// Parse every complete `MappedImage` block out of a table file.
pub fn parse_table(content: &str) -> Vec<MappedImageEntry> {
    let mut entries = Vec::new();
    let mut current: Option<PendingEntry> = None;

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(';') {
            continue;
        }
        let lower = trimmed.to_ascii_lowercase();

        if lower.starts_with("mappedimage") {
            if let Some(done) = current.take().and_then(PendingEntry::finish) {
                entries.push(done);
            }
            if let Some(name) = trimmed.split_whitespace().nth(1) {
                current = Some(PendingEntry {
                    name: name.to_string(),
                    ..PendingEntry::default()
                });
            }
            continue;
        }

        if lower == "end" {
            if let Some(done) = current.take().and_then(PendingEntry::finish) {
                entries.push(done);
            }
            continue;
        }

        let Some(entry) = current.as_mut() else {
            continue;
        };
        let Some((key, value)) = trimmed.split_once('=') else {
            continue;
        };
        let value = value.trim();
        match key.trim().to_ascii_lowercase().as_str() {
            "texture" => entry.texture = Some(value.to_string()),
            "texturewidth" => entry.width = value.parse().ok(),
            "textureheight" => entry.height = value.parse().ok(),
            "coords" => entry.coords = parse_coords(value),
            // Status and anything else is irrelevant to resolution.
            _ => {}
        }
    }
    if let Some(done) = current.take().and_then(PendingEntry::finish) {
        entries.push(done);
    }
    entries
}

fn parse_coords(value: &str) -> Option<AtlasRect> {
    let mut left = None;
    let mut top = None;
    let mut right = None;
    let mut bottom = None;
    for part in value.split_whitespace() {
        let Some((key, number)) = part.split_once(':') else {
            continue;
        };
        let parsed = number.parse::<i32>().ok();
        match key.to_ascii_lowercase().as_str() {
            "left" => left = parsed,
            "top" => top = parsed,
            "right" => right = parsed,
            "bottom" => bottom = parsed,
            _ => {}
        }
    }
    Some(AtlasRect {
        left: left?,
        top: top?,
        right: right?,
        bottom: bottom?,
    })
}
