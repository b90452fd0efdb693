//! Integer pixel geometry shared by every descriptor format.
//!
//! All layout coordinates are whole pixels in a declared reference
//! resolution. Nothing here scales; scaling is a display concern the
//! descriptor formats deliberately avoid.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A point in descriptor or drawing space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.x, self.y)
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub w: i32,
    pub h: i32,
}

impl Size {
    pub fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }
}

/// An axis-aligned rectangle: upper-left corner plus size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Build from upper-left and lower-right corners, the way WND
    /// `SCREENRECT` and scheme `UL`/`LR` pairs are written.
    pub fn from_corners(upper_left: Point, lower_right: Point) -> Self {
        Self {
            x: upper_left.x,
            y: upper_left.y,
            w: lower_right.x - upper_left.x,
            h: lower_right.y - upper_left.y,
        }
    }

    pub fn upper_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn lower_right(&self) -> Point {
        Point::new(self.x + self.w, self.y + self.h)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2, self.y + self.h / 2)
    }

    /// Shift the rectangle's position, keeping its size.
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            w: self.w,
            h: self.h,
        }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}x{}", self.x, self.y, self.w, self.h)
    }
}

/// A declared reference resolution ("screen creation resolution").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Canvas {
    type Err = String;

    /// Parse `1920x1080` (also accepts `X` or whitespace as separator).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s
            .trim()
            .split(|c: char| c == 'x' || c == 'X' || c.is_whitespace())
            .filter(|p| !p.is_empty());
        let width = parts
            .next()
            .and_then(|p| p.parse::<u32>().ok())
            .ok_or_else(|| format!("invalid canvas size: {s}"))?;
        let height = parts
            .next()
            .and_then(|p| p.parse::<u32>().ok())
            .ok_or_else(|| format!("invalid canvas size: {s}"))?;
        if parts.next().is_some() {
            return Err(format!("invalid canvas size: {s}"));
        }
        Ok(Self { width, height })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_from_corners() {
        let rect = Rect::from_corners(Point::new(10, 20), Point::new(110, 70));
        assert_eq!(rect, Rect::new(10, 20, 100, 50));
        assert_eq!(rect.lower_right(), Point::new(110, 70));
    }

    #[test]
    fn rect_translation() {
        let rect = Rect::new(50, 50, 16, 16);
        assert_eq!(rect.translated(0, -408), Rect::new(50, -358, 16, 16));
        assert_eq!(rect.translated(0, -408).translated(0, 408), rect);
    }

    #[test]
    fn canvas_parses_common_forms() {
        assert_eq!("1920x1080".parse::<Canvas>().unwrap(), Canvas::new(1920, 1080));
        assert_eq!("3840X2160".parse::<Canvas>().unwrap(), Canvas::new(3840, 2160));
        assert_eq!("800 600".parse::<Canvas>().unwrap(), Canvas::new(800, 600));
        assert!("wide".parse::<Canvas>().is_err());
        assert!("1x2x3".parse::<Canvas>().is_err());
    }
}
