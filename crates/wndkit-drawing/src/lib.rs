//! SVG drawing emission and re-import.
//!
//! The drawing is the editable intermediate: every descriptor element
//! becomes one shape whose rectangle is authoritative geometry and
//! whose back-reference makes the edit re-importable. Atlas imagery is
//! decoration.

mod emit;
mod error;
mod import;

pub use emit::{EmittedDrawing, emit};
pub use error::{DrawingError, Result};
pub use import::import;
