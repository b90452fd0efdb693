//! Lossless readers and writers for game UI layout descriptors.
//!
//! Two formats are supported: WND window layout files and
//! `ControlBarScheme` INI sections. Both parsers keep the source text
//! as an ordered list of raw spans and only make the numeric geometry
//! fields addressable, so `serialize(parse(x))` reproduces `x`
//! byte-for-byte until a rectangle or resolution is actually rewritten.

mod error;
mod span;

pub mod scheme;
pub mod wnd;

pub use error::{IngestError, Result};
pub use scheme::{SchemeDocument, SchemeRegion};
pub use wnd::{ElementKind, WndDocument, WndElement};
