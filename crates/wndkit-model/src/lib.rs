//! Shared model types for the wndkit conversion pipeline.
//!
//! Descriptor documents (WND layouts, control bar schemes) live in
//! `wndkit-ingest`; this crate holds the vocabulary everything agrees
//! on: integer pixel geometry, the [`LayoutDescriptor`] contract, the
//! drawing back-reference scheme, and the conversion report.

pub mod descriptor;
pub mod drawing;
pub mod geometry;
pub mod report;

pub use descriptor::{DescriptorKind, EmitNode, EmitSource, LayoutDescriptor};
pub use drawing::{BackRef, GeometryUpdate, ImportedDrawing, identity_digest};
pub use geometry::{Canvas, Point, Rect, Size};
pub use report::{ConversionReport, Severity, Warning, WarningKind};
