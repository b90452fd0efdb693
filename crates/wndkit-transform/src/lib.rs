//! Geometry transform and merge engine for the wndkit pipeline.

pub mod geometry;
pub mod merge;

mod error;

pub use error::{MergeError, Result};
pub use geometry::{round_coordinate, to_descriptor_space, to_drawing_space};
pub use merge::{MergeMode, MergeOutcome, merge};
