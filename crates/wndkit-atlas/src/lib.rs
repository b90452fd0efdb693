//! MappedImages INI tables and texture-atlas name resolution.
//!
//! Layout descriptors reference images by name; the tables map each
//! name to a sub-rectangle of a shared texture. Resolution is scoped:
//! only tables discovered under the conventional directory names take
//! part in lookups.

mod error;
pub mod registry;
pub mod table;

pub use error::{AtlasError, Result};
pub use registry::{AtlasRegistry, ResolvedImage, TableScope};
pub use table::{AtlasRect, MappedImageEntry, parse_table};
