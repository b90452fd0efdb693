//! The mapped-image registry: every table the caller loaded, keyed by
//! entry name, immutable once loading is done.

use std::collections::BTreeMap;

use tracing::{debug, info};

use wndkit_model::Size;

use crate::error::{AtlasError, Result};
use crate::table::{AtlasRect, MappedImageEntry, parse_table};

/// Directory names mapped images are conventionally discovered under.
/// Tables loaded from anywhere else stay out of the search scope.
const SEARCH_DIRS: [&str; 2] = ["MappedImages", "INI"];

/// Where a table came from, for the search-scope restriction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableScope {
    /// Loaded while scanning a directory with this (top-level) name.
    Directory(String),
    /// Explicitly named by the user; always searched.
    Explicit,
}

impl TableScope {
    fn in_search_scope(&self) -> bool {
        match self {
            TableScope::Directory(name) => SEARCH_DIRS
                .iter()
                .any(|dir| dir.eq_ignore_ascii_case(name)),
            TableScope::Explicit => true,
        }
    }
}

/// A resolved image reference: the texture to sample and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedImage<'a> {
    pub texture: &'a str,
    pub rect: AtlasRect,
    pub declared_size: Option<Size>,
}

/// All mapped-image entries visible to one conversion run.
///
/// Immutable after loading, so a single registry can back any number of
/// concurrent file conversions.
#[derive(Debug, Default)]
pub struct AtlasRegistry {
    entries: BTreeMap<String, MappedImageEntry>,
    tables_loaded: usize,
    tables_skipped: usize,
}

impl AtlasRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a table and index its entries. Later definitions of a name
    /// win, matching the game's load order semantics. Returns the
    /// number of entries indexed; tables outside the search scope are
    /// counted but not indexed.
    pub fn load_table(&mut self, scope: &TableScope, source: &str, content: &str) -> usize {
        if !scope.in_search_scope() {
            debug!(source, ?scope, "table outside the mapped-image search scope, skipping");
            self.tables_skipped += 1;
            return 0;
        }
        let entries = parse_table(content);
        let count = entries.len();
        for entry in entries {
            self.entries.insert(entry.name.clone(), entry);
        }
        self.tables_loaded += 1;
        debug!(source, count, "loaded mapped-image table");
        count
    }

    /// Look up a mapped image by name.
    pub fn resolve(&self, name: &str) -> Result<ResolvedImage<'_>> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| AtlasError::UnresolvedImageReference {
                name: name.to_string(),
            })?;
        Ok(ResolvedImage {
            texture: &entry.texture,
            rect: entry.coords,
            declared_size: entry.declared_size,
        })
    }

    pub fn get(&self, name: &str) -> Option<&MappedImageEntry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn tables_skipped(&self) -> usize {
        self.tables_skipped
    }

    /// Log a one-line summary after the caller finishes loading.
    pub fn log_summary(&self) {
        info!(
            entries = self.entries.len(),
            tables = self.tables_loaded,
            skipped = self.tables_skipped,
            "mapped-image registry ready"
        );
    }
}
