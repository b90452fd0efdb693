//! Applying imported drawing geometry back onto a descriptor.
//!
//! One code path serves both the overwrite flow and the
//! write-to-a-new-file flow; the mode only decides what a missing
//! original means. Every update is validated before anything is
//! applied, so a failed merge leaves nothing half-written.

use tracing::{debug, info};

use wndkit_model::{Canvas, ImportedDrawing, LayoutDescriptor, Rect};

use crate::error::{MergeError, Result};
use crate::geometry::to_descriptor_space;

/// How the merged result is meant to be persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    /// Rewrite the source descriptor in place. The original is
    /// required.
    Update,
    /// Write to a distinct output path, never touching the source. An
    /// absent original synthesizes a minimal descriptor from the
    /// updates alone.
    WriteNew,
}

/// A successful merge.
#[derive(Debug)]
pub struct MergeOutcome<D> {
    pub document: D,
    /// Number of geometry updates applied.
    pub applied: usize,
    /// Set when the declared reference resolution was rewritten.
    pub canvas_resized: Option<(Canvas, Canvas)>,
}

/// Merge a drawing's geometry updates into `original`.
pub fn merge<D: LayoutDescriptor>(
    original: Option<D>,
    drawing: &ImportedDrawing,
    mode: MergeMode,
) -> Result<MergeOutcome<D>> {
    let Some(mut document) = original else {
        return match mode {
            MergeMode::Update => Err(MergeError::MissingOriginal),
            MergeMode::WriteNew => Ok(synthesize(drawing)),
        };
    };

    // Validate every back-reference before touching the document.
    for update in &drawing.updates {
        let index = update.backref.index;
        let known = document
            .node_name(index)
            .is_some_and(|name| update.backref.matches(document.kind(), name));
        if !known {
            return Err(MergeError::UnknownTarget {
                index,
                name: update.name.clone(),
            });
        }
    }

    for update in &drawing.updates {
        let rect = to_descriptor_space(update.rect, drawing.anchor);
        debug!(index = update.backref.index, %rect, "applying geometry update");
        document.apply_rect(update.backref.index, rect);
    }

    // A changed canvas is an edit in its own right: rewrite the
    // declared reference resolution rather than rescaling anything.
    let canvas_resized = (document.resolution() != drawing.canvas).then(|| {
        let previous = document.resolution();
        document.set_resolution(drawing.canvas);
        (previous, drawing.canvas)
    });

    info!(
        applied = drawing.updates.len(),
        resized = canvas_resized.is_some(),
        "merge complete"
    );
    Ok(MergeOutcome {
        document,
        applied: drawing.updates.len(),
        canvas_resized,
    })
}

/// Build a minimal descriptor holding only the drawing's elements.
fn synthesize<D: LayoutDescriptor>(drawing: &ImportedDrawing) -> MergeOutcome<D> {
    let nodes: Vec<(String, Rect)> = drawing
        .updates
        .iter()
        .map(|update| {
            (
                update.name.clone(),
                to_descriptor_space(update.rect, drawing.anchor),
            )
        })
        .collect();
    let document = D::synthesize(drawing.canvas, drawing.anchor, &nodes);
    info!(elements = nodes.len(), "synthesized minimal descriptor");
    MergeOutcome {
        applied: nodes.len(),
        document,
        canvas_resized: None,
    }
}
