//! The generate and update flows.
//!
//! This is the only layer that touches the filesystem: it reads the
//! descriptor, the drawing and the atlas tables up front, hands fully
//! materialized inputs to the library crates, and writes an output file
//! only after the whole conversion succeeded.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, bail};
use serde::Serialize;
use tracing::{debug, info, warn};

use wndkit_atlas::{AtlasRegistry, TableScope};
use wndkit_drawing::{emit, import};
use wndkit_ingest::{SchemeDocument, WndDocument};
use wndkit_model::{
    ConversionReport, ImportedDrawing, LayoutDescriptor, WarningKind,
};
use wndkit_transform::{MergeMode, merge};

use crate::cli::{GenerateArgs, UpdateArgs};

/// What one conversion did, for the summary and `--json` output.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub output: PathBuf,
    /// Shapes emitted, or geometry updates applied.
    pub shapes: usize,
    pub report: ConversionReport,
}

/// Descriptor file → SVG drawing.
pub fn run_generate(args: &GenerateArgs) -> Result<RunSummary> {
    let content = fs::read_to_string(&args.descriptor)
        .with_context(|| format!("read {}", args.descriptor.display()))?;
    let source = match &args.scheme {
        Some(section) => SchemeDocument::parse(&content, section)
            .with_context(|| format!("parse {}", args.descriptor.display()))?
            .emit_source(),
        None => WndDocument::parse(&content)
            .with_context(|| format!("parse {}", args.descriptor.display()))?
            .emit_source(),
    };

    let atlas = load_atlas(args)?;
    let emitted = emit(&source, &atlas, args.canvas)?;

    let output = args
        .svg
        .clone()
        .unwrap_or_else(|| args.descriptor.with_extension("svg"));
    fs::write(&output, &emitted.svg)
        .with_context(|| format!("write {}", output.display()))?;
    info!(
        drawing = %output.display(),
        shapes = source.nodes.len(),
        "drawing generated"
    );

    Ok(RunSummary {
        output,
        shapes: source.nodes.len(),
        report: emitted.report,
    })
}

/// Edited SVG drawing → descriptor file.
pub fn run_update(args: &UpdateArgs) -> Result<RunSummary> {
    let svg_path = args
        .svg
        .clone()
        .unwrap_or_else(|| args.descriptor.with_extension("svg"));
    let svg = fs::read_to_string(&svg_path)
        .with_context(|| format!("read {}", svg_path.display()))?;
    let imported = import(&svg).with_context(|| format!("parse {}", svg_path.display()))?;

    let mode = if args.write_new {
        MergeMode::WriteNew
    } else {
        MergeMode::Update
    };
    let output = match (&args.output, args.write_new) {
        (Some(path), _) => path.clone(),
        (None, true) => new_file_path(&args.descriptor),
        (None, false) => args.descriptor.clone(),
    };
    if args.write_new && output == args.descriptor {
        bail!(
            "--write-new refuses to overwrite the source file {}",
            args.descriptor.display()
        );
    }

    let mut report = imported.report.clone();
    let (text, applied, resized) = match &args.scheme {
        Some(section) => {
            let original = load_original(&args.descriptor, args.write_new)?
                .map(|content| {
                    SchemeDocument::parse(&content, section)
                        .with_context(|| format!("parse {}", args.descriptor.display()))
                })
                .transpose()?;
            merge_to_text(original, &imported, mode)?
        }
        None => {
            let original = load_original(&args.descriptor, args.write_new)?
                .map(|content| {
                    WndDocument::parse(&content)
                        .with_context(|| format!("parse {}", args.descriptor.display()))
                })
                .transpose()?;
            merge_to_text(original, &imported, mode)?
        }
    };
    if let Some((from, to)) = resized {
        if report.count_of(WarningKind::CanvasResized) == 0 {
            report.push(WarningKind::CanvasResized, "drawing", format!("{from} -> {to}"));
        }
    }

    fs::write(&output, text).with_context(|| format!("write {}", output.display()))?;
    info!(
        descriptor = %output.display(),
        applied,
        "descriptor updated"
    );

    Ok(RunSummary {
        output,
        shapes: applied,
        report,
    })
}

type MergedText = (String, usize, Option<(wndkit_model::Canvas, wndkit_model::Canvas)>);

fn merge_to_text<D: LayoutDescriptor>(
    original: Option<D>,
    imported: &ImportedDrawing,
    mode: MergeMode,
) -> Result<MergedText> {
    let outcome = merge(original, imported, mode)?;
    if let Some((from, to)) = outcome.canvas_resized {
        info!(%from, %to, "reference resolution rewritten");
    }
    Ok((
        outcome.document.serialize(),
        outcome.applied,
        outcome.canvas_resized,
    ))
}

fn load_original(path: &Path, allow_missing: bool) -> Result<Option<String>> {
    if path.exists() {
        let content =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        Ok(Some(content))
    } else if allow_missing {
        info!(descriptor = %path.display(), "descriptor absent, synthesizing from the drawing");
        Ok(None)
    } else {
        bail!("descriptor not found: {}", path.display());
    }
}

/// `ControlBar.wnd` -> `ControlBar_NEW.wnd`.
fn new_file_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("descriptor");
    let name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}_NEW.{ext}"),
        None => format!("{stem}_NEW"),
    };
    path.with_file_name(name)
}

/// Load every mapped-image table the run can see. Directory scans tag
/// tables with the scanned root's name so the registry can apply the
/// conventional-directory restriction; explicit files are always in
/// scope.
fn load_atlas(args: &GenerateArgs) -> Result<AtlasRegistry> {
    let mut registry = AtlasRegistry::new();

    let default_dirs;
    let dirs: &[PathBuf] = if args.atlas_dirs.is_empty() {
        let base = args.descriptor.parent().unwrap_or_else(|| Path::new("."));
        default_dirs = vec![base.join("MappedImages"), base.join("INI")];
        &default_dirs
    } else {
        &args.atlas_dirs
    };

    for dir in dirs {
        if !dir.is_dir() {
            debug!(dir = %dir.display(), "atlas directory not found, skipping");
            continue;
        }
        let tag = dir
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let scope = TableScope::Directory(tag);
        load_tables_in(dir, &scope, &mut registry)?;
    }

    for file in &args.atlas_files {
        let content =
            fs::read_to_string(file).with_context(|| format!("read {}", file.display()))?;
        registry.load_table(&TableScope::Explicit, &file.display().to_string(), &content);
    }

    registry.log_summary();
    Ok(registry)
}

fn load_tables_in(dir: &Path, scope: &TableScope, registry: &mut AtlasRegistry) -> Result<()> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("scan {}", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("scan {}", dir.display()))?;
        let path = entry.path();
        if path.is_dir() {
            load_tables_in(&path, scope, registry)?;
            continue;
        }
        let is_table = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("ini") || ext.eq_ignore_ascii_case("txt"))
            .unwrap_or(false);
        if !is_table {
            continue;
        }
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(error) => {
                warn!(table = %path.display(), %error, "skipping unreadable table");
                continue;
            }
        };
        // Cheap pre-check before handing the file to the parser.
        if !content.to_ascii_lowercase().contains("mappedimage") {
            continue;
        }
        registry.load_table(scope, &path.display().to_string(), &content);
    }
    Ok(())
}
