//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use wndkit_model::Canvas;

#[derive(Parser)]
#[command(
    name = "wndkit",
    version,
    about = "Round-trip game UI layouts through editable SVG drawings",
    long_about = "Convert WND window layouts and ControlBarScheme INI sections into SVG\n\
                  drawings, edit them in any vector editor, and merge the geometry back\n\
                  without losing a byte of the fields the tool does not understand."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate an SVG drawing from a descriptor file.
    Generate(GenerateArgs),

    /// Merge an edited SVG drawing back into a descriptor file.
    Update(UpdateArgs),
}

#[derive(Parser)]
pub struct GenerateArgs {
    /// The descriptor: a .wnd layout, or a scheme INI with --scheme.
    #[arg(value_name = "DESCRIPTOR")]
    pub descriptor: PathBuf,

    /// ControlBarScheme section name (switches to scheme mode).
    #[arg(long = "scheme", value_name = "SECTION")]
    pub scheme: Option<String>,

    /// Directory to scan for MappedImage INI tables (repeatable).
    /// Defaults to MappedImages/ and INI/ next to the descriptor.
    #[arg(long = "atlas-dir", value_name = "DIR")]
    pub atlas_dirs: Vec<PathBuf>,

    /// A single MappedImage table to load regardless of its location
    /// (repeatable).
    #[arg(long = "atlas-file", value_name = "FILE")]
    pub atlas_files: Vec<PathBuf>,

    /// Output SVG path (default: descriptor with an .svg extension).
    #[arg(long = "svg", value_name = "PATH")]
    pub svg: Option<PathBuf>,

    /// Canvas size override, e.g. 1920x1080 (default: the descriptor's
    /// declared reference resolution).
    #[arg(long = "canvas", value_name = "WxH")]
    pub canvas: Option<Canvas>,

    /// Print the conversion summary as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct UpdateArgs {
    /// The descriptor to update.
    #[arg(value_name = "DESCRIPTOR")]
    pub descriptor: PathBuf,

    /// ControlBarScheme section name (switches to scheme mode).
    #[arg(long = "scheme", value_name = "SECTION")]
    pub scheme: Option<String>,

    /// The edited SVG drawing (default: descriptor with an .svg
    /// extension).
    #[arg(long = "svg", value_name = "PATH")]
    pub svg: Option<PathBuf>,

    /// Output path (default: overwrite the descriptor; with
    /// --write-new, <stem>_NEW.<ext>).
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Never touch the source file: write the result elsewhere. When
    /// the descriptor does not exist, a minimal one is synthesized
    /// from the drawing alone.
    #[arg(long = "write-new")]
    pub write_new: bool,

    /// Print the conversion summary as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
