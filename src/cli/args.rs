//! Defines the command-line arguments for sample-check.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::index::StripMode;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "sample-check",
    version,
    about = "Run a program on every sample input and diff its sorted output against the reference.",
    after_help = "The external command defaults to `cargo run --`; the input path is appended to it."
)]
pub struct CheckArgs {
    /// Directory holding `input<N>.csv` / `output<N>.csv` pairs.
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// YAML config file (defaults to `sample-check.yaml` when present).
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Exit with status 1 when any program fails or any output differs.
    #[arg(long)]
    pub strict: bool,

    /// How the index is cut out of input file names.
    #[arg(long, value_enum, value_name = "MODE")]
    pub strip: Option<StripMode>,

    /// Compare lines in file order instead of sorting both files first.
    ///
    /// The file-order diff keeps a table of reference lines times candidate
    /// lines in memory; use it for fixtures of at most a few thousand lines.
    #[arg(long)]
    pub no_sort: bool,

    /// Only run samples whose index contains this substring.
    #[arg(short, long, value_name = "SUBSTRING")]
    pub filter: Option<String>,

    /// List the discovered samples without running anything.
    #[arg(long)]
    pub list: bool,

    /// Print a JSON report instead of diffs.
    #[arg(long, conflicts_with = "list")]
    pub json: bool,

    /// When to color diff output.
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// External command; the input path is appended as its last argument.
    #[arg(last = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}
