//! Error handling for sample-check.
//!
//! Every failure mode of a run is a variant of [`CheckError`]. Setup errors
//! (config file, sample directory) abort the run and are rendered through
//! `miette`; per-sample errors are recorded in the sample report and the run
//! moves on to the next sample.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Crate-wide result alias.
pub type CheckResult<T> = Result<T, CheckError>;

#[derive(Debug, Error, Diagnostic)]
pub enum CheckError {
    #[error("failed to read config file '{path}'")]
    #[diagnostic(code(sample_check::config::read))]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{path}'")]
    #[diagnostic(
        code(sample_check::config::parse),
        help("expected a YAML mapping, e.g. `sample_dir: sample` and `command: [cargo, run, --]`")
    )]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("the external command is empty")]
    #[diagnostic(
        code(sample_check::config::command),
        help("pass the command after `--`, e.g. `sample-check -- cargo run --`")
    )]
    EmptyCommand,

    #[error("failed to list sample directory '{path}'")]
    #[diagnostic(
        code(sample_check::discovery),
        help("run from the directory that contains `sample/`, or pass `--dir`")
    )]
    SampleDir {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to create candidate file '{path}'")]
    #[diagnostic(code(sample_check::program::candidate))]
    CandidateCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start '{program}'")]
    #[diagnostic(code(sample_check::program::spawn))]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read '{path}' for comparison")]
    #[diagnostic(code(sample_check::compare::read))]
    CompareRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write report")]
    #[diagnostic(code(sample_check::report))]
    Report(#[from] std::io::Error),

    #[error("failed to encode JSON report")]
    #[diagnostic(code(sample_check::report::json))]
    Json(#[from] serde_json::Error),
}

impl CheckError {
    /// Message including the underlying cause, for one-line reports.
    pub fn chain_message(&self) -> String {
        let mut message = self.to_string();
        let mut cause = std::error::Error::source(self);
        while let Some(err) = cause {
            message.push_str(": ");
            message.push_str(&err.to_string());
            cause = err.source();
        }
        message
    }
}
