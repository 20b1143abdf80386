//! Run configuration.
//!
//! Values are layered: built-in defaults, then an optional YAML file, then
//! command-line flags. [`FileConfig`] mirrors the YAML file with every key
//! optional; [`RunConfig`] is the fully resolved result.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::errors::{CheckError, CheckResult};
use crate::index::StripMode;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "sample-check.yaml";

pub const DEFAULT_SAMPLE_DIR: &str = "sample";
pub const DEFAULT_COMMAND: [&str; 3] = ["cargo", "run", "--"];

/// The external program invocation, without the input path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ProgramCommand {
    /// Splits `words` into program and leading arguments.
    pub fn from_words<I, S>(words: I) -> CheckResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut words = words.into_iter().map(Into::into);
        let program = words.next().ok_or(CheckError::EmptyCommand)?;
        if program.is_empty() {
            return Err(CheckError::EmptyCommand);
        }
        Ok(Self {
            program,
            args: words.collect(),
        })
    }

    /// Shell-like rendering, for logs and reports.
    pub fn display_with(&self, input: &Path) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line.push(' ');
        line.push_str(&input.display().to_string());
        line
    }
}

impl Default for ProgramCommand {
    fn default() -> Self {
        Self {
            program: DEFAULT_COMMAND[0].to_string(),
            args: DEFAULT_COMMAND[1..].iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Naming scheme of the fixture files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Naming {
    /// Substring selecting input files, also the prefix removed from their names.
    pub input_marker: String,
    pub extension: String,
    pub reference_prefix: String,
    pub candidate_prefix: String,
}

impl Default for Naming {
    fn default() -> Self {
        Self {
            input_marker: "input".to_string(),
            extension: ".csv".to_string(),
            reference_prefix: "output".to_string(),
            candidate_prefix: "myoutput".to_string(),
        }
    }
}

/// Fully resolved configuration of one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub sample_dir: PathBuf,
    pub command: ProgramCommand,
    pub naming: Naming,
    pub strip: StripMode,
    /// Sort both streams before diffing.
    pub sort: bool,
    /// Let program failures and mismatches decide the exit status.
    pub strict: bool,
    /// Only run samples whose index contains this substring.
    pub filter: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            sample_dir: PathBuf::from(DEFAULT_SAMPLE_DIR),
            command: ProgramCommand::default(),
            naming: Naming::default(),
            strip: StripMode::default(),
            sort: true,
            strict: false,
            filter: None,
        }
    }
}

/// On-disk YAML layout. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub sample_dir: Option<PathBuf>,
    pub command: Option<Vec<String>>,
    pub strict: Option<bool>,
    pub strip: Option<StripMode>,
    pub sort: Option<bool>,
    pub input_marker: Option<String>,
    pub extension: Option<String>,
    pub reference_prefix: Option<String>,
    pub candidate_prefix: Option<String>,
}

impl FileConfig {
    pub fn from_yaml(path: &Path, content: &str) -> CheckResult<Self> {
        serde_yaml::from_str(content).map_err(|source| CheckError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> CheckResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| CheckError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(path, &content)
    }

    /// Loads `explicit` when given, otherwise the default file if it exists.
    pub fn discover(explicit: Option<&Path>) -> CheckResult<Option<Self>> {
        if let Some(path) = explicit {
            return Self::load(path).map(Some);
        }
        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            debug!(path = %fallback.display(), "using config file from working directory");
            return Self::load(fallback).map(Some);
        }
        Ok(None)
    }

    /// Applies the file's values on top of `config`.
    pub fn apply(self, config: &mut RunConfig) -> CheckResult<()> {
        if let Some(dir) = self.sample_dir {
            config.sample_dir = dir;
        }
        if let Some(words) = self.command {
            config.command = ProgramCommand::from_words(words)?;
        }
        if let Some(strict) = self.strict {
            config.strict = strict;
        }
        if let Some(strip) = self.strip {
            config.strip = strip;
        }
        if let Some(sort) = self.sort {
            config.sort = sort;
        }
        if let Some(marker) = self.input_marker {
            config.naming.input_marker = marker;
        }
        if let Some(extension) = self.extension {
            config.naming.extension = extension;
        }
        if let Some(prefix) = self.reference_prefix {
            config.naming.reference_prefix = prefix;
        }
        if let Some(prefix) = self.candidate_prefix {
            config.naming.candidate_prefix = prefix;
        }
        Ok(())
    }
}
