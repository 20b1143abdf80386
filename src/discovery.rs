use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

use crate::config::Naming;
use crate::errors::{CheckError, CheckResult};
use crate::index::{derive_index_os, IndexToken, StripMode};

/// One fixture pair plus the candidate file the program writes into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sample {
    pub index: IndexToken,
    #[serde(serialize_with = "lossy_path")]
    pub input: PathBuf,
    #[serde(serialize_with = "lossy_path")]
    pub reference: PathBuf,
    #[serde(serialize_with = "lossy_path")]
    pub candidate: PathBuf,
}

fn lossy_path<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}

impl Sample {
    /// File name of the input, for reporting.
    pub fn input_name(&self) -> String {
        self.input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.input.display().to_string())
    }
}

/// Finds the samples of a sample directory.
///
/// The discovery process follows this flow:
/// 1. List the directory, one level deep
/// 2. Keep regular files whose name contains the input marker
/// 3. Derive the index token and the paired file paths
#[derive(Debug)]
pub struct SampleDiscoverer<'a> {
    naming: &'a Naming,
    strip: StripMode,
}

impl<'a> SampleDiscoverer<'a> {
    pub fn new(naming: &'a Naming, strip: StripMode) -> Self {
        Self { naming, strip }
    }

    // =====================
    // Public API
    // =====================

    /// Lists `dir` and returns its samples sorted by input path.
    pub fn discover<P: AsRef<Path>>(&self, dir: P) -> CheckResult<Vec<Sample>> {
        let dir = dir.as_ref();
        let mut samples = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|source| CheckError::SampleDir {
                path: dir.to_path_buf(),
                source,
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry.file_name();
            if !self.is_input_name(name) {
                trace!(file = %name.to_string_lossy(), "not an input file");
                continue;
            }

            match self.sample_for(dir, entry.path(), name) {
                Some(sample) => samples.push(sample),
                None => warn!(file = %entry.path().display(), "skipping input with a non-UTF-8 name"),
            }
        }
        samples.sort_by(|a, b| a.input.cmp(&b.input));
        debug!(dir = %dir.display(), count = samples.len(), "discovered samples");
        Ok(samples)
    }

    /// Builds the sample of a single input file living in `dir`.
    ///
    /// `None` when no index can be derived from `name` on this platform.
    pub fn sample_for(&self, dir: &Path, input: &Path, name: &OsStr) -> Option<Sample> {
        let index = derive_index_os(
            name,
            &self.naming.input_marker,
            &self.naming.extension,
            self.strip,
        )?;
        let reference = dir.join(index.file_name(&self.naming.reference_prefix, &self.naming.extension));
        let candidate = dir.join(index.file_name(&self.naming.candidate_prefix, &self.naming.extension));
        Some(Sample {
            index,
            input: input.to_path_buf(),
            reference,
            candidate,
        })
    }

    // =====================
    // Internal
    // =====================

    fn is_input_name(&self, name: &OsStr) -> bool {
        name.to_string_lossy().contains(self.naming.input_marker.as_str())
    }
}
