//! Shared fixture helpers for the integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// A scratch directory holding a `sample/` fixture directory.
pub struct Fixture {
    root: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        fs::create_dir(root.path().join("sample")).expect("create sample dir");
        Self { root }
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn sample_dir(&self) -> PathBuf {
        self.root.path().join("sample")
    }

    /// Writes `sample/<name>`.
    pub fn file(&self, name: &str, content: &str) -> &Self {
        fs::write(self.sample_dir().join(name), content).expect("write fixture");
        self
    }

    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.sample_dir().join(name)).expect("read fixture")
    }

    pub fn exists(&self, name: &str) -> bool {
        self.sample_dir().join(name).exists()
    }

    /// `sample-check` running in the fixture root with `cat` as the program.
    pub fn check(&self) -> Command {
        let mut cmd = Command::cargo_bin("sample-check").expect("binary built");
        cmd.current_dir(self.root()).env_remove("RUST_LOG");
        cmd
    }
}
