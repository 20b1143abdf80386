//! Runs the external program against one input file.

use std::fs::File;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use serde::Serialize;
use tracing::debug;

use crate::config::ProgramCommand;
use crate::errors::{CheckError, CheckResult};

/// How the external program ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum ProgramExit {
    Success,
    /// Non-zero exit. `code` is `None` when the process was killed by a signal.
    Failed { code: Option<i32> },
    /// The process could not be spawned or waited on.
    NotStarted { reason: String },
}

impl ProgramExit {
    pub fn from_status(status: ExitStatus) -> Self {
        if status.success() {
            Self::Success
        } else {
            Self::Failed {
                code: status.code(),
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Runs `command <input>` with stdout redirected into `candidate`.
///
/// The candidate file is created before the program starts, so it exists
/// (empty) even when the program cannot be spawned. Stderr is inherited.
pub fn run_program(command: &ProgramCommand, input: &Path, candidate: &Path) -> CheckResult<ProgramExit> {
    let stdout = File::create(candidate).map_err(|source| CheckError::CandidateCreate {
        path: candidate.to_path_buf(),
        source,
    })?;

    debug!(command = %command.display_with(input), candidate = %candidate.display(), "running program");

    let status = Command::new(&command.program)
        .args(&command.args)
        .arg(input)
        .stdin(Stdio::null())
        .stdout(Stdio::from(stdout))
        .stderr(Stdio::inherit())
        .status();

    let exit = match status {
        Ok(status) => ProgramExit::from_status(status),
        Err(source) => {
            let err = CheckError::Spawn {
                program: command.program.clone(),
                source,
            };
            debug!(error = %err.chain_message(), "program did not start");
            ProgramExit::NotStarted {
                reason: err.chain_message(),
            }
        }
    };
    if let ProgramExit::Failed { code } = &exit {
        debug!(input = %input.display(), ?code, "program exited with failure");
    }
    Ok(exit)
}
