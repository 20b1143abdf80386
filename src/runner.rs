//! The sample runner.
//!
//! For every discovered sample, in order:
//! 1. **Run**: execute the external program, stdout into the candidate file
//! 2. **Compare**: diff the (sorted) reference against the (sorted) candidate
//! 3. **Report**: hand the result to a [`ReportSink`]
//!
//! Samples are independent; a failure in one never stops the others.

use serde::Serialize;
use tracing::{debug, info, info_span};

use crate::compare::Comparison;
use crate::config::RunConfig;
use crate::discovery::{Sample, SampleDiscoverer};
use crate::errors::CheckResult;
use crate::program::{run_program, ProgramExit};

// =============================================================================
// CORE TYPES
// =============================================================================

/// Result of comparing one sample's reference and candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "kebab-case")]
pub enum Verdict {
    Match,
    Mismatch { diff: Comparison },
    /// One of the two files could not be read.
    Unavailable { reason: String },
}

/// Everything known about one processed sample.
#[derive(Debug, Clone, Serialize)]
pub struct SampleReport {
    pub sample: Sample,
    pub exit: ProgramExit,
    #[serde(flatten)]
    pub verdict: Verdict,
}

impl SampleReport {
    /// Program succeeded and outputs match.
    pub fn is_clean(&self) -> bool {
        self.exit.is_success() && self.verdict == Verdict::Match
    }

    pub fn is_error(&self) -> bool {
        !self.exit.is_success() || matches!(self.verdict, Verdict::Unavailable { .. })
    }
}

/// Receives each sample report as soon as it is available.
pub trait ReportSink {
    fn report(&mut self, report: &SampleReport) -> CheckResult<()>;
}

/// Totals of a whole run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub samples: usize,
    pub matched: usize,
    pub differed: usize,
    pub errors: usize,
}

impl RunSummary {
    pub fn record(&mut self, report: &SampleReport) {
        self.samples += 1;
        match report.verdict {
            Verdict::Match => self.matched += 1,
            Verdict::Mismatch { .. } => self.differed += 1,
            Verdict::Unavailable { .. } => {}
        }
        if report.is_error() {
            self.errors += 1;
        }
    }

    pub fn is_clean(&self) -> bool {
        self.differed == 0 && self.errors == 0
    }

    /// Process exit status. Lenient runs always succeed.
    pub fn exit_code(&self, strict: bool) -> i32 {
        if strict && !self.is_clean() {
            1
        } else {
            0
        }
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} samples: {} matched, {} differed, {} errors",
            self.samples, self.matched, self.differed, self.errors
        )
    }
}

// =============================================================================
// RUNNER
// =============================================================================

pub struct SampleRunner<'a> {
    config: &'a RunConfig,
}

impl<'a> SampleRunner<'a> {
    pub fn new(config: &'a RunConfig) -> Self {
        Self { config }
    }

    /// Discovered samples after applying the index filter.
    pub fn samples(&self) -> CheckResult<Vec<Sample>> {
        let discoverer = SampleDiscoverer::new(&self.config.naming, self.config.strip);
        let mut samples = discoverer.discover(&self.config.sample_dir)?;
        if let Some(filter) = &self.config.filter {
            samples.retain(|sample| sample.index.to_string_lossy().contains(filter.as_str()));
        }
        Ok(samples)
    }

    /// Processes every sample, feeding reports to `sink`.
    pub fn run(&self, sink: &mut dyn ReportSink) -> CheckResult<RunSummary> {
        let mut summary = RunSummary::default();
        for sample in self.samples()? {
            let report = self.run_sample(sample);
            summary.record(&report);
            sink.report(&report)?;
        }
        info!(%summary, "run finished");
        Ok(summary)
    }

    /// Runs the program on one sample and compares the outputs.
    pub fn run_sample(&self, sample: Sample) -> SampleReport {
        let _span = info_span!("sample", index = %sample.index).entered();

        let exit = match run_program(&self.config.command, &sample.input, &sample.candidate) {
            Ok(exit) => exit,
            Err(err) => {
                debug!(error = %err.chain_message(), "skipping program run");
                ProgramExit::NotStarted {
                    reason: err.chain_message(),
                }
            }
        };

        let verdict = match Comparison::files(&sample.reference, &sample.candidate, self.config.sort) {
            Ok(diff) if diff.is_match() => Verdict::Match,
            Ok(diff) => Verdict::Mismatch { diff },
            Err(err) => {
                debug!(error = %err.chain_message(), "comparison unavailable");
                Verdict::Unavailable {
                    reason: err.chain_message(),
                }
            }
        };

        let matched = verdict == Verdict::Match;
        info!(input = %sample.input_name(), ?exit, matched, "sample done");
        SampleReport {
            sample,
            exit,
            verdict,
        }
    }
}
