//! Handles all user-facing output for the CLI.
//!
//! Diffs go to stdout; per-sample problems and the run summary go to stderr.
//! By centralizing output logic here, every mode prints the same way.

// ============================================================================
// OUTPUT SINKS: DiffSink and JsonSink implementations
// ============================================================================

use std::io::Write;

use serde::Serialize;
use termcolor::{ColorChoice, StandardStream, WriteColor};

use crate::cli::args::ColorMode;
use crate::discovery::Sample;
use crate::errors::CheckResult;
use crate::program::ProgramExit;
use crate::runner::{ReportSink, RunSummary, SampleReport, Verdict};

/// DiffSink: prints each differing sample's diff, like `diff` would.
pub struct DiffSink<W: WriteColor> {
    out: W,
}

impl<W: WriteColor> DiffSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl DiffSink<StandardStream> {
    pub fn stdout(mode: ColorMode) -> Self {
        Self::new(StandardStream::stdout(color_choice(mode)))
    }
}

impl<W: WriteColor> ReportSink for DiffSink<W> {
    fn report(&mut self, report: &SampleReport) -> CheckResult<()> {
        print_problems(report);
        if let Verdict::Mismatch { diff } = &report.verdict {
            diff.write_to(&mut self.out)?;
            self.out.flush()?;
        }
        Ok(())
    }
}

/// JsonSink: collects reports for a single JSON document at the end.
#[derive(Default)]
pub struct JsonSink {
    reports: Vec<SampleReport>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: &'a RunSummary,
    samples: &'a [SampleReport],
}

impl JsonSink {
    pub fn write<W: Write>(&self, summary: &RunSummary, out: &mut W) -> CheckResult<()> {
        let report = JsonReport {
            summary,
            samples: &self.reports,
        };
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
        Ok(())
    }
}

impl ReportSink for JsonSink {
    fn report(&mut self, report: &SampleReport) -> CheckResult<()> {
        print_problems(report);
        self.reports.push(report.clone());
        Ok(())
    }
}

// ============================================================================
// CORE OUTPUT FUNCTIONS
// ============================================================================

/// Prints the discovered samples, one per line.
pub fn print_samples<W: Write>(samples: &[Sample], out: &mut W) -> CheckResult<()> {
    for sample in samples {
        writeln!(
            out,
            "{}\t{}\t{}\t{}",
            sample.index,
            sample.input.display(),
            sample.reference.display(),
            sample.candidate.display()
        )?;
    }
    Ok(())
}

/// Prints the one-line run summary to stderr.
pub fn print_summary(summary: &RunSummary) {
    eprintln!("{}", summary);
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn print_problems(report: &SampleReport) {
    let name = report.sample.input_name();
    match &report.exit {
        ProgramExit::Success => {}
        ProgramExit::Failed { code: Some(code) } => {
            eprintln!("sample-check: {}: program exited with status {}", name, code)
        }
        ProgramExit::Failed { code: None } => {
            eprintln!("sample-check: {}: program terminated by signal", name)
        }
        ProgramExit::NotStarted { reason } => eprintln!("sample-check: {}: {}", name, reason),
    }
    if let Verdict::Unavailable { reason } = &report.verdict {
        eprintln!("sample-check: {}: {}", name, reason);
    }
}

fn color_choice(mode: ColorMode) -> ColorChoice {
    match mode {
        ColorMode::Always => ColorChoice::Always,
        ColorMode::Never => ColorChoice::Never,
        ColorMode::Auto if atty::is(atty::Stream::Stdout) => ColorChoice::Auto,
        ColorMode::Auto => ColorChoice::Never,
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use termcolor::NoColor;

    use super::*;
    use crate::compare::{split_lines, Comparison};
    use crate::index::IndexToken;

    fn report(verdict: Verdict) -> SampleReport {
        SampleReport {
            sample: Sample {
                index: IndexToken::new("1"),
                input: PathBuf::from("sample/input1.csv"),
                reference: PathBuf::from("sample/output1.csv"),
                candidate: PathBuf::from("sample/myoutput1.csv"),
            },
            exit: ProgramExit::Success,
            verdict,
        }
    }

    #[test]
    fn diff_sink_prints_only_mismatches() {
        let mut sink = DiffSink::new(NoColor::new(Vec::new()));
        sink.report(&report(Verdict::Match)).unwrap();
        assert!(sink.out.get_ref().is_empty());

        let diff = Comparison::sorted(split_lines("a\n"), split_lines("b\n"));
        sink.report(&report(Verdict::Mismatch { diff })).unwrap();
        let printed = String::from_utf8(sink.into_inner().into_inner()).unwrap();
        assert_eq!(printed, "1c1\n< a\n---\n> b\n");
    }

    #[test]
    fn json_report_has_summary_and_samples() {
        let mut sink = JsonSink::default();
        let mut summary = RunSummary::default();
        let sample = report(Verdict::Match);
        summary.record(&sample);
        sink.report(&sample).unwrap();

        let mut out = Vec::new();
        sink.write(&summary, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["summary"]["matched"], 1);
        assert_eq!(value["samples"][0]["verdict"], "match");
        assert_eq!(value["samples"][0]["exit"]["status"], "success");
        assert_eq!(value["samples"][0]["sample"]["index"], "1");
    }

    #[test]
    fn sample_listing_is_tab_separated() {
        let mut out = Vec::new();
        print_samples(&[report(Verdict::Match).sample], &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "1\tsample/input1.csv\tsample/output1.csv\tsample/myoutput1.csv\n"
        );
    }
}
