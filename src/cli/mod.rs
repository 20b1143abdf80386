//! The sample-check Command-Line Interface.
//!
//! This module is the main entry point for the binary and orchestrates
//! the library: resolve the configuration, then list or run the samples.

use std::io;

use clap::Parser;
use tracing::debug;

use crate::cli::args::CheckArgs;
use crate::cli::output::{print_samples, print_summary, DiffSink, JsonSink};
use crate::config::{FileConfig, ProgramCommand, RunConfig};
use crate::errors::CheckResult;
use crate::runner::SampleRunner;

pub mod args;
pub mod output;

/// The main entry point for the CLI. Returns the process exit status.
pub fn run() -> miette::Result<i32> {
    let args = CheckArgs::parse();
    Ok(execute(args)?)
}

/// Runs the tool for already-parsed arguments.
pub fn execute(args: CheckArgs) -> CheckResult<i32> {
    let config = resolve_config(&args)?;
    debug!(?config, "resolved configuration");
    let runner = SampleRunner::new(&config);

    if args.list {
        let samples = runner.samples()?;
        print_samples(&samples, &mut io::stdout().lock())?;
        return Ok(0);
    }

    let summary = if args.json {
        let mut sink = JsonSink::default();
        let summary = runner.run(&mut sink)?;
        sink.write(&summary, &mut io::stdout().lock())?;
        summary
    } else {
        let mut sink = DiffSink::stdout(args.color);
        runner.run(&mut sink)?
    };

    print_summary(&summary);
    Ok(summary.exit_code(config.strict))
}

/// Defaults, then the config file, then command-line flags.
pub fn resolve_config(args: &CheckArgs) -> CheckResult<RunConfig> {
    let mut config = RunConfig::default();
    if let Some(file) = FileConfig::discover(args.config.as_deref())? {
        file.apply(&mut config)?;
    }

    if let Some(dir) = &args.dir {
        config.sample_dir = dir.clone();
    }
    if !args.command.is_empty() {
        config.command = ProgramCommand::from_words(args.command.iter().cloned())?;
    }
    if args.strict {
        config.strict = true;
    }
    if let Some(strip) = args.strip {
        config.strip = strip;
    }
    if args.no_sort {
        config.sort = false;
    }
    if args.filter.is_some() {
        config.filter = args.filter.clone();
    }
    Ok(config)
}
