//! The helm-spec Command-Line Interface.
//!
//! Validates the spec directory, runs the suite and prints the report. Load
//! errors end the run without a report; test failures are reported first and
//! then turn into a non-zero exit.

use std::process;

use clap::Parser;

use crate::{
    diagnostics::{HelmSpecError, Result},
    discovery::SpecDiscoverer,
    logging,
    report::report,
    runner::HelmTestRunner,
};

pub mod args;

pub use args::HelmSpecArgs;

/// The main entry point for the CLI.
pub fn run() {
    let args = HelmSpecArgs::parse();
    logging::init(&args.log_level);

    match execute(&args) {
        Ok(output) => print!("{output}"),
        Err(Failure::Report(output)) => {
            print!("{output}");
            eprintln!("{:?}", miette::Report::new(HelmSpecError::SuiteFailed));
            process::exit(1);
        }
        Err(Failure::Fatal(e)) => {
            eprintln!("{:?}", miette::Report::new(e));
            process::exit(1);
        }
    }
}

/// Why a run did not succeed.
#[derive(Debug)]
pub enum Failure {
    /// The suite ran but some test failed. Holds the rendered report.
    Report(String),
    /// Nothing could be run or reported.
    Fatal(HelmSpecError),
}

impl From<HelmSpecError> for Failure {
    fn from(e: HelmSpecError) -> Self {
        Failure::Fatal(e)
    }
}

/// Runs the suite described by `args` and renders the report.
pub fn execute(args: &HelmSpecArgs) -> std::result::Result<String, Failure> {
    let spec_files = discover(args)?;
    let runner = HelmTestRunner::from_config(&args.runner_config());
    let result = runner.run(&spec_files)?;
    let output = report(&result, &args.report_settings())?;
    if !result.succeeded {
        return Err(Failure::Report(output));
    }
    Ok(output)
}

fn discover(args: &HelmSpecArgs) -> Result<Vec<std::path::PathBuf>> {
    SpecDiscoverer::validate_spec_dir(&args.spec_dir)?;
    let files = SpecDiscoverer::discover_spec_files(&args.spec_dir)?;
    tracing::debug!(count = files.len(), dir = %args.spec_dir.display(), "discovered spec files");
    Ok(files)
}
