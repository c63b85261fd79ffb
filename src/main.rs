mod branch;
mod error;
mod lines;
mod pipeline;
mod sales;
mod summary;

use clap::{error::ErrorKind, Parser};
use error::Error;
use log::{debug, error, info};
use pipeline::Pipeline;
use std::{path::PathBuf, process::ExitCode};

/// Totals the daily sales files in a directory per branch and writes `branch.out`
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Directory holding `branch.lst` and the `NNNNNNNN.rcd` sales files
    directory: PathBuf,
}

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Error> {
    let args = args()?;
    let mut pipeline = Pipeline::new(&args.directory);

    match pipeline.run() {
        Ok(report) => {
            info!(
                "{} sales files totalled across {} branches into {}",
                report.files,
                report.branches,
                report.output.display()
            );
            Ok(())
        }
        Err(err) => {
            if let Error::UnknownFailure(source) = &err {
                error!("failed after stage '{}': {}", pipeline.stage(), source);
            } else {
                debug!("failed after stage '{}': {:?}", pipeline.stage(), err);
            }
            Err(err)
        }
    }
}

fn args() -> Result<Args, Error> {
    Args::try_parse().or_else(|err| match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
        _ => {
            debug!("{err}");
            Err(Error::BadInvocation)
        }
    })
}
