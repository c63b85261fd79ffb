use crate::branch::load_master;
use crate::error::Error;
use crate::sales::{aggregate, check_sequential, select_record_files};
use crate::summary::{write_summary, BRANCH_SUMMARY_FILE};
use log::debug;
use std::{
    fmt,
    path::{Path, PathBuf},
};

/// How far a run got. Stages only ever move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Start,
    MasterLoaded,
    FilesSelected,
    FilesValidated,
    Aggregated,
    Written,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::MasterLoaded => "master loaded",
            Stage::FilesSelected => "files selected",
            Stage::FilesValidated => "files validated",
            Stage::Aggregated => "aggregated",
            Stage::Written => "written",
        };
        f.write_str(name)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct RunReport {
    pub branches: usize,
    pub files: usize,
    pub output: PathBuf,
}

pub struct Pipeline {
    directory: PathBuf,
    stage: Stage,
}

impl Pipeline {
    pub fn new<P>(directory: P) -> Self
    where
        P: AsRef<Path>,
    {
        Self {
            directory: directory.as_ref().to_path_buf(),
            stage: Stage::Start,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Runs every stage in order, stopping at the first failure.
    /// `branch.out` is only touched once all record files have been folded in.
    pub fn run(&mut self) -> Result<RunReport, Error> {
        let branches = load_master(&self.directory)?;
        self.advance(Stage::MasterLoaded);

        let files = select_record_files(&self.directory)?;
        self.advance(Stage::FilesSelected);

        check_sequential(&files)?;
        self.advance(Stage::FilesValidated);

        let branches = aggregate(branches, &files)?;
        self.advance(Stage::Aggregated);

        let output = write_summary(&self.directory, BRANCH_SUMMARY_FILE, &branches)?;
        self.advance(Stage::Written);

        Ok(RunReport {
            branches: branches.len(),
            files: files.len(),
            output,
        })
    }

    fn advance(&mut self, stage: Stage) {
        debug!("stage: {} -> {}", self.stage, stage);
        self.stage = stage;
    }
}
