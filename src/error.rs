use std::io;
use thiserror::Error;

/// Every way a run can fail. Each variant's display text is the one message shown to the operator.
#[derive(Debug, Error)]
pub enum Error {
    #[error("an unexpected error occurred")]
    BadInvocation,
    #[error("branch definition file does not exist")]
    MasterFileMissing,
    #[error("branch definition file has an invalid format")]
    MasterFileMalformed,
    #[error("sales file names are not sequential")]
    NonSequentialFiles,
    #[error("{0} has an invalid format")]
    RecordFormatError(String),
    #[error("{0} has an invalid branch code")]
    UnknownBranch(String),
    #[error("an unexpected error occurred")]
    InvalidAmount,
    #[error("total amount exceeded 10 digits")]
    TotalOverflow,
    #[error("an unexpected error occurred")]
    UnknownFailure(#[from] io::Error),
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::UnknownFailure(err.into())
    }
}
