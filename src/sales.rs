use crate::branch::{BranchCode, BranchDirectory};
use crate::error::Error;
use crate::lines::split_lines;
use log::debug;
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const SEQUENCE_DIGITS: usize = 8;
pub const RECORD_EXTENSION: &str = "rcd";
/// Branch totals must stay strictly below this (at most ten digits).
pub const TOTAL_CEILING: u64 = 10_000_000_000;

/// A daily sales file named `NNNNNNNN.rcd`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFile {
    pub path: PathBuf,
    pub name: String,
    pub sequence: u32,
}

impl RecordFile {
    fn from_path(path: PathBuf) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_owned();
        if !is_record_file_name(&name) || !path.is_file() {
            return None;
        }
        let sequence = name[..SEQUENCE_DIGITS].parse().ok()?;

        Some(Self {
            path,
            name,
            sequence,
        })
    }
}

pub fn is_record_file_name(name: &str) -> bool {
    match name.split_once('.') {
        Some((stem, ext)) => {
            stem.len() == SEQUENCE_DIGITS
                && stem.bytes().all(|b| b.is_ascii_digit())
                && ext == RECORD_EXTENSION
        }
        None => false,
    }
}

pub fn is_amount(line: &str) -> bool {
    !line.is_empty() && line.bytes().all(|b| b.is_ascii_digit())
}

/// Lists the record files in `directory` sorted by sequence number. Directories and any
/// other names are skipped.
pub fn select_record_files<P>(directory: P) -> Result<Vec<RecordFile>, Error>
where
    P: AsRef<Path>,
{
    let mut files = Vec::new();
    for entry in fs::read_dir(directory)? {
        if let Some(file) = RecordFile::from_path(entry?.path()) {
            files.push(file);
        }
    }
    files.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(files)
}

/// Rejects any gap or repeat in the sequence numbers of `files`, which must already be sorted.
/// Run this over the whole set before opening any of them.
pub fn check_sequential(files: &[RecordFile]) -> Result<(), Error> {
    let contiguous = files
        .windows(2)
        .all(|pair| pair[1].sequence == pair[0].sequence + 1);

    if contiguous {
        Ok(())
    } else {
        Err(Error::NonSequentialFiles)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesRecord {
    pub branch: BranchCode,
    pub amount: u64,
}

/// Reads one record file. The branch code must already be known to `branches`.
pub fn parse_record(file: &RecordFile, branches: &BranchDirectory) -> Result<SalesRecord, Error> {
    let text = fs::read_to_string(&file.path)?;
    parse_record_text(&file.name, &text, branches)
}

pub fn parse_record_text(
    name: &str,
    text: &str,
    branches: &BranchDirectory,
) -> Result<SalesRecord, Error> {
    let lines = split_lines(text);
    let [code, amount] = lines.as_slice() else {
        return Err(Error::RecordFormatError(name.to_owned()));
    };

    let branch = branches
        .get(code)
        .map(|entry| entry.code.clone())
        .ok_or_else(|| Error::UnknownBranch(name.to_owned()))?;

    if !is_amount(amount) {
        return Err(Error::InvalidAmount);
    }
    // All digits, so the only way this fails is a value far past the ceiling.
    let amount = amount.parse().map_err(|_| Error::TotalOverflow)?;

    Ok(SalesRecord { branch, amount })
}

/// Folds record files into branch totals, one file at a time.
pub struct Aggregator {
    branches: BranchDirectory,
}

impl Aggregator {
    pub fn new(branches: BranchDirectory) -> Self {
        Self { branches }
    }

    pub fn process_files(&mut self, files: &[RecordFile]) -> Result<(), Error> {
        for file in files {
            let record = parse_record(file, &self.branches)?;
            self.process(&record)?;
            debug!("{}: {} += {}", file.name, record.branch, record.amount);
        }

        Ok(())
    }

    pub fn process(&mut self, record: &SalesRecord) -> Result<(), Error> {
        let entry = self
            .branches
            .get_mut(&record.branch)
            .ok_or_else(|| Error::UnknownBranch(record.branch.to_string()))?;

        let total = entry
            .total
            .checked_add(record.amount)
            .filter(|&total| total < TOTAL_CEILING)
            .ok_or(Error::TotalOverflow)?;
        entry.total = total;

        Ok(())
    }

    pub fn branches(&self) -> &BranchDirectory {
        &self.branches
    }

    pub fn into_branches(self) -> BranchDirectory {
        self.branches
    }
}

pub fn aggregate(branches: BranchDirectory, files: &[RecordFile]) -> Result<BranchDirectory, Error> {
    let mut aggregator = Aggregator::new(branches);
    aggregator.process_files(files)?;
    debug!(
        "folded {} record files into {} branches",
        files.len(),
        aggregator.branches().len()
    );
    Ok(aggregator.into_branches())
}
