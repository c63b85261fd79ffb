use crate::error::Error;
use crate::lines::split_lines;
use log::debug;
use serde::Serialize;
use std::{collections::HashMap, fmt, fs, path::Path};

pub const BRANCH_LIST_FILE: &str = "branch.lst";
pub const BRANCH_CODE_LEN: usize = 3;

/// A three digit branch code, e.g. `013`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct BranchCode(String);

impl BranchCode {
    pub fn parse(code: &str) -> Option<Self> {
        is_branch_code(code).then(|| Self(code.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BranchCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn is_branch_code(code: &str) -> bool {
    code.len() == BRANCH_CODE_LEN && code.bytes().all(|b| b.is_ascii_digit())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchEntry {
    pub code: BranchCode,
    pub name: String,
    pub total: u64,
}

impl BranchEntry {
    pub fn new(code: BranchCode, name: String) -> Self {
        Self {
            code,
            name,
            total: 0,
        }
    }
}

/// Branches keyed by code, iterated in the order they were inserted.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BranchDirectory {
    entries: Vec<BranchEntry>,
    index: HashMap<BranchCode, usize>,
}

impl BranchDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repeated code keeps its first position but takes the later name and a zero total.
    pub fn insert(&mut self, entry: BranchEntry) {
        match self.index.get(&entry.code) {
            Some(&i) => self.entries[i] = entry,
            None => {
                self.index.insert(entry.code.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    pub fn get(&self, code: &str) -> Option<&BranchEntry> {
        let code = BranchCode::parse(code)?;
        self.index.get(&code).map(|&i| &self.entries[i])
    }

    pub fn get_mut(&mut self, code: &BranchCode) -> Option<&mut BranchEntry> {
        let i = *self.index.get(code)?;
        self.entries.get_mut(i)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BranchEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Reads `branch.lst` from `directory`. Every line must be `code,name`; any other line
/// rejects the whole file, blank lines included.
pub fn load_master<P>(directory: P) -> Result<BranchDirectory, Error>
where
    P: AsRef<Path>,
{
    let path = directory.as_ref().join(BRANCH_LIST_FILE);
    if !path.exists() {
        return Err(Error::MasterFileMissing);
    }

    let text = fs::read_to_string(&path)?;
    let mut branches = BranchDirectory::new();
    for line in split_lines(&text) {
        branches.insert(parse_master_line(line).ok_or(Error::MasterFileMalformed)?);
    }

    if branches.is_empty() {
        debug!("{} lists no branches", path.display());
    } else {
        debug!("loaded {} branches from {}", branches.len(), path.display());
    }
    Ok(branches)
}

fn parse_master_line(line: &str) -> Option<BranchEntry> {
    let fields: Vec<&str> = line.split(',').collect();
    let [code, name] = fields.as_slice() else {
        return None;
    };
    if name.is_empty() {
        return None;
    }

    Some(BranchEntry::new(BranchCode::parse(code)?, name.to_string()))
}
