use crate::branch::BranchDirectory;
use crate::error::Error;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const BRANCH_SUMMARY_FILE: &str = "branch.out";

/// Writes `code,name,total` for every branch, in directory order.
///
/// The lines go to a temporary file beside the target which then replaces it in one rename,
/// so a failed write never leaves a half-written summary behind.
pub fn write_summary<P>(
    directory: P,
    file_name: &str,
    branches: &BranchDirectory,
) -> Result<PathBuf, Error>
where
    P: AsRef<Path>,
{
    let directory = directory.as_ref();
    let path = directory.join(file_name);
    let mut file = NamedTempFile::new_in(directory)?;

    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(file.as_file_mut());

    for branch in branches.iter() {
        wtr.serialize((&branch.code, &branch.name, branch.total))?;
    }
    wtr.flush()?;
    drop(wtr);

    file.as_file().sync_all()?;
    file.persist(&path).map_err(|err| err.error)?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branch::{BranchCode, BranchEntry};
    use std::fs;
    use tempfile::tempdir;

    fn branches(rows: &[(&str, &str, u64)]) -> BranchDirectory {
        let mut branches = BranchDirectory::new();
        for &(code, name, total) in rows {
            let mut entry = BranchEntry::new(BranchCode::parse(code).unwrap(), name.into());
            entry.total = total;
            branches.insert(entry);
        }
        branches
    }

    #[test]
    fn writes_in_directory_order() {
        let dir = tempdir().unwrap();
        let branches = branches(&[
            ("014", "Shinjuku", 2000),
            ("013", "Shibuya", 1000),
            ("001", "Sapporo", 0),
        ]);

        let path = write_summary(dir.path(), BRANCH_SUMMARY_FILE, &branches).unwrap();

        assert_eq!(path, dir.path().join(BRANCH_SUMMARY_FILE));
        assert_eq!(
            fs::read_to_string(path).unwrap(),
            "014,Shinjuku,2000\n013,Shibuya,1000\n001,Sapporo,0\n"
        );
    }

    #[test]
    fn large_totals_are_plain_digits() {
        let dir = tempdir().unwrap();
        let branches = branches(&[("013", "Shibuya", 9_999_999_999)]);

        let path = write_summary(dir.path(), BRANCH_SUMMARY_FILE, &branches).unwrap();

        assert_eq!(fs::read_to_string(path).unwrap(), "013,Shibuya,9999999999\n");
    }

    #[test]
    fn names_are_written_verbatim() {
        let dir = tempdir().unwrap();
        let branches = branches(&[("013", "\"Shibuya\" Station", 1)]);

        let path = write_summary(dir.path(), BRANCH_SUMMARY_FILE, &branches).unwrap();

        assert_eq!(
            fs::read_to_string(path).unwrap(),
            "013,\"Shibuya\" Station,1\n"
        );
    }

    #[test]
    fn empty_directory_writes_empty_file() {
        let dir = tempdir().unwrap();

        let path = write_summary(dir.path(), BRANCH_SUMMARY_FILE, &BranchDirectory::new()).unwrap();

        assert_eq!(fs::read_to_string(path).unwrap(), "");
    }

    #[test]
    fn overwrites_previous_summary() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(BRANCH_SUMMARY_FILE), "stale\nstale\nstale\n").unwrap();

        write_summary(
            dir.path(),
            BRANCH_SUMMARY_FILE,
            &branches(&[("013", "Shibuya", 5)]),
        )
        .unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join(BRANCH_SUMMARY_FILE)).unwrap(),
            "013,Shibuya,5\n"
        );
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn missing_directory() {
        let dir = tempdir().unwrap();

        assert!(matches!(
            write_summary(dir.path().join("gone"), BRANCH_SUMMARY_FILE, &BranchDirectory::new()),
            Err(Error::UnknownFailure(_))
        ));
    }
}
