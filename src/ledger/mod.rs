mod path;
mod record;
mod store;

use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use thiserror::Error;

use crate::scanner::SizeMeasurement;

pub use path::resolve_real_path;
pub use record::{LedgerRecord, TIMESTAMP_FORMAT};
pub use store::{Ledger, LoadReport};

/// Default ledger file, relative to the working directory.
pub const DEFAULT_LEDGER: &str = "filesize.txt";

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Invalid case id {0:?}: must be non-empty and contain no whitespace")]
    InvalidCaseId(String),
    #[error("Failed to resolve path {}: {source}", path.display())]
    Resolve {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to read ledger {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to write ledger {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct UpdateOutcome {
    pub record: LedgerRecord,
    pub malformed: usize,
}

pub fn validate_case_id(case_id: &str) -> Result<(), LedgerError> {
    if case_id.is_empty() || case_id.chars().any(char::is_whitespace) {
        return Err(LedgerError::InvalidCaseId(case_id.to_string()));
    }
    Ok(())
}

pub fn timestamp_now() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Record `measurement` for `case_id`, keeping every other case untouched.
pub fn update(
    ledger_path: &Path,
    case_id: &str,
    measurement: &SizeMeasurement,
    source_dir: &Path,
) -> Result<UpdateOutcome, LedgerError> {
    validate_case_id(case_id)?;

    let real_path = resolve_real_path(source_dir).map_err(|source| LedgerError::Resolve {
        path: source_dir.to_path_buf(),
        source,
    })?;
    let record = LedgerRecord::new(
        case_id,
        measurement,
        timestamp_now(),
        real_path.to_string_lossy().into_owned(),
    );

    let LoadReport {
        mut ledger,
        malformed,
    } = Ledger::load(ledger_path).map_err(|source| LedgerError::Read {
        path: ledger_path.to_path_buf(),
        source,
    })?;
    if malformed > 0 {
        tracing::debug!(
            path = %ledger_path.display(),
            malformed,
            "dropped malformed ledger lines"
        );
    }

    if ledger.is_empty() {
        tracing::debug!(path = %ledger_path.display(), "starting new ledger");
    }
    ledger.upsert(record.clone());
    ledger.save(ledger_path).map_err(|source| LedgerError::Write {
        path: ledger_path.to_path_buf(),
        source,
    })?;

    tracing::info!(
        case_id,
        size = %record.size.trim(),
        records = ledger.len(),
        "ledger updated"
    );

    Ok(UpdateOutcome { record, malformed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Unit;
    use chrono::NaiveDateTime;
    use std::fs;
    use tempfile::tempdir;

    fn measurement(bytes: u64) -> SizeMeasurement {
        SizeMeasurement {
            bytes,
            files: 1,
            unit: Unit::best_for(bytes),
        }
    }

    fn lines(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_validate_case_id() {
        assert!(validate_case_id("run1").is_ok());
        assert!(validate_case_id("case-01_b.x").is_ok());
        assert!(validate_case_id("").is_err());
        assert!(validate_case_id("two words").is_err());
        assert!(validate_case_id("tab\there").is_err());
    }

    #[test]
    fn test_timestamp_format() {
        let now = timestamp_now();
        assert_eq!(now.len(), 19);
        assert!(NaiveDateTime::parse_from_str(&now, TIMESTAMP_FORMAT).is_ok());
    }

    #[test]
    fn test_update_creates_ledger() {
        let dir = tempdir().unwrap();
        let ledger_path = dir.path().join("filesize.txt");
        let measurement = SizeMeasurement {
            bytes: 537_227_428,
            files: 3,
            unit: Unit::MB,
        };

        let outcome = update(&ledger_path, "run1", &measurement, Path::new("/data/run1")).unwrap();

        let lines = lines(&ledger_path);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("run1       512.34 MB "));
        assert!(lines[0].ends_with(" /data/run1"));
        assert_eq!(outcome.record.timestamp.len(), 19);
        assert_eq!(outcome.malformed, 0);
    }

    #[test]
    fn test_update_other_case_leaves_record_identical() {
        let dir = tempdir().unwrap();
        let ledger_path = dir.path().join("filesize.txt");

        update(&ledger_path, "X", &measurement(4096), Path::new("/data/X")).unwrap();
        let before = lines(&ledger_path);

        update(&ledger_path, "Y", &measurement(10), Path::new("/data/Y")).unwrap();
        let after = lines(&ledger_path);

        assert_eq!(after.len(), 2);
        assert_eq!(after[0], before[0]);
        assert!(after[1].starts_with("Y           10.00 B "));
    }

    #[test]
    fn test_update_overwrites_same_case() {
        let dir = tempdir().unwrap();
        let ledger_path = dir.path().join("filesize.txt");

        update(&ledger_path, "X", &measurement(4096), Path::new("/data/X")).unwrap();
        update(&ledger_path, "X", &measurement(2048), Path::new("/data/X")).unwrap();

        let lines = lines(&ledger_path);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("X            2.00 kB "));
    }

    #[test]
    fn test_update_keeps_sorted_order() {
        let dir = tempdir().unwrap();
        let ledger_path = dir.path().join("filesize.txt");

        for case_id in ["delta", "alpha", "charlie", "bravo"] {
            update(&ledger_path, case_id, &measurement(1), Path::new("/d")).unwrap();
        }

        let ids: Vec<String> = lines(&ledger_path)
            .iter()
            .map(|line| line.split_whitespace().next().unwrap().to_string())
            .collect();
        assert_eq!(ids, ["alpha", "bravo", "charlie", "delta"]);
    }

    #[test]
    fn test_update_drops_malformed_lines() {
        let dir = tempdir().unwrap();
        let ledger_path = dir.path().join("filesize.txt");
        let good = "keep         2.00 kB 2024-03-01 12:30:45 /data/keep";
        fs::write(&ledger_path, format!("{good}\nbroken line\n")).unwrap();

        let outcome = update(&ledger_path, "new", &measurement(1), Path::new("/d")).unwrap();

        assert_eq!(outcome.malformed, 1);
        let lines = lines(&ledger_path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], good);
        assert!(lines[1].starts_with("new "));
    }

    #[test]
    fn test_update_keeps_foreign_line_for_other_case() {
        let dir = tempdir().unwrap();
        let ledger_path = dir.path().join("filesize.txt");
        fs::write(&ledger_path, "caseA 2.0 KiB 2024-03-01 12:30:45 /p\n").unwrap();

        let outcome = update(&ledger_path, "caseB", &measurement(1), Path::new("/d")).unwrap();

        assert_eq!(outcome.malformed, 0);
        let lines = lines(&ledger_path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "caseA         2.0 KiB 2024-03-01 12:30:45 /p");
        assert!(lines[1].starts_with("caseB "));
    }

    #[test]
    fn test_update_rejects_whitespace_case_id_before_io() {
        let dir = tempdir().unwrap();
        let ledger_path = dir.path().join("filesize.txt");

        let err = update(&ledger_path, "bad id", &measurement(1), Path::new("/d")).unwrap_err();

        assert!(matches!(err, LedgerError::InvalidCaseId(_)));
        assert!(!ledger_path.exists());
    }

    #[test]
    fn test_update_unreadable_ledger_is_error() {
        let dir = tempdir().unwrap();
        // A directory cannot be read as a ledger
        let err = update(dir.path(), "X", &measurement(1), Path::new("/d")).unwrap_err();
        assert!(matches!(err, LedgerError::Read { .. }));
    }
}
