//! LMDB database integrity checks.
//!
//! Run on startup to detect corruption early, before the registry starts
//! serving requests.

use std::path::Path;
use std::sync::Arc;

use heed::Env;

use crate::environment::{GROUPS_DB, LOCATION_INDEX_DB, META_DB, SERVICE_INDEX_DB};
use crate::LmdbError;

/// Summary of an integrity check run.
#[derive(Debug)]
pub struct IntegrityReport {
    pub databases_checked: u32,
    pub total_entries: u64,
    pub errors: Vec<String>,
}

impl IntegrityReport {
    /// Returns `true` if no errors were detected.
    pub fn is_healthy(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Database names that we expect to exist in a valid registry environment.
const EXPECTED_DATABASES: &[&str] = &[GROUPS_DB, SERVICE_INDEX_DB, LOCATION_INDEX_DB, META_DB];

/// Check LMDB database integrity.
///
/// Opens each expected database and attempts to count entries. Any read
/// failures are recorded in the report rather than causing a hard error.
pub fn check_integrity(env: &Arc<Env>) -> Result<IntegrityReport, LmdbError> {
    let mut report = IntegrityReport {
        databases_checked: 0,
        total_entries: 0,
        errors: Vec::new(),
    };

    let rtxn = env.read_txn()?;

    for &db_name in EXPECTED_DATABASES {
        match env.open_database::<heed::types::Bytes, heed::types::Bytes>(&rtxn, Some(db_name)) {
            Ok(Some(db)) => {
                report.databases_checked += 1;
                match db.len(&rtxn) {
                    Ok(count) => {
                        report.total_entries += count;
                    }
                    Err(e) => {
                        report
                            .errors
                            .push(format!("failed to read database '{}': {}", db_name, e));
                    }
                }
            }
            Ok(None) => {
                report
                    .errors
                    .push(format!("database '{}' is missing", db_name));
            }
            Err(e) => {
                report
                    .errors
                    .push(format!("failed to open database '{}': {}", db_name, e));
            }
        }
    }

    Ok(report)
}

/// Check if the LMDB data directory looks valid before opening.
///
/// Returns `Ok(())` for a fresh (nonexistent) directory. Returns an error
/// if the directory exists but `data.mdb` is missing, which suggests
/// corruption or misconfiguration.
pub fn check_data_dir(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Ok(()); // Fresh start
    }
    let data_file = path.join("data.mdb");
    if !data_file.exists() {
        return Err(format!(
            "LMDB directory exists but data.mdb is missing at {}",
            path.display()
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LmdbEnvironment;

    #[test]
    fn check_data_dir_fresh_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = check_data_dir(&dir.path().join("not-created-yet"));
        assert!(result.is_ok());
    }

    #[test]
    fn check_data_dir_rejects_empty_existing_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(check_data_dir(dir.path()).is_err());
    }

    #[test]
    fn opened_environment_is_healthy() {
        let dir = tempfile::tempdir().expect("tempdir");
        let env = LmdbEnvironment::open(dir.path(), 10 * 1024 * 1024).expect("open");
        assert!(check_data_dir(dir.path()).is_ok());

        let report = check_integrity(env.env()).expect("check");
        assert!(report.is_healthy(), "errors: {:?}", report.errors);
        assert_eq!(report.databases_checked, EXPECTED_DATABASES.len() as u32);
        // Schema version stamp in meta.
        assert_eq!(report.total_entries, 1);
    }

    #[test]
    fn unhealthy_report() {
        let report = IntegrityReport {
            databases_checked: 4,
            total_entries: 100,
            errors: vec!["corruption detected".to_string()],
        };
        assert!(!report.is_healthy());
    }
}
