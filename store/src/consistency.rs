//! Cross-table consistency checks.
//!
//! The indexes are derived from the record store; these checks detect any
//! drift between them.

use crate::{GroupIndexStore, GroupStore, IndexKind, RegistryStore, StoreError};

/// Summary of a consistency check run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConsistencyReport {
    pub groups_checked: u64,
    pub index_keys_checked: u64,
    pub errors: Vec<String>,
}

impl ConsistencyReport {
    /// Returns `true` if no errors were detected.
    pub fn is_consistent(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check that the record store and both indexes agree.
///
/// - every group is filed under its own service and its own country;
/// - every index entry's `latest` is one of its `groups`;
/// - every group name in every index resolves in the record store.
pub fn check_consistency<S: RegistryStore>(store: &S) -> Result<ConsistencyReport, StoreError> {
    let mut report = ConsistencyReport::default();
    let groups = store.groups();
    let indexes = store.indexes();

    for group in groups.iter_groups()? {
        report.groups_checked += 1;
        for (kind, key) in [
            (IndexKind::Service, &group.service),
            (IndexKind::Location, &group.country),
        ] {
            let filed = indexes
                .get_index_entry(kind, key)?
                .is_some_and(|entry| entry.groups.contains(&group.name));
            if !filed {
                report.errors.push(format!(
                    "group '{}' missing from {} index under '{}'",
                    group.name, kind, key
                ));
            }
        }
    }

    for kind in IndexKind::ALL {
        for key in indexes.index_keys(kind)? {
            report.index_keys_checked += 1;
            let Some(entry) = indexes.get_index_entry(kind, &key)? else {
                report
                    .errors
                    .push(format!("{} index key '{}' listed but unreadable", kind, key));
                continue;
            };
            if !entry.groups.contains(&entry.latest) {
                report.errors.push(format!(
                    "{} index key '{}' latest '{}' not in its group set",
                    kind, key, entry.latest
                ));
            }
            for name in &entry.groups {
                if !groups.exists(name)? {
                    report.errors.push(format!(
                        "{} index key '{}' points at unknown group '{}'",
                        kind, key, name
                    ));
                }
            }
        }
    }

    Ok(report)
}
