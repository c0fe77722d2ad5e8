//! Secondary index traits for service and location lookups.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::StoreError;

/// Which secondary index a key belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IndexKind {
    /// Advertised service → groups.
    Service,
    /// Country → groups.
    Location,
}

impl IndexKind {
    pub const ALL: [IndexKind; 2] = [IndexKind::Service, IndexKind::Location];

    pub fn as_str(&self) -> &'static str {
        match self {
            IndexKind::Service => "service",
            IndexKind::Location => "location",
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value stored under one secondary index key.
///
/// Holds group names only; group data is always re-read from the Record
/// Store. `groups` is every group ever filed under the key, `latest` is the
/// one written most recently and is what single-result lookups return.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub latest: String,
    pub groups: BTreeSet<String>,
}

impl IndexEntry {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let mut groups = BTreeSet::new();
        groups.insert(name.clone());
        Self {
            latest: name,
            groups,
        }
    }

    /// File `name` under this key and make it the latest write.
    pub fn record(&mut self, name: &str) {
        if !self.groups.contains(name) {
            self.groups.insert(name.to_string());
        }
        self.latest = name.to_string();
    }

    /// Apply a write for `name` to an optional existing entry.
    pub fn recorded(existing: Option<IndexEntry>, name: &str) -> IndexEntry {
        match existing {
            Some(mut entry) => {
                entry.record(name);
                entry
            }
            None => IndexEntry::new(name),
        }
    }
}

/// Trait for the service and location secondary indexes.
///
/// Both indexes share one shape, selected by [`IndexKind`].
pub trait GroupIndexStore {
    fn get_index_entry(
        &self,
        kind: IndexKind,
        key: &str,
    ) -> Result<Option<IndexEntry>, StoreError>;

    /// Overwrite a single index entry without touching the Record Store.
    ///
    /// Not for registry operations, which only mutate through
    /// [`RegistryStore::commit`](crate::RegistryStore::commit).
    fn put_index_entry(
        &self,
        kind: IndexKind,
        key: &str,
        entry: &IndexEntry,
    ) -> Result<(), StoreError>;

    /// Every distinct key currently present in the index.
    fn index_keys(&self, kind: IndexKind) -> Result<Vec<String>, StoreError>;

    fn contains_key(&self, kind: IndexKind, key: &str) -> Result<bool, StoreError> {
        self.get_index_entry(kind, key).map(|e| e.is_some())
    }
}
