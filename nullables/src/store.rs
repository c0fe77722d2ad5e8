//! Nullable store: thread-safe in-memory registry storage for testing.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use volunteer_store::meta::NEXT_GROUP_ID_KEY;
use volunteer_store::{
    GroupIndexStore, GroupStore, GroupWrite, IndexEntry, IndexKind, MetaStore, RegistryStore,
    StoreError,
};
use volunteer_types::Group;

#[derive(Default)]
struct Tables {
    groups: BTreeMap<String, Group>,
    service_index: BTreeMap<String, IndexEntry>,
    location_index: BTreeMap<String, IndexEntry>,
    meta: BTreeMap<String, Vec<u8>>,
}

impl Tables {
    fn index(&self, kind: IndexKind) -> &BTreeMap<String, IndexEntry> {
        match kind {
            IndexKind::Service => &self.service_index,
            IndexKind::Location => &self.location_index,
        }
    }

    fn index_mut(&mut self, kind: IndexKind) -> &mut BTreeMap<String, IndexEntry> {
        match kind {
            IndexKind::Service => &mut self.service_index,
            IndexKind::Location => &mut self.location_index,
        }
    }
}

/// An in-memory record store, index store and meta store for testing.
///
/// Every table sits behind one mutex, so [`RegistryStore::commit`] is
/// atomic. Iteration is in key order.
pub struct NullStore {
    tables: Mutex<Tables>,
    fail_commits: AtomicBool,
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            fail_commits: AtomicBool::new(false),
        }
    }

    /// Make every subsequent commit fail with a backend error (or stop).
    pub fn fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupStore for NullStore {
    fn get_group(&self, name: &str) -> Result<Option<Group>, StoreError> {
        Ok(self.tables().groups.get(name).cloned())
    }

    fn put_group(&self, group: &Group) -> Result<(), StoreError> {
        self.tables()
            .groups
            .insert(group.name.clone(), group.clone());
        Ok(())
    }

    fn iter_groups(&self) -> Result<Vec<Group>, StoreError> {
        Ok(self.tables().groups.values().cloned().collect())
    }

    fn group_count(&self) -> Result<u64, StoreError> {
        Ok(self.tables().groups.len() as u64)
    }
}

impl GroupIndexStore for NullStore {
    fn get_index_entry(
        &self,
        kind: IndexKind,
        key: &str,
    ) -> Result<Option<IndexEntry>, StoreError> {
        Ok(self.tables().index(kind).get(key).cloned())
    }

    fn put_index_entry(
        &self,
        kind: IndexKind,
        key: &str,
        entry: &IndexEntry,
    ) -> Result<(), StoreError> {
        self.tables()
            .index_mut(kind)
            .insert(key.to_string(), entry.clone());
        Ok(())
    }

    fn index_keys(&self, kind: IndexKind) -> Result<Vec<String>, StoreError> {
        Ok(self.tables().index(kind).keys().cloned().collect())
    }
}

impl MetaStore for NullStore {
    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.tables()
            .meta
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.tables().meta.get(key).cloned())
    }
}

impl RegistryStore for NullStore {
    type Groups = Self;
    type Indexes = Self;
    type Meta = Self;

    fn groups(&self) -> &Self {
        self
    }

    fn indexes(&self) -> &Self {
        self
    }

    fn meta(&self) -> &Self {
        self
    }

    fn commit(&self, write: &GroupWrite) -> Result<(), StoreError> {
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("null store commit failure".into()));
        }
        let mut tables = self.tables();
        let name = &write.group.name;
        tables.groups.insert(name.clone(), write.group.clone());
        for (kind, key) in &write.index_keys {
            let index = tables.index_mut(*kind);
            let entry = IndexEntry::recorded(index.remove(key), name);
            index.insert(key.clone(), entry);
        }
        if let Some(next_id) = write.next_group_id {
            tables
                .meta
                .insert(NEXT_GROUP_ID_KEY.to_string(), next_id.to_be_bytes().to_vec());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use volunteer_store::check_consistency;
    use volunteer_types::Timestamp;

    fn test_group(name: &str, service: &str, country: &str) -> Group {
        Group {
            id: 1,
            name: name.to_string(),
            country: country.to_string(),
            contact_number: "+254700000000".to_string(),
            official_email: "info@example.org".to_string(),
            service: service.to_string(),
            created_at: Timestamp::new(1000),
            members: Vec::new(),
        }
    }

    #[test]
    fn test_commit_updates_every_table() {
        let store = NullStore::new();
        let group = test_group("GreenEarth", "tree-planting", "Kenya");
        store
            .commit(&GroupWrite::new(group.clone()).advancing_id_to(2))
            .unwrap();

        assert_eq!(store.get_group("GreenEarth").unwrap(), Some(group));
        assert!(store.contains_key(IndexKind::Service, "tree-planting").unwrap());
        assert!(store.contains_key(IndexKind::Location, "Kenya").unwrap());
        assert_eq!(store.next_group_id().unwrap(), 2);
    }

    #[test]
    fn test_failed_commit_changes_nothing() {
        let store = NullStore::new();
        store.fail_commits(true);
        let group = test_group("GreenEarth", "tree-planting", "Kenya");
        assert!(store.commit(&GroupWrite::new(group)).is_err());

        assert_eq!(store.group_count().unwrap(), 0);
        assert!(store.index_keys(IndexKind::Service).unwrap().is_empty());
        assert_eq!(store.next_group_id().unwrap(), 1);
    }

    #[test]
    fn test_group_not_found() {
        let store = NullStore::new();
        assert!(store.get_group("nobody").unwrap().is_none());
        assert!(!store.exists("nobody").unwrap());
    }

    #[test]
    fn test_consistent_after_commits() {
        let store = NullStore::new();
        store
            .commit(&GroupWrite::new(test_group("A", "cleanup", "Ghana")))
            .unwrap();
        store
            .commit(&GroupWrite::new(test_group("B", "cleanup", "Togo")))
            .unwrap();

        let report = check_consistency(&store).unwrap();
        assert!(report.is_consistent(), "errors: {:?}", report.errors);
        assert_eq!(report.groups_checked, 2);
        assert_eq!(report.index_keys_checked, 3);
    }

    #[test]
    fn test_consistency_flags_unindexed_group() {
        let store = NullStore::new();
        // Record write without index writes.
        store.put_group(&test_group("Orphan", "cleanup", "Ghana")).unwrap();

        let report = check_consistency(&store).unwrap();
        assert!(!report.is_consistent());
        assert_eq!(report.errors.len(), 2);
    }
}
