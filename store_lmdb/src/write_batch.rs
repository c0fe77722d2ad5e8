//! Write batching: groups several table updates into a single LMDB write
//! transaction so a registry mutation lands in every database or in none.
//!
//! # Usage
//!
//! ```ignore
//! let mut batch = env.write_batch()?;
//! batch.put_group(&group)?;
//! batch.record_index(IndexKind::Service, &group.service, &group.name)?;
//! batch.record_index(IndexKind::Location, &group.country, &group.name)?;
//! batch.commit()?;
//! ```
//!
//! If the batch is dropped without calling [`WriteBatch::commit`], all
//! operations are rolled back (the underlying LMDB transaction is aborted).

use heed::types::{Bytes, Str};
use heed::{Database, RwTxn};

use volunteer_store::meta::NEXT_GROUP_ID_KEY;
use volunteer_store::{IndexEntry, IndexKind, StoreError};
use volunteer_types::Group;

use crate::environment::LmdbEnvironment;
use crate::LmdbError;

/// A write batch spanning every registry database.
pub struct WriteBatch<'a> {
    txn: RwTxn<'a>,
    env: &'a LmdbEnvironment,
}

impl<'a> WriteBatch<'a> {
    /// Begin a new write batch.
    pub(crate) fn new(env: &'a LmdbEnvironment) -> Result<Self, StoreError> {
        let txn = env.env().write_txn().map_err(LmdbError::from)?;
        Ok(Self { txn, env })
    }

    fn index_db(&self, kind: IndexKind) -> Database<Str, Bytes> {
        match kind {
            IndexKind::Service => self.env.service_index_db,
            IndexKind::Location => self.env.location_index_db,
        }
    }

    // ── Group operations ────────────────────────────────────────────────

    /// Put a group record into the batch, keyed by its name.
    pub fn put_group(&mut self, group: &Group) -> Result<(), StoreError> {
        let bytes = bincode::serialize(group).map_err(LmdbError::from)?;
        self.env
            .groups_db
            .put(&mut self.txn, &group.name, &bytes)
            .map_err(LmdbError::from)?;
        Ok(())
    }

    // ── Index operations ────────────────────────────────────────────────

    /// File `group_name` under `key` in the chosen index, making it the
    /// latest write for that key.
    ///
    /// Reads the existing entry through the batch's own transaction, so
    /// earlier writes in the same batch are visible.
    pub fn record_index(
        &mut self,
        kind: IndexKind,
        key: &str,
        group_name: &str,
    ) -> Result<(), StoreError> {
        let db = self.index_db(kind);
        let existing: Option<IndexEntry> = match db.get(&self.txn, key).map_err(LmdbError::from)? {
            Some(bytes) => Some(bincode::deserialize(bytes).map_err(LmdbError::from)?),
            None => None,
        };
        let entry = IndexEntry::recorded(existing, group_name);
        let bytes = bincode::serialize(&entry).map_err(LmdbError::from)?;
        db.put(&mut self.txn, key, &bytes)
            .map_err(LmdbError::from)?;
        Ok(())
    }

    // ── Meta operations ─────────────────────────────────────────────────

    /// Put a meta key/value pair into the batch.
    pub fn put_meta(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.env
            .meta_db
            .put(&mut self.txn, key, value)
            .map_err(LmdbError::from)?;
        Ok(())
    }

    /// Store the id the next registered group will receive.
    pub fn put_next_group_id(&mut self, next_id: u64) -> Result<(), StoreError> {
        self.put_meta(NEXT_GROUP_ID_KEY, &next_id.to_be_bytes())
    }

    // ── Commit / rollback ───────────────────────────────────────────────

    /// Commit all batched operations in a single write transaction.
    pub fn commit(self) -> Result<(), StoreError> {
        self.txn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use volunteer_store::{GroupIndexStore, GroupStore, MetaStore};
    use volunteer_types::Timestamp;

    /// Helper: open a temporary LMDB environment.
    fn temp_env() -> (tempfile::TempDir, LmdbEnvironment) {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let env = LmdbEnvironment::open(dir.path(), 10 * 1024 * 1024)
            .expect("failed to open env");
        (dir, env)
    }

    fn group(name: &str, service: &str, country: &str) -> Group {
        Group {
            id: 1,
            name: name.to_string(),
            country: country.to_string(),
            contact_number: "+254700000000".to_string(),
            official_email: format!("{name}@example.org"),
            service: service.to_string(),
            created_at: Timestamp::new(1_700_000_000),
            members: Vec::new(),
        }
    }

    #[test]
    fn batch_put_group_and_indexes_committed() {
        let (_dir, env) = temp_env();
        let g = group("GreenEarth", "tree-planting", "Kenya");

        let mut batch = env.write_batch().expect("write_batch");
        batch.put_group(&g).expect("put_group");
        batch
            .record_index(IndexKind::Service, &g.service, &g.name)
            .expect("record service");
        batch
            .record_index(IndexKind::Location, &g.country, &g.name)
            .expect("record location");
        batch.commit().expect("commit");

        let stored = env
            .group_store()
            .get_group("GreenEarth")
            .expect("get_group")
            .expect("group should exist");
        assert_eq!(stored, g);

        let service = env
            .index_store()
            .get_index_entry(IndexKind::Service, "tree-planting")
            .expect("get entry")
            .expect("service entry should exist");
        assert_eq!(service.latest, "GreenEarth");

        let location = env
            .index_store()
            .get_index_entry(IndexKind::Location, "Kenya")
            .expect("get entry")
            .expect("location entry should exist");
        assert!(location.groups.contains("GreenEarth"));
    }

    #[test]
    fn dropped_batch_does_not_persist() {
        let (_dir, env) = temp_env();
        let g = group("Ghost", "haunting", "Nowhere");

        {
            let mut batch = env.write_batch().expect("write_batch");
            batch.put_group(&g).expect("put_group");
            batch
                .record_index(IndexKind::Service, &g.service, &g.name)
                .expect("record service");
            // batch is dropped here, implicit rollback
        }

        assert!(env.group_store().get_group("Ghost").expect("get").is_none());
        assert!(!env
            .index_store()
            .contains_key(IndexKind::Service, "haunting")
            .expect("contains_key"));
    }

    #[test]
    fn record_index_sees_earlier_writes_in_same_batch() {
        let (_dir, env) = temp_env();

        let mut batch = env.write_batch().expect("write_batch");
        batch
            .record_index(IndexKind::Service, "cleanup", "A")
            .expect("record A");
        batch
            .record_index(IndexKind::Service, "cleanup", "B")
            .expect("record B");
        batch.commit().expect("commit");

        let entry = env
            .index_store()
            .get_index_entry(IndexKind::Service, "cleanup")
            .expect("get entry")
            .expect("entry should exist");
        assert_eq!(entry.latest, "B");
        assert_eq!(entry.groups.len(), 2);
    }

    #[test]
    fn batch_put_next_group_id() {
        let (_dir, env) = temp_env();
        assert_eq!(env.meta_store().next_group_id().expect("read"), 1);

        let mut batch = env.write_batch().expect("write_batch");
        batch.put_next_group_id(42).expect("put_next_group_id");
        batch.commit().expect("commit");

        assert_eq!(env.meta_store().next_group_id().expect("read"), 42);
    }
}
