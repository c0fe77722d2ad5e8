//! LMDB implementation of GroupIndexStore.
//!
//! Two databases, one per [`IndexKind`]:
//! - `service_index`: service name → bincode [`IndexEntry`].
//! - `location_index`: country → bincode [`IndexEntry`].

use std::sync::Arc;

use heed::types::{Bytes, Str};
use heed::{Database, Env};

use volunteer_store::{GroupIndexStore, IndexEntry, IndexKind, StoreError};

use crate::LmdbError;

pub struct LmdbIndexStore {
    pub(crate) env: Arc<Env>,
    pub(crate) service_index_db: Database<Str, Bytes>,
    pub(crate) location_index_db: Database<Str, Bytes>,
}

impl LmdbIndexStore {
    fn db(&self, kind: IndexKind) -> Database<Str, Bytes> {
        match kind {
            IndexKind::Service => self.service_index_db,
            IndexKind::Location => self.location_index_db,
        }
    }
}

impl GroupIndexStore for LmdbIndexStore {
    fn get_index_entry(
        &self,
        kind: IndexKind,
        key: &str,
    ) -> Result<Option<IndexEntry>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self.db(kind).get(&rtxn, key).map_err(LmdbError::from)? {
            Some(bytes) => Ok(Some(bincode::deserialize(bytes).map_err(LmdbError::from)?)),
            None => Ok(None),
        }
    }

    fn put_index_entry(
        &self,
        kind: IndexKind,
        key: &str,
        entry: &IndexEntry,
    ) -> Result<(), StoreError> {
        let bytes = bincode::serialize(entry).map_err(LmdbError::from)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.db(kind)
            .put(&mut wtxn, key, &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn index_keys(&self, kind: IndexKind) -> Result<Vec<String>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self.db(kind).iter(&rtxn).map_err(LmdbError::from)?;
        let mut keys = Vec::new();
        for entry in iter {
            let (key, _) = entry.map_err(LmdbError::from)?;
            keys.push(key.to_string());
        }
        Ok(keys)
    }
}
