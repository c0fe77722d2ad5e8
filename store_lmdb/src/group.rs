//! LMDB implementation of GroupStore.

use std::sync::Arc;

use heed::types::{Bytes, Str};
use heed::{Database, Env};

use volunteer_store::{GroupStore, StoreError};
use volunteer_types::Group;

use crate::LmdbError;

pub struct LmdbGroupStore {
    pub(crate) env: Arc<Env>,
    pub(crate) groups_db: Database<Str, Bytes>,
}

impl GroupStore for LmdbGroupStore {
    fn get_group(&self, name: &str) -> Result<Option<Group>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self.groups_db.get(&rtxn, name).map_err(LmdbError::from)? {
            Some(bytes) => Ok(Some(bincode::deserialize(bytes).map_err(LmdbError::from)?)),
            None => Ok(None),
        }
    }

    fn put_group(&self, group: &Group) -> Result<(), StoreError> {
        let bytes = bincode::serialize(group).map_err(LmdbError::from)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.groups_db
            .put(&mut wtxn, &group.name, &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn iter_groups(&self) -> Result<Vec<Group>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self.groups_db.iter(&rtxn).map_err(LmdbError::from)?;
        let mut groups = Vec::new();
        for entry in iter {
            let (_, bytes) = entry.map_err(LmdbError::from)?;
            groups.push(bincode::deserialize(bytes).map_err(LmdbError::from)?);
        }
        Ok(groups)
    }

    fn group_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.groups_db.len(&rtxn).map_err(LmdbError::from)?)
    }

    fn exists(&self, name: &str) -> Result<bool, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self
            .groups_db
            .get(&rtxn, name)
            .map_err(LmdbError::from)?
            .is_some())
    }
}
