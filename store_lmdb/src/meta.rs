//! LMDB implementation of MetaStore.

use std::sync::Arc;

use heed::types::{Bytes, Str};
use heed::{Database, Env};

use volunteer_store::{MetaStore, StoreError};

use crate::LmdbError;

pub struct LmdbMetaStore {
    pub(crate) env: Arc<Env>,
    pub(crate) meta_db: Database<Str, Bytes>,
}

impl MetaStore for LmdbMetaStore {
    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.meta_db
            .put(&mut wtxn, key, value)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self.meta_db.get(&rtxn, key).map_err(LmdbError::from)?;
        Ok(val.map(|bytes| bytes.to_vec()))
    }
}
