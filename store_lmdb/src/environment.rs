//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::{Bytes, Str};
use heed::{Database, Env, EnvOpenOptions};

use volunteer_store::{GroupWrite, RegistryStore, StoreError};

use crate::group::LmdbGroupStore;
use crate::index::LmdbIndexStore;
use crate::meta::LmdbMetaStore;
use crate::migration::Migrator;
use crate::write_batch::WriteBatch;
use crate::LmdbError;

/// Named databases opened in every registry environment.
pub(crate) const GROUPS_DB: &str = "groups";
pub(crate) const SERVICE_INDEX_DB: &str = "service_index";
pub(crate) const LOCATION_INDEX_DB: &str = "location_index";
pub(crate) const META_DB: &str = "meta";

const MAX_DBS: u32 = 4;

/// Default map size: 256 MiB.
pub const DEFAULT_MAP_SIZE: usize = 256 * 1024 * 1024;

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    pub(crate) groups_db: Database<Str, Bytes>,
    pub(crate) service_index_db: Database<Str, Bytes>,
    pub(crate) location_index_db: Database<Str, Bytes>,
    pub(crate) meta_db: Database<Str, Bytes>,
    group_store: LmdbGroupStore,
    index_store: LmdbIndexStore,
    meta_store: LmdbMetaStore,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path.
    ///
    /// Creates the directory if needed, creates all named databases and
    /// brings the schema up to date.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;

        // SAFETY: the environment is opened once per process per path and
        // the memory map is never modified outside of heed transactions.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let groups_db: Database<Str, Bytes> = env.create_database(&mut wtxn, Some(GROUPS_DB))?;
        let service_index_db: Database<Str, Bytes> =
            env.create_database(&mut wtxn, Some(SERVICE_INDEX_DB))?;
        let location_index_db: Database<Str, Bytes> =
            env.create_database(&mut wtxn, Some(LOCATION_INDEX_DB))?;
        let meta_db: Database<Str, Bytes> = env.create_database(&mut wtxn, Some(META_DB))?;
        wtxn.commit()?;

        let env = Arc::new(env);
        let lmdb = Self {
            group_store: LmdbGroupStore {
                env: Arc::clone(&env),
                groups_db,
            },
            index_store: LmdbIndexStore {
                env: Arc::clone(&env),
                service_index_db,
                location_index_db,
            },
            meta_store: LmdbMetaStore {
                env: Arc::clone(&env),
                meta_db,
            },
            env,
            groups_db,
            service_index_db,
            location_index_db,
            meta_db,
        };

        Migrator::run(&lmdb.meta_store)?;
        tracing::debug!(path = %path.display(), map_size, "opened LMDB environment");
        Ok(lmdb)
    }

    /// The raw heed environment.
    pub fn env(&self) -> &Arc<Env> {
        &self.env
    }

    pub fn group_store(&self) -> &LmdbGroupStore {
        &self.group_store
    }

    pub fn index_store(&self) -> &LmdbIndexStore {
        &self.index_store
    }

    pub fn meta_store(&self) -> &LmdbMetaStore {
        &self.meta_store
    }

    /// Begin a write batch spanning every database.
    pub fn write_batch(&self) -> Result<WriteBatch<'_>, StoreError> {
        WriteBatch::new(self)
    }
}

impl RegistryStore for LmdbEnvironment {
    type Groups = LmdbGroupStore;
    type Indexes = LmdbIndexStore;
    type Meta = LmdbMetaStore;

    fn groups(&self) -> &LmdbGroupStore {
        &self.group_store
    }

    fn indexes(&self) -> &LmdbIndexStore {
        &self.index_store
    }

    fn meta(&self) -> &LmdbMetaStore {
        &self.meta_store
    }

    fn commit(&self, write: &GroupWrite) -> Result<(), StoreError> {
        let mut batch = self.write_batch()?;
        batch.put_group(&write.group)?;
        for (kind, key) in &write.index_keys {
            batch.record_index(*kind, key, &write.group.name)?;
        }
        if let Some(next_id) = write.next_group_id {
            batch.put_next_group_id(next_id)?;
        }
        batch.commit()
    }
}
