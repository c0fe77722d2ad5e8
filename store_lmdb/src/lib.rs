//! LMDB storage backend for the volunteer registry.
//!
//! Implements all storage traits from `volunteer-store` using the `heed`
//! LMDB bindings. Each logical store maps to one LMDB database within a
//! single environment, so one write transaction spans all of them.

pub mod environment;
pub mod error;
pub mod group;
pub mod index;
pub mod integrity;
pub mod meta;
pub mod migration;
pub mod write_batch;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use group::LmdbGroupStore;
pub use index::LmdbIndexStore;
pub use meta::LmdbMetaStore;
pub use write_batch::WriteBatch;
