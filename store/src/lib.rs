//! Abstract storage traits for the volunteer registry.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The registry service depends only on the traits.
//!
//! The registry keeps one logical collection of groups reachable by three
//! keys: the group name (the Record Store, authoritative), the advertised
//! service and the country (the two Secondary Indexes, derived). Backends
//! expose each table for reads, but all registry mutations go through
//! [`RegistryStore::commit`], which applies a [`GroupWrite`] to every table
//! at once.

pub mod consistency;
pub mod error;
pub mod group;
pub mod index;
pub mod meta;
pub mod write;

pub use consistency::{check_consistency, ConsistencyReport};
pub use error::StoreError;
pub use group::GroupStore;
pub use index::{GroupIndexStore, IndexEntry, IndexKind};
pub use meta::MetaStore;
pub use write::{GroupWrite, RegistryStore};
