//! Atomic multi-table writes.

use volunteer_types::Group;

use crate::{GroupIndexStore, GroupStore, IndexKind, MetaStore, StoreError};

/// One complete registry mutation.
///
/// Commits replace the record stored under `group.name`, file the group
/// under every `(index, key)` pair in `index_keys`, and, when set, advance
/// the group id counter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupWrite {
    pub group: Group,
    pub index_keys: Vec<(IndexKind, String)>,
    pub next_group_id: Option<u64>,
}

impl GroupWrite {
    /// Write `group` and file it under its own service and country.
    pub fn new(group: Group) -> Self {
        let index_keys = vec![
            (IndexKind::Service, group.service.clone()),
            (IndexKind::Location, group.country.clone()),
        ];
        Self {
            group,
            index_keys,
            next_group_id: None,
        }
    }

    /// Write `group` with an explicit set of index keys.
    pub fn with_index_keys(group: Group, index_keys: Vec<(IndexKind, String)>) -> Self {
        Self {
            group,
            index_keys,
            next_group_id: None,
        }
    }

    pub fn advancing_id_to(mut self, next_group_id: u64) -> Self {
        self.next_group_id = Some(next_group_id);
        self
    }
}

/// A complete registry backend: record store, both indexes, metadata, and
/// an atomic commit across all of them.
pub trait RegistryStore: Send + Sync {
    type Groups: GroupStore;
    type Indexes: GroupIndexStore;
    type Meta: MetaStore;

    fn groups(&self) -> &Self::Groups;
    fn indexes(&self) -> &Self::Indexes;
    fn meta(&self) -> &Self::Meta;

    /// Apply `write` to every table, or to none of them.
    fn commit(&self, write: &GroupWrite) -> Result<(), StoreError>;
}
