//! Record Store trait.

use crate::StoreError;
use volunteer_types::Group;

/// The authoritative mapping from group name to [`Group`].
pub trait GroupStore {
    fn get_group(&self, name: &str) -> Result<Option<Group>, StoreError>;

    /// Insert or overwrite the record stored under `group.name`.
    ///
    /// Writes this table alone and leaves both indexes untouched. Registry
    /// code goes through [`RegistryStore::commit`](crate::RegistryStore::commit);
    /// this is for migrations and for seeding drift in consistency tests.
    fn put_group(&self, group: &Group) -> Result<(), StoreError>;

    /// Snapshot of every stored group.
    fn iter_groups(&self) -> Result<Vec<Group>, StoreError>;

    fn group_count(&self) -> Result<u64, StoreError>;

    fn exists(&self, name: &str) -> Result<bool, StoreError> {
        self.get_group(name).map(|g| g.is_some())
    }
}
