//! The registry service: every operation over groups and members.

use std::sync::{Mutex, MutexGuard, PoisonError};

use volunteer_store::{
    check_consistency, ConsistencyReport, GroupIndexStore, GroupStore, GroupWrite, IndexKind,
    MetaStore, RegistryStore, StoreError,
};
use volunteer_types::{Clock, Group, Member, Principal};

use crate::error::RegistryError;
use crate::payload::{GroupPayload, LeavePayload, MemberPayload};
use crate::validation::{
    require, validate_group_payload, validate_leave_payload, validate_member_payload,
};

/// Registry service over a [`RegistryStore`] backend.
///
/// Every public method takes the registry lock for its whole duration, so
/// no two operations interleave their reads and writes. Mutations build a
/// fresh [`Group`] and commit it together with its index entries in one
/// [`GroupWrite`].
pub struct Registry<S, C> {
    store: S,
    clock: C,
    lock: Mutex<()>,
}

impl<S: RegistryStore, C: Clock> Registry<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            lock: Mutex::new(()),
        }
    }

    /// The underlying storage backend.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn serialize(&self) -> MutexGuard<'_, ()> {
        // Guards no data; a poisoned lock is still usable.
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new group with an empty roster.
    pub fn register_group(&self, payload: &GroupPayload) -> Result<String, RegistryError> {
        validate_group_payload(payload)?;
        let _guard = self.serialize();

        if self.store.groups().exists(&payload.name)? {
            tracing::debug!(group = %payload.name, "registration rejected: name taken");
            return Err(RegistryError::GroupAlreadyRegistered(
                "Group already exists".to_string(),
            ));
        }

        let id = self.store.meta().next_group_id()?;
        let created_at = self.clock.now();
        let group = Group {
            id,
            name: payload.name.clone(),
            country: payload.country.clone(),
            contact_number: payload.contact_number.clone(),
            official_email: payload.official_email.clone(),
            service: payload.service.clone(),
            created_at,
            members: Vec::new(),
        };

        self.store
            .commit(&GroupWrite::new(group).advancing_id_to(id + 1))?;

        tracing::info!(
            group = %payload.name,
            id,
            service = %payload.service,
            country = %payload.country,
            created_at = created_at.as_secs(),
            "group registered"
        );
        Ok("Group registered successfully".to_string())
    }

    /// Snapshot of every registered group.
    pub fn get_all_groups(&self) -> Result<Vec<Group>, RegistryError> {
        let _guard = self.serialize();
        Ok(self.store.groups().iter_groups()?)
    }

    pub fn get_group_by_name(&self, name: &str) -> Result<Group, RegistryError> {
        require(name, "Name of group is required")?;
        let _guard = self.serialize();
        self.load_group(name)
    }

    /// The group most recently filed under `service`.
    pub fn get_group_by_service(&self, service: &str) -> Result<Group, RegistryError> {
        require(service, "Service field is required")?;
        let _guard = self.serialize();
        self.latest_in_index(
            IndexKind::Service,
            service,
            format!("Group offering {service} is not available"),
        )
    }

    /// The group most recently filed under `country`.
    pub fn get_group_by_location(&self, country: &str) -> Result<Group, RegistryError> {
        require(country, "Location field is required")?;
        let _guard = self.serialize();
        self.latest_in_index(
            IndexKind::Location,
            country,
            format!("Group located in {country} is not available"),
        )
    }

    /// Every group filed under `service`, in name order.
    pub fn get_groups_by_service(&self, service: &str) -> Result<Vec<Group>, RegistryError> {
        require(service, "Service field is required")?;
        let _guard = self.serialize();
        self.all_in_index(
            IndexKind::Service,
            service,
            format!("Group offering {service} is not available"),
        )
    }

    /// Every group filed under `country`, in name order.
    pub fn get_groups_by_location(&self, country: &str) -> Result<Vec<Group>, RegistryError> {
        require(country, "Location field is required")?;
        let _guard = self.serialize();
        self.all_in_index(
            IndexKind::Location,
            country,
            format!("Group located in {country} is not available"),
        )
    }

    /// Join `payload.group_name` as `caller`.
    ///
    /// `payload.specialist` must be a service some group currently
    /// advertises, not necessarily the target group's own. The updated
    /// group is filed under that specialist service and its own country.
    pub fn volunteer(
        &self,
        payload: &MemberPayload,
        caller: &Principal,
    ) -> Result<String, RegistryError> {
        validate_member_payload(payload)?;
        if caller.is_empty() {
            return Err(RegistryError::MissingCredentials(
                "Some member credentials are missing".to_string(),
            ));
        }
        let _guard = self.serialize();

        let group = self.load_group(&payload.group_name)?;

        if !self
            .store
            .indexes()
            .contains_key(IndexKind::Service, &payload.specialist)?
        {
            tracing::debug!(
                group = %payload.group_name,
                specialist = %payload.specialist,
                "volunteer rejected: service not offered"
            );
            return Err(RegistryError::ServicesNotAvailable(format!(
                "Service '{}' is not offered by {}",
                payload.specialist, payload.group_name
            )));
        }

        if group.has_member(&payload.name, caller) {
            return Err(RegistryError::AlreadyAMember(format!(
                "{} is already a member of {}",
                payload.name, payload.group_name
            )));
        }

        let member = Member {
            name: payload.name.clone(),
            location: payload.location.clone(),
            specialist: payload.specialist.clone(),
            registration_id: caller.clone(),
        };
        let country = group.country.clone();
        let updated = group.with_member(member);
        let write = GroupWrite::with_index_keys(
            updated,
            vec![
                (IndexKind::Service, payload.specialist.clone()),
                (IndexKind::Location, country),
            ],
        );
        self.store.commit(&write)?;

        tracing::info!(
            group = %payload.group_name,
            member = %payload.name,
            caller = %caller,
            "member joined"
        );
        Ok("Successfully volunteered".to_string())
    }

    /// Leave a group.
    ///
    /// Requires an exact `(name, registration_id)` match on the roster, then
    /// removes every member with that name.
    pub fn member_leave_group(&self, payload: &LeavePayload) -> Result<String, RegistryError> {
        validate_leave_payload(payload)?;
        let _guard = self.serialize();

        let group = self.load_group(&payload.group_name)?;

        if !group.has_member(&payload.name, &payload.registration_id) {
            tracing::debug!(
                group = %payload.group_name,
                member = %payload.name,
                "leave rejected: not a member"
            );
            return Err(RegistryError::NotAMember(format!(
                "You are not a member of {}",
                payload.group_name
            )));
        }

        let updated = group.without_members_named(&payload.name);
        self.store.commit(&GroupWrite::new(updated))?;

        tracing::info!(
            group = %payload.group_name,
            member = %payload.name,
            "member left"
        );
        Ok("Successfully exited the group".to_string())
    }

    /// Distinct service names that have at least one group filed under them.
    pub fn list_all_services(&self) -> Result<Vec<String>, RegistryError> {
        let _guard = self.serialize();
        Ok(self.store.indexes().index_keys(IndexKind::Service)?)
    }

    /// Distinct countries that have at least one group filed under them.
    pub fn list_all_locations(&self) -> Result<Vec<String>, RegistryError> {
        let _guard = self.serialize();
        Ok(self.store.indexes().index_keys(IndexKind::Location)?)
    }

    /// Check that the record store and both indexes agree.
    pub fn verify_consistency(&self) -> Result<ConsistencyReport, RegistryError> {
        let _guard = self.serialize();
        let report = check_consistency(&self.store)?;
        for error in &report.errors {
            tracing::warn!(%error, "registry inconsistency");
        }
        Ok(report)
    }

    fn load_group(&self, name: &str) -> Result<Group, RegistryError> {
        self.store.groups().get_group(name)?.ok_or_else(|| {
            RegistryError::GroupNotAvailable(format!("Group with name {name} is not available"))
        })
    }

    /// Resolve an index name against the record store.
    fn resolve(&self, kind: IndexKind, key: &str, name: &str) -> Result<Group, RegistryError> {
        self.store.groups().get_group(name)?.ok_or_else(|| {
            RegistryError::Store(StoreError::Corruption(format!(
                "{kind} index key '{key}' points at unknown group '{name}'"
            )))
        })
    }

    fn latest_in_index(
        &self,
        kind: IndexKind,
        key: &str,
        not_found: String,
    ) -> Result<Group, RegistryError> {
        let entry = self
            .store
            .indexes()
            .get_index_entry(kind, key)?
            .ok_or(RegistryError::GroupNotAvailable(not_found))?;
        self.resolve(kind, key, &entry.latest)
    }

    fn all_in_index(
        &self,
        kind: IndexKind,
        key: &str,
        not_found: String,
    ) -> Result<Vec<Group>, RegistryError> {
        let entry = self
            .store
            .indexes()
            .get_index_entry(kind, key)?
            .ok_or(RegistryError::GroupNotAvailable(not_found))?;
        entry
            .groups
            .iter()
            .map(|name| self.resolve(kind, key, name))
            .collect()
    }
}
