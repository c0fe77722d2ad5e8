//! Stateless payload checks, run before any store access.
//!
//! A field is missing when it is the empty string.

use crate::error::RegistryError;
use crate::payload::{GroupPayload, LeavePayload, MemberPayload};

pub fn validate_group_payload(payload: &GroupPayload) -> Result<(), RegistryError> {
    let fields = [
        &payload.name,
        &payload.country,
        &payload.contact_number,
        &payload.official_email,
        &payload.service,
    ];
    if fields.iter().any(|f| f.is_empty()) {
        return Err(RegistryError::MissingCredentials(
            "Some credentials are missing".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_member_payload(payload: &MemberPayload) -> Result<(), RegistryError> {
    let fields = [
        &payload.name,
        &payload.location,
        &payload.specialist,
        &payload.group_name,
    ];
    if fields.iter().any(|f| f.is_empty()) {
        return Err(RegistryError::MissingCredentials(
            "Some member credentials are missing".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_leave_payload(payload: &LeavePayload) -> Result<(), RegistryError> {
    if payload.group_name.is_empty() || payload.name.is_empty() || payload.registration_id.is_empty()
    {
        return Err(RegistryError::MissingCredentials(
            "Some credentials are missing".to_string(),
        ));
    }
    Ok(())
}

/// Require a non-empty lookup key, failing with `message` otherwise.
pub fn require(value: &str, message: &str) -> Result<(), RegistryError> {
    if value.is_empty() {
        return Err(RegistryError::MissingCredentials(message.to_string()));
    }
    Ok(())
}
