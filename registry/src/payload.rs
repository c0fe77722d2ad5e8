//! Inbound request payloads.

use serde::{Deserialize, Serialize};

use volunteer_types::Principal;

/// Request to register a new group.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupPayload {
    pub name: String,
    pub country: String,
    pub contact_number: String,
    pub official_email: String,
    pub service: String,
}

/// Request to join a group. The caller's identity is not part of the
/// payload; the host supplies it separately.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberPayload {
    pub name: String,
    pub location: String,
    pub specialist: String,
    pub group_name: String,
}

/// Request to leave a group, echoing the identity captured at join time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeavePayload {
    pub name: String,
    pub registration_id: Principal,
    pub group_name: String,
}
