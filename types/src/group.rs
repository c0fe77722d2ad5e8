//! Group records.

use crate::{Member, Principal, Timestamp};
use serde::{Deserialize, Serialize};

/// An organization advertising one volunteer service.
///
/// Groups are immutable values: membership changes build a new `Group` and
/// the registry writes the whole record back, so no copy held by a reader
/// or an index is ever mutated in place.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Monotonically increasing id assigned at registration.
    pub id: u64,
    /// Unique group name (primary key).
    pub name: String,
    pub country: String,
    pub contact_number: String,
    pub official_email: String,
    /// The single service category this group advertises.
    pub service: String,
    pub created_at: Timestamp,
    pub members: Vec<Member>,
}

impl Group {
    /// Whether a member with exactly this name and identity is on the roster.
    pub fn has_member(&self, name: &str, registration_id: &Principal) -> bool {
        self.members.iter().any(|m| m.matches(name, registration_id))
    }

    /// Return a copy of this group with `member` appended.
    pub fn with_member(&self, member: Member) -> Group {
        let mut members = Vec::with_capacity(self.members.len() + 1);
        members.extend(self.members.iter().cloned());
        members.push(member);
        Group {
            members,
            ..self.clone()
        }
    }

    /// Return a copy of this group with every member called `name` removed.
    pub fn without_members_named(&self, name: &str) -> Group {
        Group {
            members: self
                .members
                .iter()
                .filter(|m| m.name != name)
                .cloned()
                .collect(),
            ..self.clone()
        }
    }
}
