//! Group members.

use crate::Principal;
use serde::{Deserialize, Serialize};

/// A volunteer on a group's roster.
///
/// Members have no lifecycle of their own: they exist only inside the
/// `members` sequence of exactly one [`Group`](crate::Group).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    pub location: String,
    /// The service this volunteer offers; always one some group advertises.
    pub specialist: String,
    /// Caller identity captured when the member joined. Never rewritten.
    pub registration_id: Principal,
}

impl Member {
    /// Exact `(name, registration identity)` match.
    pub fn matches(&self, name: &str, registration_id: &Principal) -> bool {
        self.name == name && &self.registration_id == registration_id
    }
}
