//! Volunteer group registry.
//!
//! Organizations ("groups") register to advertise one volunteer service;
//! individuals join (volunteer) or leave them. Every group is reachable by
//! name, by service and by country.
//!
//! Design:
//! - The record store is authoritative; the service and location indexes
//!   hold group names and are resolved against it on every lookup.
//! - Each operation validates its payload, reads current state, builds a
//!   new `Group` value and commits one [`GroupWrite`](volunteer_store::GroupWrite)
//!   touching every table. Failures are detected before the commit.
//! - One lock serializes all operations, reads included.
//! - Time and caller identity are passed in, never read from ambient state.

pub mod error;
pub mod payload;
pub mod registry;
pub mod validation;

pub use error::RegistryError;
pub use payload::{GroupPayload, LeavePayload, MemberPayload};
pub use registry::Registry;
