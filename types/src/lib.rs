//! Fundamental types for the volunteer registry.
//!
//! This crate defines the values shared across every other crate in the
//! workspace: groups and their members, caller principals, timestamps and
//! the clock abstraction the registry reads time from.

pub mod group;
pub mod member;
pub mod principal;
pub mod time;

pub use group::Group;
pub use member::Member;
pub use principal::Principal;
pub use time::{Clock, SystemClock, Timestamp};
