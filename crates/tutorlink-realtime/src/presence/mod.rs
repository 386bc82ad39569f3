//! Presence: which identified users are connected right now.

pub mod registry;

pub use registry::{JoinOutcome, PresenceRegistry, Session};
