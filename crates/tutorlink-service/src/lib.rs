//! # tutorlink-service
//!
//! Business logic service layer for TutorLink.
//!
//! Services receive their dependencies as `Arc` handles at construction.

pub mod account;
pub mod matching;

pub use account::{AccountService, LoginResult, Registration};
pub use matching::{MatchEngine, MatchOutcome, MatchResult, MatchService};
