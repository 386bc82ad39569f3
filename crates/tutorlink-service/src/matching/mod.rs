//! Student-to-tutor matching.

pub mod engine;
pub mod service;

pub use engine::{MatchEngine, MatchResult};
pub use service::{MatchOutcome, MatchService};
