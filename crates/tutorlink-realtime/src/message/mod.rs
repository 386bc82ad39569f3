//! WebSocket wire messages.

pub mod types;

pub use types::{InboundMessage, OutboundMessage};
