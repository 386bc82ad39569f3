//! # tutorlink-realtime
//!
//! Real-time engine for TutorLink. Provides:
//!
//! - WebSocket connection handles with bounded outbound queues
//! - A presence registry mapping usernames to live connections
//! - Chat relay between connected users and tutor announcements on join
//! - Internal counters for health reporting

pub mod connection;
pub mod message;
pub mod metrics;
pub mod presence;
pub mod relay;
pub mod server;

pub use connection::manager::ConnectionManager;
pub use presence::registry::PresenceRegistry;
pub use relay::chat::ChatRelay;
pub use server::RealtimeEngine;
