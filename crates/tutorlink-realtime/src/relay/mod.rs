//! Message forwarding between connected users.

pub mod chat;

pub use chat::ChatRelay;
