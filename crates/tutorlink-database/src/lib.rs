//! # tutorlink-database
//!
//! The user directory consumed by matching and accounts: the
//! [`UserDirectory`] contract, a PostgreSQL implementation backed by sqlx,
//! and an in-process implementation for single-node runs and tests.

pub mod connection;
pub mod directory;
pub mod memory;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use directory::UserDirectory;
pub use memory::MemoryUserDirectory;
pub use repositories::user::UserRepository;
