//! # tutorlink-auth
//!
//! Credential handling for TutorLink.
//!
//! ## Modules
//!
//! - `jwt`: token creation and validation
//! - `password`: Argon2id password hashing

pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::PasswordHasher;
