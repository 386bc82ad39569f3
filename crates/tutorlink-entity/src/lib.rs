//! # tutorlink-entity
//!
//! Domain entity models for TutorLink. Database entities derive
//! `sqlx::FromRow` in addition to the usual serde traits.

pub mod user;
