//! # tutorlink-api
//!
//! HTTP API layer for TutorLink built on Axum.
//!
//! Provides the account and match endpoints, the WebSocket upgrade for
//! presence and chat, middleware (CORS, request logging), extractors, DTOs,
//! and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use state::AppState;
