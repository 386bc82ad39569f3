//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use tutorlink_auth::jwt::{JwtDecoder, JwtEncoder};
use tutorlink_auth::password::PasswordHasher;
use tutorlink_core::config::AppConfig;
use tutorlink_database::{DatabasePool, UserDirectory};
use tutorlink_realtime::RealtimeEngine;
use tutorlink_service::{AccountService, MatchService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// PostgreSQL pool, absent with the in-memory directory
    pub db_pool: Option<DatabasePool>,
    /// JWT validator for `AuthUser`
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Registration and login
    pub account_service: Arc<AccountService>,
    /// Tutor matching
    pub match_service: Arc<MatchService>,
    /// WebSocket presence and chat
    pub realtime: Arc<RealtimeEngine>,
}

impl AppState {
    /// Wires services over the given directory.
    pub fn new(
        config: AppConfig,
        directory: Arc<dyn UserDirectory>,
        db_pool: Option<DatabasePool>,
    ) -> Self {
        let account_service = AccountService::new(
            Arc::clone(&directory),
            Arc::new(PasswordHasher::new()),
            Arc::new(JwtEncoder::new(&config.auth)),
            config.auth.password_min_length,
        );
        let match_service = MatchService::new(directory);

        Self {
            jwt_decoder: Arc::new(JwtDecoder::new(&config.auth)),
            account_service: Arc::new(account_service),
            match_service: Arc::new(match_service),
            realtime: Arc::new(RealtimeEngine::new(&config.realtime)),
            db_pool,
            config: Arc::new(config),
        }
    }
}
