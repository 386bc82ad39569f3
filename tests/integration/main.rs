//! Workspace integration tests.

mod auth_test;
mod helpers;
mod match_test;
mod ws_test;
