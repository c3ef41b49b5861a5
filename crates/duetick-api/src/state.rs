//! Application state shared across all handlers.

use std::sync::Arc;

use sqlx::PgPool;

use duetick_auth::jwt::JwtDecoder;
use duetick_core::config::AppConfig;
use duetick_service::{AuthService, ReminderService, UserService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL connection pool
    pub db_pool: PgPool,

    // ── Auth ─────────────────────────────────────────────────
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Services ─────────────────────────────────────────────
    /// Account and sign-in service
    pub auth_service: Arc<AuthService>,
    /// Reminder CRUD service
    pub reminder_service: Arc<ReminderService>,
    /// Profile and notification-settings service
    pub user_service: Arc<UserService>,
}
