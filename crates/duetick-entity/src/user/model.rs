//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::provider::OauthProvider;
use super::role::UserRole;

/// A registered user in the Duetick system.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Unique email address, also the login name.
    pub email: String,
    /// Argon2 password hash. `None` for OAuth-only accounts.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// Human-readable display name.
    pub display_name: String,
    /// User role.
    pub role: UserRole,
    /// Provider this account was created through, if any.
    pub oauth_provider: Option<OauthProvider>,
    /// Stable subject identifier at the OAuth provider.
    pub oauth_subject: Option<String>,
    /// Whether deadline reminder emails are enabled for this user.
    pub notify_enabled: bool,
    /// Look-ahead window in whole days before a deadline.
    pub notify_days_before: i32,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
    /// Last successful login time.
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Check if this account can only sign in through an OAuth provider.
    pub fn is_oauth_only(&self) -> bool {
        self.password_hash.is_none()
    }

    /// Check if this user has admin privileges.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Email address, unique across all users.
    pub email: String,
    /// Pre-hashed password. `None` for OAuth sign-ups.
    pub password_hash: Option<String>,
    /// Display name.
    pub display_name: String,
    /// Assigned role.
    pub role: UserRole,
    /// Provider the account is created through, if any.
    pub oauth_provider: Option<OauthProvider>,
    /// Subject identifier at the provider, if any.
    pub oauth_subject: Option<String>,
}

/// Per-user notification settings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NotificationSettings {
    /// Whether reminder emails are sent at all.
    pub notify_enabled: bool,
    /// Look-ahead window in whole days before a deadline.
    pub notify_days_before: i32,
}

/// The mail-relevant projection of a user, resolved per candidate
/// during a notification cycle.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Recipient {
    /// Destination email address.
    pub email: String,
    /// Display name used in the greeting.
    pub display_name: String,
}
