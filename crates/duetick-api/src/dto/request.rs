//! Request body and query-string types.
//!
//! Create/update payloads for reminders, users, and credentials live in
//! `duetick-service` next to the logic that validates them; this module
//! only holds the API-specific shapes.

use serde::{Deserialize, Serialize};

/// Body for `POST /api/auth/refresh`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    /// The refresh token issued at login.
    pub refresh_token: String,
}

/// Query string for `GET /api/auth/oauth/{provider}/authorize`.
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthAuthorizeQuery {
    /// Opaque anti-forgery value round-tripped through the provider.
    /// Generated server-side when the client does not supply one.
    #[serde(default)]
    pub state: String,
}

/// Query string for `GET /api/auth/oauth/{provider}/callback`.
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthCallbackQuery {
    /// Authorization code returned by the provider.
    pub code: String,
    /// The anti-forgery value echoed back by the provider.
    #[serde(default)]
    pub state: String,
}

/// Query string for `GET /api/reminders`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListRemindersQuery {
    /// Include completed reminders in the listing.
    #[serde(default)]
    pub include_completed: bool,
}
