//! JWT claims payload.

use chrono::Utc;
use duetick_entity::user::UserRole;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Discriminates access tokens from refresh tokens so one can never be
/// presented where the other is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Claims carried by every Duetick JWT.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's id.
    pub sub: Uuid,
    /// Email at issuance time, for display and audit logging.
    pub email: String,
    /// Role at issuance time.
    pub role: UserRole,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
    /// Unique token id.
    pub jti: Uuid,
    /// Access or refresh.
    pub token_type: TokenType,
}

impl Claims {
    /// Builds claims expiring `ttl_seconds` from now.
    pub fn new(
        user_id: Uuid,
        email: String,
        role: UserRole,
        token_type: TokenType,
        ttl_seconds: i64,
    ) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id,
            email,
            role,
            iat: now,
            exp: now + ttl_seconds,
            jti: Uuid::new_v4(),
            token_type,
        }
    }

    /// The authenticated user's id.
    pub fn user_id(&self) -> Uuid {
        self.sub
    }

    pub fn is_expired(&self) -> bool {
        self.exp < Utc::now().timestamp()
    }
}
