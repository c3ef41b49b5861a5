//! Response body types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use duetick_auth::jwt::TokenPair;
use duetick_entity::user::{OauthProvider, User, UserRole};

/// Generic success envelope wrapping every API response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Always `true` for successful responses.
    pub success: bool,
    /// The response payload.
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Wrap a payload in the success envelope.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Simple message response for operations with no payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Body of `GET /api/health/detailed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    pub status: String,
    pub database: String,
}

/// Public view of a user account.
///
/// `password_hash` and `oauth_subject` never leave the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: UserRole,
    /// Provider the account signs in through, if OAuth-based.
    pub oauth_provider: Option<OauthProvider>,
    pub notify_enabled: bool,
    pub notify_days_before: i32,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            role: user.role,
            oauth_provider: user.oauth_provider,
            notify_enabled: user.notify_enabled,
            notify_days_before: user.notify_days_before,
            created_at: user.created_at,
            last_login_at: user.last_login_at,
        }
    }
}

/// Body returned by login, register, and the OAuth callback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

impl LoginResponse {
    pub fn new(user: User, tokens: TokenPair) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
            user: user.into(),
        }
    }
}

/// Body of `POST /api/auth/refresh`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

impl From<TokenPair> for TokenResponse {
    fn from(tokens: TokenPair) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
        }
    }
}

/// Body of `GET /api/auth/oauth/{provider}/authorize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthAuthorizeResponse {
    /// Provider URL the client should redirect the browser to.
    pub authorize_url: String,
    /// The anti-forgery value embedded in that URL.
    pub state: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_user_response_hides_credentials() {
        let user = User {
            id: Uuid::new_v4(),
            email: "ada@example.com".to_string(),
            password_hash: Some("$argon2id$...".to_string()),
            display_name: "Ada".to_string(),
            role: UserRole::Member,
            oauth_provider: None,
            oauth_subject: Some("sub-123".to_string()),
            notify_enabled: true,
            notify_days_before: 3,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            last_login_at: None,
        };

        let json = serde_json::to_value(UserResponse::from(user)).expect("serialize");
        assert!(json.get("password_hash").is_none());
        assert!(json.get("oauth_subject").is_none());
        assert_eq!(json.get("email").unwrap(), "ada@example.com");
    }

    #[test]
    fn test_envelope_marks_success() {
        let json =
            serde_json::to_value(ApiResponse::ok(MessageResponse::new("done"))).expect("serialize");
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["message"], "done");
    }
}
