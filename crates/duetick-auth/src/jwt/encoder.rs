//! JWT encoding.

use duetick_core::config::AuthConfig;
use duetick_core::{AppError, AppResult, ErrorKind};
use duetick_entity::user::UserRole;
use jsonwebtoken::{EncodingKey, Header};
use serde::Serialize;
use uuid::Uuid;

use super::claims::{Claims, TokenType};

/// An access/refresh token pair as returned by login and refresh.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime, seconds.
    pub expires_in: i64,
}

/// Signs Duetick JWTs with the configured HS256 secret.
pub struct JwtEncoder {
    encoding_key: EncodingKey,
    access_ttl_seconds: i64,
    refresh_ttl_seconds: i64,
}

impl JwtEncoder {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            access_ttl_seconds: (config.jwt_access_ttl_minutes * 60) as i64,
            refresh_ttl_seconds: (config.jwt_refresh_ttl_hours * 3600) as i64,
        }
    }

    /// Issues a fresh access/refresh pair for the given user.
    pub fn generate_token_pair(
        &self,
        user_id: Uuid,
        email: &str,
        role: UserRole,
    ) -> AppResult<TokenPair> {
        let access_claims = Claims::new(
            user_id,
            email.to_string(),
            role,
            TokenType::Access,
            self.access_ttl_seconds,
        );
        let refresh_claims = Claims::new(
            user_id,
            email.to_string(),
            role,
            TokenType::Refresh,
            self.refresh_ttl_seconds,
        );

        let access_token = self.sign(&access_claims)?;
        let refresh_token = self.sign(&refresh_claims)?;

        tracing::debug!(user_id = %user_id, jti = %access_claims.jti, "Issued token pair");

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: self.access_ttl_seconds,
        })
    }

    fn sign(&self, claims: &Claims) -> AppResult<String> {
        jsonwebtoken::encode(&Header::default(), claims, &self.encoding_key).map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Failed to sign JWT", e)
        })
    }

    #[cfg(test)]
    pub(crate) fn sign_claims(&self, claims: &Claims) -> AppResult<String> {
        self.sign(claims)
    }
}
