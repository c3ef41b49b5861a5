//! JWT decoding and validation.

use duetick_core::config::AuthConfig;
use duetick_core::{AppError, AppResult};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};

use super::claims::{Claims, TokenType};

/// Validates Duetick JWTs: signature, expiry and token type.
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtDecoder {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 5;
        validation.validate_exp = true;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes an access token, rejecting refresh tokens.
    pub fn decode_access_token(&self, token: &str) -> AppResult<Claims> {
        self.decode(token, TokenType::Access)
    }

    /// Decodes a refresh token, rejecting access tokens.
    pub fn decode_refresh_token(&self, token: &str) -> AppResult<Claims> {
        self.decode(token, TokenType::Refresh)
    }

    fn decode(&self, token: &str, expected: TokenType) -> AppResult<Claims> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::authentication("Token has expired")
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature
                | jsonwebtoken::errors::ErrorKind::InvalidToken => {
                    AppError::authentication("Invalid token")
                }
                _ => AppError::authentication("Token validation failed"),
            })?;

        if data.claims.token_type != expected {
            return Err(AppError::authentication("Wrong token type"));
        }

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::encoder::JwtEncoder;
    use duetick_entity::user::UserRole;
    use uuid::Uuid;

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret-at-least-32-bytes-long!!".to_string(),
            jwt_access_ttl_minutes: 15,
            jwt_refresh_ttl_hours: 24,
            password_min_length: 8,
        }
    }

    #[test]
    fn test_roundtrip_access_token() {
        let config = test_config();
        let encoder = JwtEncoder::new(&config);
        let decoder = JwtDecoder::new(&config);

        let user_id = Uuid::new_v4();
        let pair = encoder
            .generate_token_pair(user_id, "user@example.com", UserRole::Admin)
            .unwrap();

        let claims = decoder.decode_access_token(&pair.access_token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "user@example.com");
        assert_eq!(claims.role, UserRole::Admin);
        assert_eq!(claims.token_type, TokenType::Access);
    }

    #[test]
    fn test_refresh_token_rejected_as_access() {
        let config = test_config();
        let encoder = JwtEncoder::new(&config);
        let decoder = JwtDecoder::new(&config);

        let pair = encoder
            .generate_token_pair(Uuid::new_v4(), "user@example.com", UserRole::Member)
            .unwrap();

        assert!(decoder.decode_access_token(&pair.refresh_token).is_err());
        assert!(decoder.decode_refresh_token(&pair.refresh_token).is_ok());
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = test_config();
        let encoder = JwtEncoder::new(&config);
        let decoder = JwtDecoder::new(&config);

        // Expired an hour ago, well past validation leeway.
        let mut claims = Claims::new(
            Uuid::new_v4(),
            "user@example.com".to_string(),
            UserRole::Member,
            TokenType::Access,
            900,
        );
        claims.iat -= 7200;
        claims.exp -= 7200;
        let token = encoder.sign_claims(&claims).unwrap();

        let err = decoder.decode_access_token(&token).unwrap_err();
        assert!(err.to_string().contains("expired"));
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let config = test_config();
        let encoder = JwtEncoder::new(&config);

        let other = AuthConfig {
            jwt_secret: "a-completely-different-signing-secret".to_string(),
            ..test_config()
        };
        let decoder = JwtDecoder::new(&other);

        let pair = encoder
            .generate_token_pair(Uuid::new_v4(), "user@example.com", UserRole::Member)
            .unwrap();

        assert!(decoder.decode_access_token(&pair.access_token).is_err());
    }
}
