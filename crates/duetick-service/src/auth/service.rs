//! Authentication flows: registration, login, token refresh, and OAuth.

use std::sync::Arc;

use tracing::info;

use duetick_auth::jwt::{JwtDecoder, JwtEncoder, TokenPair};
use duetick_auth::oauth::OAuthClient;
use duetick_auth::password::{PasswordHasher, PasswordValidator};
use duetick_core::error::AppError;
use duetick_database::repositories::user::UserRepository;
use duetick_entity::user::{CreateUser, OauthProvider, User, UserRole};

/// Data for registering a new account.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RegisterRequest {
    /// Email address, also the login name.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Display name (optional, derived from the email when empty).
    #[serde(default)]
    pub display_name: String,
}

/// Data for a password login.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Handles account creation and every way of signing in.
#[derive(Clone)]
pub struct AuthService {
    /// User repository.
    user_repo: Arc<UserRepository>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Password policy.
    validator: Arc<PasswordValidator>,
    /// Token issuer.
    encoder: Arc<JwtEncoder>,
    /// Token validator.
    decoder: Arc<JwtDecoder>,
    /// OAuth provider client.
    oauth: Arc<OAuthClient>,
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
        encoder: Arc<JwtEncoder>,
        decoder: Arc<JwtDecoder>,
        oauth: Arc<OAuthClient>,
    ) -> Self {
        Self {
            user_repo,
            hasher,
            validator,
            encoder,
            decoder,
            oauth,
        }
    }

    /// Registers a new password-based account and signs it in.
    pub async fn register(&self, req: RegisterRequest) -> Result<(User, TokenPair), AppError> {
        let email = normalize_email(&req.email)?;
        self.validator.validate(&req.password)?;

        let display_name = if req.display_name.trim().is_empty() {
            default_display_name(&email)
        } else {
            req.display_name.trim().to_string()
        };

        let password_hash = self.hasher.hash_password(&req.password)?;

        let user = self
            .user_repo
            .create(&CreateUser {
                email,
                password_hash: Some(password_hash),
                display_name,
                role: UserRole::Member,
                oauth_provider: None,
                oauth_subject: None,
            })
            .await?;

        let tokens = self
            .encoder
            .generate_token_pair(user.id, &user.email, user.role)?;

        info!(user_id = %user.id, "User registered");

        Ok((user, tokens))
    }

    /// Verifies credentials and issues a token pair.
    pub async fn login(&self, req: LoginRequest) -> Result<(User, TokenPair), AppError> {
        let user = self
            .user_repo
            .find_by_email(req.email.trim())
            .await?
            .ok_or_else(|| AppError::authentication("Invalid email or password"))?;

        // OAuth-only accounts have no password to check.
        let Some(stored_hash) = &user.password_hash else {
            return Err(AppError::authentication(
                "This account signs in through an identity provider",
            ));
        };

        if !self.hasher.verify_password(&req.password, stored_hash)? {
            return Err(AppError::authentication("Invalid email or password"));
        }

        self.user_repo.update_last_login(user.id).await?;

        let tokens = self
            .encoder
            .generate_token_pair(user.id, &user.email, user.role)?;

        info!(user_id = %user.id, "User logged in");

        Ok((user, tokens))
    }

    /// Exchanges a valid refresh token for a fresh token pair.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        let claims = self.decoder.decode_refresh_token(refresh_token)?;

        // Re-check the account so tokens die with it.
        let user = self
            .user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| AppError::authentication("Account no longer exists"))?;

        self.encoder
            .generate_token_pair(user.id, &user.email, user.role)
    }

    /// Builds the provider authorization URL for the browser redirect.
    pub fn oauth_authorize_url(
        &self,
        provider: OauthProvider,
        state: &str,
    ) -> Result<String, AppError> {
        self.oauth.authorize_url(provider, state)
    }

    /// Completes an OAuth callback: exchanges the code, finds or creates
    /// the account, and signs it in.
    pub async fn oauth_login(
        &self,
        provider: OauthProvider,
        code: &str,
    ) -> Result<(User, TokenPair), AppError> {
        let profile = self.oauth.fetch_user(provider, code).await?;

        let user = match self
            .user_repo
            .find_by_oauth(provider, &profile.subject)
            .await?
        {
            Some(user) => user,
            None => {
                // First sign-in through this provider. A colliding email
                // means the address already has a password account.
                let email = normalize_email(&profile.email)?;
                if self.user_repo.find_by_email(&email).await?.is_some() {
                    return Err(AppError::conflict(
                        "An account with this email already exists; sign in with your password",
                    ));
                }

                let user = self
                    .user_repo
                    .create(&CreateUser {
                        email,
                        password_hash: None,
                        display_name: profile.display_name.clone(),
                        role: UserRole::Member,
                        oauth_provider: Some(provider),
                        oauth_subject: Some(profile.subject.clone()),
                    })
                    .await?;

                info!(user_id = %user.id, provider = %provider, "OAuth account created");
                user
            }
        };

        self.user_repo.update_last_login(user.id).await?;

        let tokens = self
            .encoder
            .generate_token_pair(user.id, &user.email, user.role)?;

        info!(user_id = %user.id, provider = %provider, "OAuth login");

        Ok((user, tokens))
    }
}

fn normalize_email(email: &str) -> Result<String, AppError> {
    let email = email.trim().to_lowercase();
    if !email.contains('@') || !email.contains('.') || email.len() < 5 {
        return Err(AppError::validation("Invalid email format"));
    }
    Ok(email)
}

fn default_display_name(email: &str) -> String {
    email
        .split('@')
        .next()
        .unwrap_or(email)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email_lowercases_and_trims() {
        assert_eq!(
            normalize_email("  Ada@Example.COM ").unwrap(),
            "ada@example.com"
        );
    }

    #[test]
    fn test_normalize_email_rejects_garbage() {
        assert!(normalize_email("not-an-email").is_err());
        assert!(normalize_email("a@b").is_err());
    }

    #[test]
    fn test_default_display_name_from_local_part() {
        assert_eq!(default_display_name("ada@example.com"), "ada");
    }
}
