//! LinkedIn OAuth flow (OpenID Connect).

use duetick_core::config::OAuthProviderConfig;
use duetick_core::{AppError, AppResult, ErrorKind};
use duetick_entity::user::OauthProvider;
use serde::Deserialize;

use super::client::OAuthUserInfo;

const AUTH_URL: &str = "https://www.linkedin.com/oauth/v2/authorization";
const TOKEN_URL: &str = "https://www.linkedin.com/oauth/v2/accessToken";
const USERINFO_URL: &str = "https://api.linkedin.com/v2/userinfo";

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct Profile {
    sub: String,
    email: String,
    name: Option<String>,
}

pub(super) fn authorize_url(cfg: &OAuthProviderConfig, state: &str) -> AppResult<String> {
    let url = reqwest::Url::parse_with_params(
        AUTH_URL,
        &[
            ("client_id", cfg.client_id.as_str()),
            ("redirect_uri", cfg.redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", "openid profile email"),
            ("state", state),
        ],
    )
    .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to build LinkedIn URL", e))?;
    Ok(url.into())
}

pub(super) async fn fetch_user(
    http: &reqwest::Client,
    cfg: &OAuthProviderConfig,
    code: &str,
) -> AppResult<OAuthUserInfo> {
    let token: TokenResponse = http
        .post(TOKEN_URL)
        .form(&[
            ("code", code),
            ("client_id", cfg.client_id.as_str()),
            ("client_secret", cfg.client_secret.as_str()),
            ("redirect_uri", cfg.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "LinkedIn token request failed", e)
        })?
        .error_for_status()
        .map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "LinkedIn rejected the code", e)
        })?
        .json()
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Invalid LinkedIn token response", e)
        })?;

    let profile: Profile = http
        .get(USERINFO_URL)
        .bearer_auth(&token.access_token)
        .send()
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                "LinkedIn userinfo request failed",
                e,
            )
        })?
        .error_for_status()
        .map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "LinkedIn userinfo rejected", e)
        })?
        .json()
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Invalid LinkedIn profile", e)
        })?;

    let display_name = profile.name.unwrap_or_else(|| profile.email.clone());

    Ok(OAuthUserInfo {
        provider: OauthProvider::Linkedin,
        subject: profile.sub,
        email: profile.email,
        display_name,
    })
}
