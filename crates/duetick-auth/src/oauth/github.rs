//! GitHub OAuth flow.
//!
//! GitHub reports token-exchange failures with a 200 body instead of an
//! error status, and hides the email on many profiles, so this flow checks
//! the token payload explicitly and falls back to the emails endpoint.

use duetick_core::config::OAuthProviderConfig;
use duetick_core::{AppError, AppResult, ErrorKind};
use duetick_entity::user::OauthProvider;
use serde::Deserialize;

use super::client::OAuthUserInfo;

const AUTH_URL: &str = "https://github.com/login/oauth/authorize";
const TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const USER_URL: &str = "https://api.github.com/user";
const EMAILS_URL: &str = "https://api.github.com/user/emails";
const USER_AGENT: &str = "duetick";

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error_description: Option<String>,
}

#[derive(Deserialize)]
struct Profile {
    id: i64,
    login: String,
    name: Option<String>,
    email: Option<String>,
}

#[derive(Deserialize)]
struct EmailEntry {
    email: String,
    primary: bool,
    verified: bool,
}

pub(super) fn authorize_url(cfg: &OAuthProviderConfig, state: &str) -> AppResult<String> {
    let url = reqwest::Url::parse_with_params(
        AUTH_URL,
        &[
            ("client_id", cfg.client_id.as_str()),
            ("redirect_uri", cfg.redirect_uri.as_str()),
            ("scope", "read:user user:email"),
            ("state", state),
        ],
    )
    .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to build GitHub URL", e))?;
    Ok(url.into())
}

pub(super) async fn fetch_user(
    http: &reqwest::Client,
    cfg: &OAuthProviderConfig,
    code: &str,
) -> AppResult<OAuthUserInfo> {
    let token: TokenResponse = http
        .post(TOKEN_URL)
        .header(reqwest::header::ACCEPT, "application/json")
        .form(&[
            ("code", code),
            ("client_id", cfg.client_id.as_str()),
            ("client_secret", cfg.client_secret.as_str()),
            ("redirect_uri", cfg.redirect_uri.as_str()),
        ])
        .send()
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "GitHub token request failed", e)
        })?
        .json()
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Invalid GitHub token response", e)
        })?;

    let access_token = token.access_token.ok_or_else(|| {
        AppError::new(
            ErrorKind::ExternalService,
            format!(
                "GitHub rejected the code: {}",
                token.error_description.as_deref().unwrap_or("unknown error")
            ),
        )
    })?;

    let profile: Profile = http
        .get(USER_URL)
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .bearer_auth(&access_token)
        .send()
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "GitHub user request failed", e)
        })?
        .error_for_status()
        .map_err(|e| AppError::with_source(ErrorKind::ExternalService, "GitHub user rejected", e))?
        .json()
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Invalid GitHub profile", e)
        })?;

    let email = match profile.email {
        Some(email) => email,
        None => primary_email(http, &access_token).await?,
    };

    let display_name = profile.name.unwrap_or_else(|| profile.login.clone());

    Ok(OAuthUserInfo {
        provider: OauthProvider::Github,
        subject: profile.id.to_string(),
        email,
        display_name,
    })
}

async fn primary_email(http: &reqwest::Client, access_token: &str) -> AppResult<String> {
    let emails: Vec<EmailEntry> = http
        .get(EMAILS_URL)
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .bearer_auth(access_token)
        .send()
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "GitHub emails request failed", e)
        })?
        .error_for_status()
        .map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "GitHub emails rejected", e)
        })?
        .json()
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Invalid GitHub emails", e)
        })?;

    emails
        .into_iter()
        .find(|e| e.primary && e.verified)
        .map(|e| e.email)
        .ok_or_else(|| {
            AppError::new(
                ErrorKind::ExternalService,
                "GitHub account has no verified primary email",
            )
        })
}
