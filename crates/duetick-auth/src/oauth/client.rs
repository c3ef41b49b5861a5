//! Provider-dispatching OAuth client.

use duetick_core::config::{OAuthConfig, OAuthProviderConfig};
use duetick_core::{AppError, AppResult};
use duetick_entity::user::OauthProvider;

use super::{github, google, linkedin};

/// Normalized profile returned by every provider flow.
#[derive(Debug, Clone)]
pub struct OAuthUserInfo {
    pub provider: OauthProvider,
    /// Provider-scoped stable subject id.
    pub subject: String,
    pub email: String,
    pub display_name: String,
}

/// Exchanges authorization codes for user profiles.
pub struct OAuthClient {
    http: reqwest::Client,
    config: OAuthConfig,
}

impl OAuthClient {
    pub fn new(config: OAuthConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Builds the provider's authorization URL for the browser redirect.
    pub fn authorize_url(&self, provider: OauthProvider, state: &str) -> AppResult<String> {
        let cfg = self.provider_config(provider)?;
        let url = match provider {
            OauthProvider::Google => google::authorize_url(cfg, state),
            OauthProvider::Github => github::authorize_url(cfg, state),
            OauthProvider::Linkedin => linkedin::authorize_url(cfg, state),
        }?;
        Ok(url)
    }

    /// Exchanges an authorization code and fetches the user's profile.
    pub async fn fetch_user(
        &self,
        provider: OauthProvider,
        code: &str,
    ) -> AppResult<OAuthUserInfo> {
        let cfg = self.provider_config(provider)?;
        let info = match provider {
            OauthProvider::Google => google::fetch_user(&self.http, cfg, code).await,
            OauthProvider::Github => github::fetch_user(&self.http, cfg, code).await,
            OauthProvider::Linkedin => linkedin::fetch_user(&self.http, cfg, code).await,
        }?;

        tracing::info!(
            provider = %provider,
            subject = %info.subject,
            "Fetched OAuth profile"
        );
        Ok(info)
    }

    fn provider_config(&self, provider: OauthProvider) -> AppResult<&OAuthProviderConfig> {
        let cfg = match provider {
            OauthProvider::Google => &self.config.google,
            OauthProvider::Github => &self.config.github,
            OauthProvider::Linkedin => &self.config.linkedin,
        };
        if !cfg.is_configured() {
            return Err(AppError::validation(format!(
                "OAuth provider '{provider}' is not configured"
            )));
        }
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_provider_rejected() {
        let client = OAuthClient::new(OAuthConfig::default());
        let err = client
            .authorize_url(OauthProvider::Google, "xyz")
            .unwrap_err();
        assert!(err.to_string().contains("not configured"));
    }

    #[test]
    fn test_authorize_url_carries_state_and_client_id() {
        let mut config = OAuthConfig::default();
        config.github = OAuthProviderConfig {
            client_id: "gh-client".to_string(),
            client_secret: "gh-secret".to_string(),
            redirect_uri: "https://app.example.com/oauth/github/callback".to_string(),
        };
        let client = OAuthClient::new(config);

        let url = client
            .authorize_url(OauthProvider::Github, "random-state")
            .unwrap();
        assert!(url.starts_with("https://github.com/login/oauth/authorize?"));
        assert!(url.contains("client_id=gh-client"));
        assert!(url.contains("state=random-state"));
        assert!(!url.contains("gh-secret"));
    }
}
