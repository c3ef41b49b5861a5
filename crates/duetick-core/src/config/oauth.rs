//! OAuth provider configuration.

use serde::{Deserialize, Serialize};

/// Configuration for all supported OAuth providers.
///
/// A provider with an empty `client_id` is treated as disabled; its
/// authorization and callback endpoints reject every request.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OAuthConfig {
    /// Google OAuth application credentials.
    #[serde(default)]
    pub google: OAuthProviderConfig,
    /// GitHub OAuth application credentials.
    #[serde(default)]
    pub github: OAuthProviderConfig,
    /// LinkedIn OAuth application credentials.
    #[serde(default)]
    pub linkedin: OAuthProviderConfig,
}

/// Credentials for a single OAuth provider.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OAuthProviderConfig {
    /// OAuth client identifier.
    #[serde(default)]
    pub client_id: String,
    /// OAuth client secret.
    #[serde(default)]
    pub client_secret: String,
    /// Redirect URI registered with the provider.
    #[serde(default)]
    pub redirect_uri: String,
}

impl OAuthProviderConfig {
    /// Whether this provider has been configured.
    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}
