//! OAuth provider enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// External identity providers supported for OAuth sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "oauth_provider", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OauthProvider {
    /// Google OpenID Connect.
    Google,
    /// GitHub OAuth.
    Github,
    /// LinkedIn OAuth.
    Linkedin,
}

impl OauthProvider {
    /// Return the provider as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Github => "github",
            Self::Linkedin => "linkedin",
        }
    }
}

impl fmt::Display for OauthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OauthProvider {
    type Err = duetick_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "github" => Ok(Self::Github),
            "linkedin" => Ok(Self::Linkedin),
            _ => Err(duetick_core::AppError::validation(format!(
                "Invalid OAuth provider: '{s}'. Expected one of: google, github, linkedin"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!(
            "google".parse::<OauthProvider>().unwrap(),
            OauthProvider::Google
        );
        assert_eq!(
            "GitHub".parse::<OauthProvider>().unwrap(),
            OauthProvider::Github
        );
        assert!("gitlab".parse::<OauthProvider>().is_err());
    }
}
