//! SMTP relay configuration for outgoing notification mail.

use serde::{Deserialize, Serialize};

/// SMTP submission settings.
///
/// The transport always negotiates STARTTLS with the relay and
/// authenticates with plain credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    /// Relay hostname used for both TLS verification and submission.
    #[serde(default = "default_host")]
    pub host: String,
    /// Submission port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Username for plain authentication.
    #[serde(default)]
    pub username: String,
    /// Password or app-specific token for plain authentication.
    #[serde(default)]
    pub password: String,
    /// Sender address placed in the `From` header.
    #[serde(default)]
    pub from_address: String,
    /// Sender display name placed in the `From` header.
    #[serde(default = "default_from_name")]
    pub from_name: String,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    587
}

fn default_from_name() -> String {
    "Duetick".to_string()
}
