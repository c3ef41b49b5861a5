//! Mail delivery errors.

use duetick_core::{AppError, ErrorKind};
use thiserror::Error;

/// Errors raised while building or sending an email.
#[derive(Debug, Error)]
pub enum MailError {
    /// A sender or recipient address failed to parse.
    #[error("Invalid email address '{address}': {reason}")]
    Address { address: String, reason: String },

    /// An attachment could not be read from disk.
    #[error("Failed to read attachment '{path}': {source}")]
    Attachment {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The message itself could not be assembled.
    #[error("Failed to build email message: {0}")]
    Message(#[from] lettre::error::Error),

    /// SMTP-level failure: connection, TLS negotiation, or delivery.
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

impl MailError {
    pub(crate) fn address(address: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Address {
            address: address.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<MailError> for AppError {
    fn from(err: MailError) -> Self {
        AppError::with_source(ErrorKind::Mail, "Email delivery failed", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_error_names_path() {
        let err = MailError::Attachment {
            path: "/var/duetick/missing.pdf".to_string(),
            source: std::io::Error::other("no such file"),
        };
        assert!(err.to_string().contains("/var/duetick/missing.pdf"));
    }

    #[test]
    fn test_address_error_names_address() {
        let err = MailError::address("not-an-address", "missing domain");
        assert!(err.to_string().contains("not-an-address"));
    }
}
