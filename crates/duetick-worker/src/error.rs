//! Dispatch error classification.

use duetick_core::error::AppError;
use duetick_mailer::MailError;

/// Error from dispatching one notification email.
///
/// The classification only affects log severity and, for transient
/// failures, signals that the next poll cycle is expected to succeed.
/// Neither variant triggers a write-back: a candidate is only retired
/// after a successful send.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// Permanent failure; retrying the same candidate cannot succeed.
    #[error("Permanent dispatch failure: {0}")]
    Permanent(String),

    /// Transient failure; a later cycle may succeed.
    #[error("Transient dispatch failure: {0}")]
    Transient(String),

    /// Internal error from the store or the gateway.
    #[error("Internal error: {0}")]
    Internal(#[from] AppError),
}

impl From<MailError> for DispatchError {
    fn from(err: MailError) -> Self {
        match &err {
            // Connection, TLS, and SMTP delivery problems heal on retry.
            MailError::Transport(_) => Self::Transient(err.to_string()),
            // Malformed addresses and unreadable attachments do not.
            MailError::Address { .. } | MailError::Attachment { .. } | MailError::Message(_) => {
                Self::Permanent(err.to_string())
            }
        }
    }
}
