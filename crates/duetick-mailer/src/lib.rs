//! # duetick-mailer
//!
//! Email delivery for Duetick notifications.
//!
//! The [`Mailer`] trait is the seam the notification worker sends through;
//! [`SmtpMailer`] is the production implementation on top of lettre's
//! async SMTP transport with STARTTLS. Rendering of notification emails
//! lives in [`template`].

mod error;
mod message;
mod smtp;
pub mod template;

use async_trait::async_trait;

pub use error::MailError;
pub use message::EmailMessage;
pub use smtp::SmtpMailer;

/// Sends a single email. Implementations must be shareable across the
/// worker's send pool.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &EmailMessage) -> Result<(), MailError>;
}
