//! Email job value object.

use duetick_entity::notification::NotificationCandidate;
use duetick_entity::user::Recipient;
use duetick_mailer::{template, EmailMessage};

/// One fully prepared email, queued for the send pool.
///
/// A job is immutable once built; the candidate rides along so the
/// consumer can issue the right write-back after a successful send.
#[derive(Debug, Clone)]
pub struct EmailJob {
    pub candidate: NotificationCandidate,
    pub message: EmailMessage,
}

impl EmailJob {
    /// Renders the email for a candidate addressed to its recipient.
    pub fn build(candidate: NotificationCandidate, recipient: &Recipient) -> Self {
        let rendered = template::render(&candidate, &recipient.display_name);
        let message = EmailMessage::new(
            recipient.email.clone(),
            rendered.subject,
            rendered.text_body,
            rendered.html_body,
        );
        Self { candidate, message }
    }
}
