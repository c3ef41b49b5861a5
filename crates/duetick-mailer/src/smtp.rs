//! SMTP transport on top of lettre.

use std::path::Path;

use async_trait::async_trait;
use duetick_core::config::SmtpConfig;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, Message, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Tokio1Executor};

use crate::error::MailError;
use crate::message::EmailMessage;
use crate::Mailer;

/// Production mailer: STARTTLS relay with optional credentials.
///
/// Construction validates the sender address and TLS setup up front, so a
/// misconfigured deployment fails at startup instead of at first send.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let from = sender_mailbox(config)?;

        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?.port(config.port);
        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        tracing::info!(host = %config.host, port = config.port, "SMTP transport ready");

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &EmailMessage) -> Result<(), MailError> {
        let message = build_message(&self.from, email).await?;
        self.transport.send(message).await?;
        tracing::debug!(to = ?email.to, subject = %email.subject, "Email sent");
        Ok(())
    }
}

fn sender_mailbox(config: &SmtpConfig) -> Result<Mailbox, MailError> {
    let address = config
        .from_address
        .parse::<Address>()
        .map_err(|e| MailError::address(&config.from_address, e))?;
    let name = (!config.from_name.is_empty()).then(|| config.from_name.clone());
    Ok(Mailbox::new(name, address))
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.parse().map_err(|e| MailError::address(address, e))
}

/// Assembles the MIME message: a plain/HTML alternative, wrapped in a
/// mixed multipart when attachments are present. A message without a
/// single recipient fails at build, not at the relay.
async fn build_message(from: &Mailbox, email: &EmailMessage) -> Result<Message, MailError> {
    let alternative = MultiPart::alternative()
        .singlepart(
            SinglePart::builder()
                .header(ContentType::TEXT_PLAIN)
                .body(email.text_body.clone()),
        )
        .singlepart(
            SinglePart::builder()
                .header(ContentType::TEXT_HTML)
                .body(email.html_body.clone()),
        );

    let mut builder = Message::builder()
        .from(from.clone())
        .subject(email.subject.clone());

    for to in &email.to {
        builder = builder.to(parse_mailbox(to)?);
    }
    for cc in &email.cc {
        builder = builder.cc(parse_mailbox(cc)?);
    }
    for bcc in &email.bcc {
        builder = builder.bcc(parse_mailbox(bcc)?);
    }

    let message = if email.attachments.is_empty() {
        builder.multipart(alternative)?
    } else {
        let mut mixed = MultiPart::mixed().multipart(alternative);
        for path in &email.attachments {
            mixed = mixed.singlepart(read_attachment(path).await?);
        }
        builder.multipart(mixed)?
    };

    Ok(message)
}

async fn read_attachment(path: &Path) -> Result<SinglePart, MailError> {
    let content = tokio::fs::read(path)
        .await
        .map_err(|source| MailError::Attachment {
            path: path.display().to_string(),
            source,
        })?;

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment".to_string());

    let mime = mime_guess::from_path(path).first_or_octet_stream();
    let content_type = ContentType::parse(mime.essence_str()).unwrap_or(ContentType::TEXT_PLAIN);

    Ok(Attachment::new(filename).body(content, content_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn from_mailbox() -> Mailbox {
        "Duetick <no-reply@duetick.example>".parse().unwrap()
    }

    #[test]
    fn test_sender_mailbox_rejects_bad_address() {
        let config = SmtpConfig {
            host: "localhost".to_string(),
            port: 587,
            username: String::new(),
            password: String::new(),
            from_address: "not an address".to_string(),
            from_name: "Duetick".to_string(),
        };
        assert!(matches!(
            sender_mailbox(&config),
            Err(MailError::Address { .. })
        ));
    }

    #[tokio::test]
    async fn test_build_message_without_attachments() {
        let email = EmailMessage::new(
            "user@example.com",
            "Upcoming reminder",
            "plain body",
            "<p>html body</p>",
        );
        let message = build_message(&from_mailbox(), &email).await.unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: Upcoming reminder"));
        assert!(raw.contains("multipart/alternative"));
    }

    #[tokio::test]
    async fn test_build_message_carries_cc_and_bcc() {
        let email = EmailMessage::new("user@example.com", "Subject", "body", "<p>body</p>")
            .with_cc(vec!["manager@example.com".to_string()])
            .with_bcc(vec!["audit@example.com".to_string()]);

        let message = build_message(&from_mailbox(), &email).await.unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("To: user@example.com"));
        assert!(raw.contains("Cc: manager@example.com"));

        let recipients: Vec<String> = message
            .envelope()
            .to()
            .iter()
            .map(|a| a.to_string())
            .collect();
        assert!(recipients.contains(&"audit@example.com".to_string()));
    }

    #[tokio::test]
    async fn test_build_message_with_attachment() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"attachment payload").unwrap();

        let email = EmailMessage::new("user@example.com", "With file", "body", "<p>body</p>")
            .with_attachments(vec![file.path().to_path_buf()]);

        let message = build_message(&from_mailbox(), &email).await.unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("multipart/mixed"));
    }

    #[tokio::test]
    async fn test_missing_attachment_names_path() {
        let email = EmailMessage::new("user@example.com", "Subject", "body", "<p>body</p>")
            .with_attachments(vec!["/nonexistent/duetick/report.pdf".into()]);

        let err = build_message(&from_mailbox(), &email).await.unwrap_err();
        match err {
            MailError::Attachment { path, .. } => {
                assert_eq!(path, "/nonexistent/duetick/report.pdf")
            }
            other => panic!("expected attachment error, got {other}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_recipient_rejected() {
        let email = EmailMessage::new("not-an-address", "Subject", "body", "<p>body</p>");
        assert!(matches!(
            build_message(&from_mailbox(), &email).await,
            Err(MailError::Address { .. })
        ));
    }
}
