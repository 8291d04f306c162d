use crate::domain::model::{ContentMode, DeliveryConfig, Message};
use crate::domain::ports::Transport;
use crate::utils::error::{MailError, Result};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Body, Mailbox, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use std::path::Path;

/// SMTP backend over a STARTTLS relay. The connection pool inside
/// [`AsyncSmtpTransport`] is reused across every recipient of a run.
///
/// `from` pairs the configured display name with the authenticated account
/// address; the display name never changes which account is authenticated.
#[derive(Debug)]
pub struct SmtpMailer {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(host: &str, port: Option<u16>, config: &DeliveryConfig) -> Result<Self> {
        let credentials = Credentials::new(config.username.clone(), config.password.clone());

        let mut relay =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?.credentials(credentials);
        if let Some(port) = port {
            relay = relay.port(port);
        }

        let address: Address = config.username.parse()?;
        let from = Mailbox::new(Some(config.sender_name().to_string()), address);

        Ok(Self {
            mailer: relay.build(),
            from,
        })
    }

    async fn build_email(&self, message: &Message, to: &str) -> Result<lettre::Message> {
        let builder = lettre::Message::builder()
            .from(self.from.clone())
            .to(to.parse()?)
            .subject(message.subject.clone());

        let content_type = match message.mode {
            ContentMode::Html => ContentType::TEXT_HTML,
            ContentMode::Text => ContentType::TEXT_PLAIN,
        };
        let body_part = SinglePart::builder()
            .header(content_type)
            .body(message.active_body().to_string());

        let email = match &message.attachment {
            Some(path) => {
                // Attachment existence is deferred to here; a read failure is
                // a recipient-scoped delivery error, not a config error.
                let bytes = tokio::fs::read(path).await?;
                let filename = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("attachment")
                    .to_string();
                let attachment_type = ContentType::parse(content_type_for(path)).map_err(|e| {
                    MailError::ConfigError {
                        message: format!("invalid attachment content type: {}", e),
                    }
                })?;
                let attachment_part =
                    Attachment::new(filename).body(Body::new(bytes), attachment_type);

                builder.multipart(
                    lettre::message::MultiPart::mixed()
                        .singlepart(body_part)
                        .singlepart(attachment_part),
                )?
            }
            None => builder.singlepart(body_part)?,
        };

        Ok(email)
    }
}

#[async_trait]
impl Transport for SmtpMailer {
    async fn send(&self, message: &Message, to: &str) -> Result<()> {
        let email = self.build_email(message, to).await?;
        self.mailer.send(email).await?;
        Ok(())
    }
}

fn content_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        Some("html") => "text/html",
        Some("csv") => "text/csv",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("zip") => "application/zip",
        _ => "application/octet-stream",
    }
}
