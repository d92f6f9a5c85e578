use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Attachment as MailAttachment, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use super::{parse_address, DeliveryError, EmailMessage, MailClient};
use crate::shared::config::{MailConfig, SmtpSettings};

/// SMTP over implicit TLS. Credentials are read once, when the client is built.
pub struct SmtpMailClient {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_email: String,
    from_name: String,
}

impl SmtpMailClient {
    pub fn new(config: &MailConfig, smtp: &SmtpSettings) -> anyhow::Result<Self> {
        let username = std::env::var(&smtp.username_env)
            .map_err(|_| anyhow::anyhow!("SMTP username env var {} not set", smtp.username_env))?;
        let password = std::env::var(&smtp.password_env)
            .map_err(|_| anyhow::anyhow!("SMTP password env var {} not set", smtp.password_env))?;

        let creds = Credentials::new(username, password);

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.host)
            .map_err(|e| anyhow::anyhow!("Failed to create SMTP transport: {}", e))?
            .port(smtp.port)
            .credentials(creds)
            .build();

        Ok(Self {
            transport,
            from_email: config.from_email.clone(),
            from_name: config.from_name.clone(),
        })
    }
}

fn mailbox(name: &str, email: &str) -> Result<Mailbox, DeliveryError> {
    Ok(Mailbox::new(Some(name.to_string()), parse_address(email)?))
}

fn body(message: &EmailMessage) -> Result<MultiPart, DeliveryError> {
    match (&message.body_html, &message.body_text) {
        (Some(html), Some(text)) => {
            Ok(MultiPart::alternative_plain_html(text.clone(), html.clone()))
        }
        (Some(html), None) => Ok(MultiPart::mixed().singlepart(SinglePart::html(html.clone()))),
        (None, Some(text)) => Ok(MultiPart::mixed().singlepart(SinglePart::plain(text.clone()))),
        (None, None) => Err(DeliveryError::Build(
            "email must have either HTML or text body".into(),
        )),
    }
}

fn build_message(from: Mailbox, message: &EmailMessage) -> Result<Message, DeliveryError> {
    let mut parts = MultiPart::mixed().multipart(body(message)?);
    for attachment in &message.attachments {
        let content_type = ContentType::parse(&attachment.content_type)
            .map_err(|e| DeliveryError::Build(e.to_string()))?;
        parts = parts.singlepart(
            MailAttachment::new(attachment.filename.clone())
                .body(attachment.content.clone(), content_type),
        );
    }

    Message::builder()
        .from(from)
        .to(mailbox(&message.to_name, &message.to)?)
        .subject(&message.subject)
        .multipart(parts)
        .map_err(|e| DeliveryError::Build(e.to_string()))
}

#[async_trait]
impl MailClient for SmtpMailClient {
    async fn send(&self, message: EmailMessage) -> Result<(), DeliveryError> {
        let from = mailbox(&self.from_name, &self.from_email)?;
        let email = build_message(from, &message)?;

        self.transport
            .send(email)
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        Ok(())
    }
}
