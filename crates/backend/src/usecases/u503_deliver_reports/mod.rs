use async_trait::async_trait;
use lettre::address::AddressError;
use lettre::Address;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use crate::shared::config::{MailConfig, MailProvider};

pub mod delivery;
mod outbox;
mod smtp;
pub mod templates;

pub use delivery::{deliver_all, OutgoingReport};
pub use outbox::OutboxMailClient;
pub use smtp::SmtpMailClient;

/// Failure of a single send. Collected per recipient, never fatal to a run.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("invalid address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("failed to build email: {0}")]
    Build(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("outbox write failed: {0}")]
    Outbox(#[from] std::io::Error),
}

#[derive(Debug, Clone, Serialize)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    #[serde(skip)]
    pub content: Vec<u8>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub to_name: String,
    pub subject: String,
    pub body_html: Option<String>,
    pub body_text: Option<String>,
    pub attachments: Vec<Attachment>,
}

#[async_trait]
pub trait MailClient: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<(), DeliveryError>;
}

pub type DynMailClient = Arc<dyn MailClient>;

/// Recipient address as the SMTP transport would accept it.
pub(crate) fn parse_address(address: &str) -> Result<Address, DeliveryError> {
    address
        .parse()
        .map_err(|e: AddressError| DeliveryError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        })
}

/// Dry run: logs what would be sent.
pub struct LogMailClient {
    from_email: String,
    from_name: String,
}

impl LogMailClient {
    pub fn new(config: &MailConfig) -> Self {
        Self {
            from_email: config.from_email.clone(),
            from_name: config.from_name.clone(),
        }
    }
}

#[async_trait]
impl MailClient for LogMailClient {
    async fn send(&self, message: EmailMessage) -> Result<(), DeliveryError> {
        parse_address(&message.to)?;
        tracing::info!(
            "[dry run] {} <{}> -> {} <{}>: {} ({} attachment(s))",
            self.from_name,
            self.from_email,
            message.to_name,
            message.to,
            message.subject,
            message.attachments.len()
        );
        if let Some(text) = &message.body_text {
            tracing::debug!("[dry run] body:\n{}", text);
        }
        Ok(())
    }
}

pub fn create_mail_client(config: &MailConfig) -> anyhow::Result<DynMailClient> {
    match config.provider {
        MailProvider::Log => Ok(Arc::new(LogMailClient::new(config))),
        MailProvider::Outbox => Ok(Arc::new(OutboxMailClient::new(config))),
        MailProvider::Smtp => {
            let smtp_settings = config.smtp.as_ref().ok_or_else(|| {
                anyhow::anyhow!("[mail.smtp] settings required for the smtp provider")
            })?;
            let client = SmtpMailClient::new(config, smtp_settings)?;
            Ok(Arc::new(client))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MailConfig {
        MailConfig {
            provider: MailProvider::Log,
            from_email: "bot@example.com".into(),
            from_name: "Bot".into(),
            executive_email: "board@example.com".into(),
            executive_name: "Board".into(),
            currency: "R$".into(),
            outbox_dir: "target/outbox".into(),
            smtp: None,
        }
    }

    fn message(to: &str) -> EmailMessage {
        EmailMessage {
            to: to.into(),
            to_name: "Bruno".into(),
            subject: "OnePage Anual - Loja Beta".into(),
            body_html: None,
            body_text: Some("Bom dia".into()),
            attachments: Vec::new(),
        }
    }

    #[test]
    fn test_parse_address() {
        assert!(parse_address("ana@example.com").is_ok());
        assert!(matches!(
            parse_address("bruno-at-example.com"),
            Err(DeliveryError::InvalidAddress { address, .. }) if address == "bruno-at-example.com"
        ));
    }

    #[tokio::test]
    async fn test_dry_run_still_checks_recipient() {
        let client = create_mail_client(&config()).unwrap();

        assert!(client.send(message("bruno@example.com")).await.is_ok());
        assert!(client.send(message("bruno-at-example.com")).await.is_err());
    }
}
