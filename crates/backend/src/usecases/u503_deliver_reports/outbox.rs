use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{parse_address, DeliveryError, EmailMessage, MailClient};
use crate::shared::config::MailConfig;

/// Writes every message as a JSON file, attachments next to it.
pub struct OutboxMailClient {
    dir: PathBuf,
    from_email: String,
    from_name: String,
    sequence: AtomicUsize,
}

impl OutboxMailClient {
    pub fn new(config: &MailConfig) -> Self {
        Self {
            dir: config.outbox_dir.clone(),
            from_email: config.from_email.clone(),
            from_name: config.from_name.clone(),
            sequence: AtomicUsize::new(0),
        }
    }
}

/// Keeps file names portable: `ana@example.com` -> `ana_example.com`
fn file_stem(address: &str) -> String {
    address
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
        .collect()
}

#[async_trait]
impl MailClient for OutboxMailClient {
    async fn send(&self, message: EmailMessage) -> Result<(), DeliveryError> {
        parse_address(&message.to)?;

        tokio::fs::create_dir_all(&self.dir).await?;

        let seq = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let stem = format!("{:03}-{}", seq, file_stem(&message.to));

        for attachment in &message.attachments {
            let path = self.dir.join(format!("{}-{}", stem, attachment.filename));
            tokio::fs::write(&path, &attachment.content).await?;
        }

        let envelope = serde_json::json!({
            "from": format!("{} <{}>", self.from_name, self.from_email),
            "message": message,
        });
        let json = serde_json::to_vec_pretty(&envelope)
            .map_err(|e| DeliveryError::Build(e.to_string()))?;
        let path = self.dir.join(format!("{}.json", stem));
        tokio::fs::write(&path, json).await?;

        tracing::info!("Email to {} written to {}", message.to, path.display());
        Ok(())
    }
}
