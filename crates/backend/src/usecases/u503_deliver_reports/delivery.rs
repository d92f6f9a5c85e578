use contracts::usecases::u503_deliver_reports::{DeliveryRecord, DeliveryStatus, DeliverySummary};

use super::{EmailMessage, MailClient};

/// A rendered message plus the store it reports on (`None` for the board).
#[derive(Debug, Clone)]
pub struct OutgoingReport {
    pub store_name: Option<String>,
    pub message: EmailMessage,
}

/// Send every report once, in order. A failed send is recorded and the next
/// report goes out regardless; nothing is retried.
pub async fn deliver_all(client: &dyn MailClient, reports: Vec<OutgoingReport>) -> DeliverySummary {
    let mut summary = DeliverySummary::default();

    for report in reports {
        let recipient_email = report.message.to.clone();
        let label = report.store_name.as_deref().unwrap_or("executive");

        let status = match client.send(report.message).await {
            Ok(()) => {
                tracing::info!("Report {} delivered to {}", label, recipient_email);
                DeliveryStatus::Delivered
            }
            Err(e) => {
                tracing::error!("Report {} to {} failed: {}", label, recipient_email, e);
                DeliveryStatus::Failed {
                    reason: e.to_string(),
                }
            }
        };

        summary.push(DeliveryRecord {
            store_name: report.store_name,
            recipient_email,
            status,
        });
    }

    summary
}
