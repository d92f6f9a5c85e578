use serde::{Deserialize, Serialize};

/// Outcome of one send attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeliveryStatus {
    Delivered,
    Failed { reason: String },
}

impl DeliveryStatus {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryStatus::Delivered)
    }
}

/// Delivery result for one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryRecord {
    /// Store the report was about, `None` for the executive report
    pub store_name: Option<String>,
    pub recipient_email: String,
    pub status: DeliveryStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliverySummary {
    pub records: Vec<DeliveryRecord>,
}

impl DeliverySummary {
    pub fn push(&mut self, record: DeliveryRecord) {
        self.records.push(record);
    }

    pub fn delivered(&self) -> usize {
        self.records.iter().filter(|r| r.status.is_delivered()).count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &DeliveryRecord> {
        self.records.iter().filter(|r| !r.status.is_delivered())
    }

    pub fn extend(&mut self, other: DeliverySummary) {
        self.records.extend(other.records);
    }
}
