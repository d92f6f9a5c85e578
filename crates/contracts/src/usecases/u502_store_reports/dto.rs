use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dashboards::d400_store_kpi::AverageTicket;

/// Addressee of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRecipient {
    pub name: String,
    pub email: String,
}

impl ReportRecipient {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Per-store report for the store manager (all-time window).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreReportPayload {
    pub subject: String,
    pub recipient_email: String,
    pub recipient_name: String,
    pub store_name: String,
    pub total_revenue: f64,
    pub total_quantity: u64,
    /// Must be checked before formatting: `Undefined` for zero units sold
    pub average_ticket: AverageTicket,
}

/// Summary report for the board.
///
/// Best and worst stores come from the all-time ranking; `latest_date` labels
/// the latest-day ranking that travels with it as an attachment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutiveReportPayload {
    pub subject: String,
    pub recipient_email: String,
    pub recipient_name: String,
    pub best_store: String,
    pub best_revenue: f64,
    pub worst_store: String,
    pub worst_revenue: f64,
    pub latest_date: NaiveDate,
    pub latest_day_best_store: String,
    pub latest_day_best_revenue: f64,
}
