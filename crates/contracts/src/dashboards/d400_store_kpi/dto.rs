use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Average ticket
// ---------------------------------------------------------------------------

/// Revenue per unit sold.
///
/// `Undefined` when the store sold zero units; consumers have to branch on it
/// before formatting. Serialized as a number or `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum AverageTicket {
    Value(f64),
    Undefined,
}

impl AverageTicket {
    /// Ratio of two finished sums. Never yields NaN or infinity.
    pub fn from_totals(total_revenue: f64, total_quantity: u64) -> Self {
        if total_quantity == 0 {
            return AverageTicket::Undefined;
        }
        let ratio = total_revenue / total_quantity as f64;
        if ratio.is_finite() {
            AverageTicket::Value(ratio)
        } else {
            AverageTicket::Undefined
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            AverageTicket::Value(v) => Some(*v),
            AverageTicket::Undefined => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, AverageTicket::Undefined)
    }
}

impl From<Option<f64>> for AverageTicket {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => AverageTicket::Value(v),
            _ => AverageTicket::Undefined,
        }
    }
}

impl From<AverageTicket> for Option<f64> {
    fn from(value: AverageTicket) -> Self {
        value.value()
    }
}

// ---------------------------------------------------------------------------
// Store metrics
// ---------------------------------------------------------------------------

/// KPIs of one store within one aggregation window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreMetrics {
    pub store_name: String,
    pub total_revenue: f64,
    pub total_quantity: u64,
    pub average_ticket: AverageTicket,
}

impl StoreMetrics {
    pub fn new(store_name: impl Into<String>, total_revenue: f64, total_quantity: u64) -> Self {
        Self {
            store_name: store_name.into(),
            total_revenue,
            total_quantity,
            average_ticket: AverageTicket::from_totals(total_revenue, total_quantity),
        }
    }
}

/// Aggregation window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum MetricsWindow {
    /// Every transaction regardless of date
    AllTime,
    /// Only transactions dated on the latest date of the dataset
    LatestDay { date: NaiveDate },
}

impl fmt::Display for MetricsWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricsWindow::AllTime => f.write_str("all-time"),
            MetricsWindow::LatestDay { date } => write!(f, "latest-day {}", date),
        }
    }
}

/// Per-store metrics for one window, keyed by store name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreMetricsTable {
    pub window: MetricsWindow,
    pub metrics: BTreeMap<String, StoreMetrics>,
}

impl StoreMetricsTable {
    pub fn get(&self, store_name: &str) -> Option<&StoreMetrics> {
        self.metrics.get(store_name)
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StoreMetrics> {
        self.metrics.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_ticket_zero_quantity_is_undefined() {
        assert_eq!(AverageTicket::from_totals(150.0, 0), AverageTicket::Undefined);
        assert_eq!(AverageTicket::from_totals(0.0, 0), AverageTicket::Undefined);
        assert_eq!(AverageTicket::from_totals(150.0, 3), AverageTicket::Value(50.0));
    }

    #[test]
    fn test_average_ticket_serializes_as_number_or_null() {
        let defined = StoreMetrics::new("Alpha", 150.0, 3);
        let json = serde_json::to_value(&defined).unwrap();
        assert_eq!(json["average_ticket"], serde_json::json!(50.0));

        let undefined = StoreMetrics::new("Beta", 0.0, 0);
        let json = serde_json::to_value(&undefined).unwrap();
        assert!(json["average_ticket"].is_null());

        let back: StoreMetrics = serde_json::from_value(json).unwrap();
        assert!(back.average_ticket.is_undefined());
    }

    #[test]
    fn test_window_display() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(MetricsWindow::AllTime.to_string(), "all-time");
        assert_eq!(
            MetricsWindow::LatestDay { date }.to_string(),
            "latest-day 2024-12-31"
        );
    }
}
