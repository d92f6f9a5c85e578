use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::a001_sales_transaction::TransactionRecord;

/// Transaction line enriched with its store name and manager contact.
///
/// Derived from the three base relations on every run, never stored on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedRecord {
    #[serde(flatten)]
    pub transaction: TransactionRecord,
    pub store_name: String,
    pub manager_name: String,
    pub manager_email: String,
}

impl JoinedRecord {
    pub fn date(&self) -> NaiveDate {
        self.transaction.date
    }

    pub fn quantity(&self) -> u64 {
        self.transaction.quantity
    }

    pub fn final_value(&self) -> f64 {
        self.transaction.final_value
    }
}

/// Row counts per join stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinStats {
    pub input_rows: usize,
    /// Dropped before lookup: the transaction itself failed validation
    pub invalid_rows: usize,
    /// Dropped at stage 1: store_id missing from the store directory
    pub unknown_store_rows: usize,
    /// Dropped at stage 2: store_name missing from the manager contacts
    pub missing_manager_rows: usize,
    pub joined_rows: usize,
}

impl JoinStats {
    pub fn excluded_rows(&self) -> usize {
        self.invalid_rows + self.unknown_store_rows + self.missing_manager_rows
    }
}
