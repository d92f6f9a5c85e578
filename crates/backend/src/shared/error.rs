use contracts::dashboards::d400_store_kpi::MetricsWindow;
use contracts::domain::a001_sales_transaction::StoreId;
use thiserror::Error;

/// Errors of the aggregation and ranking core
#[derive(Debug, Error)]
pub enum KpiError {
    #[error("store id {0} appears more than once in the store directory")]
    DuplicateStoreId(StoreId),

    #[error("store {0:?} has more than one manager contact")]
    DuplicateManagerContact(String),

    #[error("no store metrics to rank for the {window} window")]
    EmptyInput { window: MetricsWindow },
}

/// A store directory or manager contact row left out of the record store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{relation} row {row} skipped: {reason}")]
pub struct RejectedRow {
    pub relation: &'static str,
    pub row: usize,
    pub reason: String,
}

/// A transaction excluded by the join. Counted and reported, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinIntegrityError {
    #[error("transaction row {row} is invalid: {reason}")]
    InvalidTransaction { row: usize, reason: String },

    #[error("transaction row {row}: store id {store_id} is not in the store directory")]
    UnknownStoreId { row: usize, store_id: StoreId },

    #[error("transaction row {row}: store {store_name:?} has no manager contact")]
    MissingManagerContact { row: usize, store_name: String },
}

impl JoinIntegrityError {
    pub fn row(&self) -> usize {
        match self {
            JoinIntegrityError::InvalidTransaction { row, .. } => *row,
            JoinIntegrityError::UnknownStoreId { row, .. } => *row,
            JoinIntegrityError::MissingManagerContact { row, .. } => *row,
        }
    }
}
