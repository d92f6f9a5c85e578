use contracts::domain::a001_sales_transaction::TransactionRecord;
use contracts::domain::a002_store::StoreDirectoryEntry;
use contracts::domain::a003_store_manager::ManagerContact;
use std::collections::HashSet;

use crate::shared::error::{KpiError, RejectedRow};

/// The three input relations, read-only for the rest of the run.
#[derive(Debug, Clone)]
pub struct RecordStore {
    transactions: Vec<TransactionRecord>,
    stores: Vec<StoreDirectoryEntry>,
    managers: Vec<ManagerContact>,
    rejected: Vec<RejectedRow>,
}

impl RecordStore {
    /// Build the store from the imported relations.
    ///
    /// Invalid directory and contact rows are skipped and kept in `rejected()`;
    /// a duplicate key among the remaining rows is an error. Transactions are
    /// kept as given and checked row by row in the join.
    ///
    /// Row numbers are 1-based positions within their relation.
    pub fn new(
        transactions: Vec<TransactionRecord>,
        stores: Vec<StoreDirectoryEntry>,
        managers: Vec<ManagerContact>,
    ) -> Result<Self, KpiError> {
        let mut rejected = Vec::new();

        let stores = keep_valid(
            stores,
            "store directory",
            &mut rejected,
            StoreDirectoryEntry::validate,
        );
        let mut store_ids = HashSet::with_capacity(stores.len());
        for store in &stores {
            if !store_ids.insert(&store.store_id) {
                return Err(KpiError::DuplicateStoreId(store.store_id.clone()));
            }
        }

        let managers = keep_valid(
            managers,
            "manager contacts",
            &mut rejected,
            ManagerContact::validate,
        );
        let mut store_names = HashSet::with_capacity(managers.len());
        for contact in &managers {
            if !store_names.insert(contact.store_name.as_str()) {
                return Err(KpiError::DuplicateManagerContact(contact.store_name.clone()));
            }
        }

        for row in &rejected {
            tracing::warn!("{}", row);
        }

        Ok(Self {
            transactions,
            stores,
            managers,
            rejected,
        })
    }

    pub fn transactions(&self) -> &[TransactionRecord] {
        &self.transactions
    }

    pub fn stores(&self) -> &[StoreDirectoryEntry] {
        &self.stores
    }

    pub fn managers(&self) -> &[ManagerContact] {
        &self.managers
    }

    pub fn rejected(&self) -> &[RejectedRow] {
        &self.rejected
    }
}

fn keep_valid<T>(
    rows: Vec<T>,
    relation: &'static str,
    rejected: &mut Vec<RejectedRow>,
    validate: impl Fn(&T) -> Result<(), String>,
) -> Vec<T> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(i, row)| match validate(&row) {
            Ok(()) => Some(row),
            Err(reason) => {
                rejected.push(RejectedRow {
                    relation,
                    row: i + 1,
                    reason,
                });
                None
            }
        })
        .collect()
}
