use serde::{Deserialize, Serialize};

use crate::domain::a001_sales_transaction::StoreId;

/// Store directory row: maps a store id to its display name ("Loja").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreDirectoryEntry {
    pub store_id: StoreId,
    pub store_name: String,
}

impl StoreDirectoryEntry {
    pub fn new(store_id: StoreId, store_name: impl Into<String>) -> Self {
        Self {
            store_id,
            store_name: store_name.into(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.store_id.0.trim().is_empty() {
            return Err("store_id must not be empty".into());
        }
        if self.store_name.trim().is_empty() {
            return Err(format!("store {} has an empty name", self.store_id));
        }
        Ok(())
    }
}
