use contracts::domain::a003_store_manager::ManagerContact;
use contracts::projections::p900_joined_sales::{JoinStats, JoinedRecord};
use std::collections::HashMap;

use crate::domain::RecordStore;
use crate::shared::error::JoinIntegrityError;

/// Result of joining transactions with the store directory and manager contacts.
#[derive(Debug, Clone)]
pub struct JoinOutcome {
    /// Joined rows, in input transaction order
    pub records: Vec<JoinedRecord>,
    pub stats: JoinStats,
    /// One entry per excluded transaction
    pub issues: Vec<JoinIntegrityError>,
    /// store_name -> manager contact, for stores that appear in `records`
    pub contacts: HashMap<String, ManagerContact>,
}

impl JoinOutcome {
    /// Warning text when more rows were excluded than `tolerance` allows.
    pub fn tolerance_warning(&self, tolerance: usize) -> Option<String> {
        let excluded = self.stats.excluded_rows();
        if excluded <= tolerance {
            return None;
        }
        Some(format!(
            "{} of {} transactions excluded by the join (tolerance {}): \
             {} invalid, {} unknown store id, {} without manager contact",
            excluded,
            self.stats.input_rows,
            tolerance,
            self.stats.invalid_rows,
            self.stats.unknown_store_rows,
            self.stats.missing_manager_rows,
        ))
    }
}

/// Inner-join transactions -> store directory (on store_id) -> manager contacts
/// (on store_name).
///
/// Invalid transactions and rows that fail either lookup are left out and
/// recorded in `issues`.
/// Store names are compared exactly.
pub fn join_records(store: &RecordStore) -> JoinOutcome {
    let store_names: HashMap<&str, &str> = store
        .stores()
        .iter()
        .map(|s| (s.store_id.as_str(), s.store_name.as_str()))
        .collect();

    let managers: HashMap<&str, &ManagerContact> = store
        .managers()
        .iter()
        .map(|m| (m.store_name.as_str(), m))
        .collect();

    let mut stats = JoinStats {
        input_rows: store.transactions().len(),
        ..JoinStats::default()
    };
    let mut records = Vec::with_capacity(stats.input_rows);
    let mut issues = Vec::new();
    let mut contacts: HashMap<String, ManagerContact> = HashMap::new();

    for (i, tx) in store.transactions().iter().enumerate() {
        let row = i + 1;

        if let Err(reason) = tx.validate() {
            stats.invalid_rows += 1;
            issues.push(JoinIntegrityError::InvalidTransaction { row, reason });
            continue;
        }

        let Some(store_name) = store_names.get(tx.store_id.as_str()) else {
            stats.unknown_store_rows += 1;
            issues.push(JoinIntegrityError::UnknownStoreId {
                row,
                store_id: tx.store_id.clone(),
            });
            continue;
        };

        let Some(contact) = managers.get(store_name) else {
            stats.missing_manager_rows += 1;
            issues.push(JoinIntegrityError::MissingManagerContact {
                row,
                store_name: store_name.to_string(),
            });
            continue;
        };

        if !contacts.contains_key(*store_name) {
            contacts.insert(store_name.to_string(), (*contact).clone());
        }

        records.push(JoinedRecord {
            transaction: tx.clone(),
            store_name: store_name.to_string(),
            manager_name: contact.manager_name.clone(),
            manager_email: contact.manager_email.clone(),
        });
    }

    stats.joined_rows = records.len();

    tracing::info!(
        "Join: {} transactions in, {} dropped (invalid), {} dropped (unknown store id), \
         {} dropped (no manager contact), {} joined",
        stats.input_rows,
        stats.invalid_rows,
        stats.unknown_store_rows,
        stats.missing_manager_rows,
        stats.joined_rows
    );
    for issue in &issues {
        tracing::debug!("Join exclusion: {}", issue);
    }

    JoinOutcome {
        records,
        stats,
        issues,
        contacts,
    }
}
