use serde::{Deserialize, Serialize};

use crate::dashboards::d400_store_kpi::StoreMetrics;

/// Store metrics with their 1-based position in a ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub rank: usize,
    #[serde(flatten)]
    pub metrics: StoreMetrics,
}

impl RankingEntry {
    pub fn store_name(&self) -> &str {
        &self.metrics.store_name
    }

    pub fn total_revenue(&self) -> f64 {
        self.metrics.total_revenue
    }
}
