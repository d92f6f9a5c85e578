use contracts::dashboards::d400_store_kpi::{MetricsWindow, StoreMetrics, StoreMetricsTable};
use contracts::dashboards::d401_store_ranking::RankingEntry;
use std::cmp::Ordering;

use crate::shared::error::KpiError;

/// Stores of one window ordered by revenue, best first.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreRanking {
    window: MetricsWindow,
    entries: Vec<RankingEntry>,
}

impl StoreRanking {
    pub fn window(&self) -> MetricsWindow {
        self.window
    }

    pub fn entries(&self) -> &[RankingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rank 1
    pub fn best(&self) -> Result<&RankingEntry, KpiError> {
        self.entries
            .first()
            .ok_or(KpiError::EmptyInput { window: self.window })
    }

    /// Highest rank number
    pub fn worst(&self) -> Result<&RankingEntry, KpiError> {
        self.entries
            .last()
            .ok_or(KpiError::EmptyInput { window: self.window })
    }
}

/// Revenue descending, then store name ascending by code point.
fn ranking_order(a: &StoreMetrics, b: &StoreMetrics) -> Ordering {
    b.total_revenue
        .total_cmp(&a.total_revenue)
        .then_with(|| a.store_name.cmp(&b.store_name))
}

/// Rank the stores of `table`. Ties in revenue still get distinct positions.
pub fn rank(table: &StoreMetricsTable) -> Result<StoreRanking, KpiError> {
    if table.is_empty() {
        return Err(KpiError::EmptyInput {
            window: table.window,
        });
    }

    let mut sorted: Vec<StoreMetrics> = table.iter().cloned().collect();
    sorted.sort_by(ranking_order);

    let entries = sorted
        .into_iter()
        .enumerate()
        .map(|(i, metrics)| RankingEntry { rank: i + 1, metrics })
        .collect();

    Ok(StoreRanking {
        window: table.window,
        entries,
    })
}
