use chrono::NaiveDate;
use contracts::dashboards::d400_store_kpi::{MetricsWindow, StoreMetrics, StoreMetricsTable};
use contracts::projections::p900_joined_sales::JoinedRecord;
use std::collections::BTreeMap;

/// Running sums for one store. The ratio is taken only once both are final.
#[derive(Debug, Default)]
struct StoreTotals {
    revenue: f64,
    quantity: u64,
}

/// Latest transaction date over the whole joined sequence.
pub fn latest_date(records: &[JoinedRecord]) -> Option<NaiveDate> {
    records.iter().map(JoinedRecord::date).max()
}

/// Group `records` by store name and compute per-store metrics within `window`.
///
/// For `LatestDay` only rows dated exactly on the window date are counted; a
/// store without such rows does not appear in the table.
pub fn aggregate(records: &[JoinedRecord], window: MetricsWindow) -> StoreMetricsTable {
    let mut totals: BTreeMap<&str, StoreTotals> = BTreeMap::new();

    let in_window = |r: &&JoinedRecord| match window {
        MetricsWindow::AllTime => true,
        MetricsWindow::LatestDay { date } => r.date() == date,
    };

    for record in records.iter().filter(in_window) {
        let entry = totals.entry(record.store_name.as_str()).or_default();
        entry.revenue += record.final_value();
        entry.quantity += record.quantity();
    }

    let metrics: BTreeMap<String, StoreMetrics> = totals
        .into_iter()
        .map(|(name, t)| (name.to_string(), StoreMetrics::new(name, t.revenue, t.quantity)))
        .collect();

    let undefined = metrics
        .values()
        .filter(|m| m.average_ticket.is_undefined())
        .count();
    if undefined > 0 {
        tracing::warn!(
            "{} window: {} store(s) sold zero units, average ticket undefined",
            window,
            undefined
        );
    }

    tracing::info!("{} window: aggregated {} stores", window, metrics.len());

    StoreMetricsTable { window, metrics }
}

pub fn aggregate_all_time(records: &[JoinedRecord]) -> StoreMetricsTable {
    aggregate(records, MetricsWindow::AllTime)
}

/// Latest-day metrics; `None` only when there is no record at all to take a
/// maximum date from.
pub fn aggregate_latest_day(records: &[JoinedRecord]) -> Option<StoreMetricsTable> {
    let date = latest_date(records)?;
    Some(aggregate(records, MetricsWindow::LatestDay { date }))
}
