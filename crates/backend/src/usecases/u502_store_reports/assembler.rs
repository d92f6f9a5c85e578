use chrono::NaiveDate;
use contracts::dashboards::d400_store_kpi::StoreMetricsTable;
use contracts::domain::a003_store_manager::ManagerContact;
use contracts::usecases::u502_store_reports::{
    ExecutiveReportPayload, ReportRecipient, StoreReportPayload,
};
use std::collections::HashMap;

use crate::dashboards::d401_store_ranking::StoreRanking;
use crate::shared::error::KpiError;
use crate::shared::format::format_date;

/// One payload per store of the all-time table, addressed to its manager.
///
/// `contacts` is the store_name -> contact map built by the join, so every
/// store in the table has an entry; a store without one is skipped with a
/// warning.
pub fn build_store_reports(
    all_time: &StoreMetricsTable,
    contacts: &HashMap<String, ManagerContact>,
) -> Vec<StoreReportPayload> {
    all_time
        .iter()
        .filter_map(|metrics| {
            let Some(contact) = contacts.get(&metrics.store_name) else {
                tracing::warn!(
                    "No manager contact for store {}, report skipped",
                    metrics.store_name
                );
                return None;
            };
            Some(StoreReportPayload {
                subject: format!("OnePage Anual - Loja {}", metrics.store_name),
                recipient_email: contact.manager_email.clone(),
                recipient_name: contact.manager_name.clone(),
                store_name: metrics.store_name.clone(),
                total_revenue: metrics.total_revenue,
                total_quantity: metrics.total_quantity,
                average_ticket: metrics.average_ticket,
            })
        })
        .collect()
}

/// Board summary: best and worst stores of the all-time ranking, labelled
/// with the latest sales date whose ranking is sent alongside.
pub fn build_executive_report(
    all_time: &StoreRanking,
    latest_day: &StoreRanking,
    latest_date: NaiveDate,
    recipient: &ReportRecipient,
) -> Result<ExecutiveReportPayload, KpiError> {
    let best = all_time.best()?;
    let worst = all_time.worst()?;
    let latest_best = latest_day.best()?;

    Ok(ExecutiveReportPayload {
        subject: format!("Ranking Anual e do Dia {}", format_date(latest_date)),
        recipient_email: recipient.email.clone(),
        recipient_name: recipient.name.clone(),
        best_store: best.store_name().to_string(),
        best_revenue: best.total_revenue(),
        worst_store: worst.store_name().to_string(),
        worst_revenue: worst.total_revenue(),
        latest_date,
        latest_day_best_store: latest_best.store_name().to_string(),
        latest_day_best_revenue: latest_best.total_revenue(),
    })
}
