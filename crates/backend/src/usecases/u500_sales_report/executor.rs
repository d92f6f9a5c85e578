use anyhow::{Context, Result};
use chrono::NaiveDate;
use contracts::dashboards::d400_store_kpi::{MetricsWindow, StoreMetricsTable};
use contracts::projections::p900_joined_sales::JoinStats;
use contracts::usecases::u502_store_reports::ReportRecipient;
use contracts::usecases::u503_deliver_reports::DeliverySummary;
use std::path::PathBuf;
use tracing::Instrument;
use uuid::Uuid;

use crate::dashboards::d400_store_kpi::{aggregate, aggregate_all_time, latest_date};
use crate::dashboards::d401_store_ranking::{rank, StoreRanking};
use crate::domain::RecordStore;
use crate::projections::p900_joined_sales::{join_records, JoinOutcome};
use crate::shared::config::Config;
use crate::shared::error::{KpiError, RejectedRow};
use crate::usecases::u501_import_sales::import_all;
use crate::usecases::u502_store_reports::{build_executive_report, build_store_reports};
use crate::usecases::u503_deliver_reports::templates::{
    executive_report_message, store_report_message,
};
use crate::usecases::u503_deliver_reports::{
    create_mail_client, deliver_all, Attachment, OutgoingReport,
};
use crate::usecases::u504_export_rankings::export_ranking;

/// Everything the core computes in one run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub join: JoinOutcome,
    /// Set when the join excluded more rows than tolerated
    pub join_warning: Option<String>,
    pub latest_date: NaiveDate,
    pub all_time: StoreMetricsTable,
    pub latest_day: StoreMetricsTable,
    pub all_time_ranking: StoreRanking,
    pub latest_day_ranking: StoreRanking,
}

/// Join, aggregate and rank. Synchronous and free of I/O.
///
/// Invalid transactions and join exclusions only produce a warning; the run
/// fails only when nothing is left to rank.
pub fn run_pipeline(
    store: &RecordStore,
    orphan_tolerance: usize,
) -> Result<PipelineOutput, KpiError> {
    let join = join_records(store);
    let join_warning = join.tolerance_warning(orphan_tolerance);
    if let Some(warning) = &join_warning {
        tracing::warn!("{}", warning);
    }

    let all_time = aggregate_all_time(&join.records);
    let all_time_ranking = rank(&all_time)?;

    let Some(date) = latest_date(&join.records) else {
        return Err(KpiError::EmptyInput {
            window: MetricsWindow::AllTime,
        });
    };
    let latest_day = aggregate(&join.records, MetricsWindow::LatestDay { date });
    let latest_day_ranking = rank(&latest_day)?;

    Ok(PipelineOutput {
        join,
        join_warning,
        latest_date: date,
        all_time,
        latest_day,
        all_time_ranking,
        latest_day_ranking,
    })
}

/// Outcome of a full run, for the caller to report on.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub join_stats: JoinStats,
    pub join_warning: Option<String>,
    /// Directory and contact rows skipped on load
    pub rejected_rows: Vec<RejectedRow>,
    pub latest_date: NaiveDate,
    pub exported: Vec<PathBuf>,
    pub deliveries: DeliverySummary,
}

/// Import, compute, export rankings and send every report.
pub async fn execute(config: &Config) -> Result<RunSummary> {
    let run_id = Uuid::new_v4();
    let span = tracing::info_span!("sales_report", %run_id);
    execute_run(config, run_id).instrument(span).await
}

async fn execute_run(config: &Config, run_id: Uuid) -> Result<RunSummary> {
    tracing::info!("Phase 1: importing and joining input data");
    let relations = import_all(&config.data).context("Failed to import input files")?;
    let store = RecordStore::new(relations.transactions, relations.stores, relations.managers)
        .context("Input relations have duplicate keys")?;

    tracing::info!("Phase 2: computing store indicators");
    let output = run_pipeline(&store, config.join.orphan_tolerance)?;

    let exported = vec![
        export_ranking(&output.all_time_ranking, &config.output.dir)?,
        export_ranking(&output.latest_day_ranking, &config.output.dir)?,
    ];

    let client = create_mail_client(&config.mail)?;

    tracing::info!("Phase 3: sending store reports to managers");
    let store_reports = build_store_reports(&output.all_time, &output.join.contacts)
        .iter()
        .map(|payload| OutgoingReport {
            store_name: Some(payload.store_name.clone()),
            message: store_report_message(payload, &config.mail.currency),
        })
        .collect();
    let mut deliveries = deliver_all(client.as_ref(), store_reports).await;

    tracing::info!("Phase 4: sending executive report");
    let recipient = ReportRecipient::new(&config.mail.executive_name, &config.mail.executive_email);
    let executive = build_executive_report(
        &output.all_time_ranking,
        &output.latest_day_ranking,
        output.latest_date,
        &recipient,
    )?;
    let attachments = exported
        .iter()
        .map(|e| Attachment {
            filename: e.filename.clone(),
            content_type: "text/csv".into(),
            content: e.content.clone(),
        })
        .collect();
    let executive_report = OutgoingReport {
        store_name: None,
        message: executive_report_message(&executive, &config.mail.currency, attachments),
    };
    deliveries.extend(deliver_all(client.as_ref(), vec![executive_report]).await);

    let failed = deliveries.failed().count();
    if failed > 0 {
        tracing::warn!(
            "Run finished: {} report(s) delivered, {} failed",
            deliveries.delivered(),
            failed
        );
    } else {
        tracing::info!("Run finished: {} report(s) delivered", deliveries.delivered());
    }

    Ok(RunSummary {
        run_id,
        join_stats: output.join.stats,
        join_warning: output.join_warning,
        rejected_rows: store.rejected().to_vec(),
        latest_date: output.latest_date,
        exported: exported.into_iter().map(|e| e.path).collect(),
        deliveries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::dashboards::d400_store_kpi::AverageTicket;
    use contracts::domain::a001_sales_transaction::{StoreId, TransactionRecord};
    use contracts::domain::a002_store::StoreDirectoryEntry;
    use contracts::domain::a003_store_manager::ManagerContact;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn tx(store: &str, qty: u64, value: f64, d: u32) -> TransactionRecord {
        TransactionRecord::new(StoreId::new(store), qty, value, day(d))
    }

    fn record_store(transactions: Vec<TransactionRecord>) -> RecordStore {
        RecordStore::new(
            transactions,
            vec![
                StoreDirectoryEntry::new(StoreId::new("S1"), "Alpha"),
                StoreDirectoryEntry::new(StoreId::new("S2"), "Beta"),
            ],
            vec![
                ManagerContact::new("Alpha", "Ana", "ana@example.com"),
                ManagerContact::new("Beta", "Bruno", "bruno@example.com"),
            ],
        )
        .unwrap()
    }

    fn ranked_names(ranking: &StoreRanking) -> Vec<(usize, &str)> {
        ranking.entries().iter().map(|e| (e.rank, e.store_name())).collect()
    }

    #[test]
    fn test_end_to_end_example() {
        let store = record_store(vec![
            tx("S1", 2, 100.0, 1),
            tx("S1", 1, 50.0, 2),
            tx("S2", 3, 300.0, 2),
        ]);

        let output = run_pipeline(&store, 0).unwrap();

        assert!(output.join_warning.is_none());
        assert_eq!(output.join.records.len(), 3);

        let alpha = output.all_time.get("Alpha").unwrap();
        assert_eq!(alpha.total_revenue, 150.0);
        assert_eq!(alpha.total_quantity, 3);
        assert_eq!(alpha.average_ticket, AverageTicket::Value(50.0));
        let beta = output.all_time.get("Beta").unwrap();
        assert_eq!(beta.total_revenue, 300.0);
        assert_eq!(beta.total_quantity, 3);
        assert_eq!(beta.average_ticket, AverageTicket::Value(100.0));
        assert_eq!(ranked_names(&output.all_time_ranking), vec![(1, "Beta"), (2, "Alpha")]);

        assert_eq!(output.latest_date, day(2));
        assert_eq!(output.latest_day.window, MetricsWindow::LatestDay { date: day(2) });
        let alpha = output.latest_day.get("Alpha").unwrap();
        assert_eq!(alpha.total_revenue, 50.0);
        assert_eq!(alpha.total_quantity, 1);
        assert_eq!(alpha.average_ticket, AverageTicket::Value(50.0));
        let beta = output.latest_day.get("Beta").unwrap();
        assert_eq!(beta.total_revenue, 300.0);
        assert_eq!(beta.average_ticket, AverageTicket::Value(100.0));
        assert_eq!(ranked_names(&output.latest_day_ranking), vec![(1, "Beta"), (2, "Alpha")]);
    }

    #[test]
    fn test_exclusions_warn_but_do_not_abort() {
        let store = record_store(vec![tx("S1", 1, 10.0, 1), tx("S7", 1, 99.0, 1)]);

        let output = run_pipeline(&store, 0).unwrap();

        assert_eq!(output.join.stats.unknown_store_rows, 1);
        assert!(output.join_warning.is_some());
        assert_eq!(output.all_time.len(), 1);

        let tolerant = run_pipeline(&store, 1).unwrap();
        assert!(tolerant.join_warning.is_none());
    }

    #[test]
    fn test_invalid_transaction_does_not_abort() {
        let store = record_store(vec![tx("S1", 1, 10.0, 1), tx("S2", 1, f64::INFINITY, 1)]);

        let output = run_pipeline(&store, 0).unwrap();

        assert_eq!(output.join.stats.invalid_rows, 1);
        assert!(output.join_warning.is_some());
        assert_eq!(ranked_names(&output.all_time_ranking), vec![(1, "Alpha")]);
    }

    #[test]
    fn test_nothing_to_rank_is_a_hard_stop() {
        let store = record_store(vec![tx("S9", 1, 10.0, 1)]);

        let result = run_pipeline(&store, 0);

        assert!(matches!(
            result,
            Err(KpiError::EmptyInput {
                window: MetricsWindow::AllTime
            })
        ));
    }

    #[tokio::test]
    async fn test_execute_writes_rankings_and_outbox() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::write(
            root.join("sales.csv"),
            "Código Venda,Data,ID Loja,Produto,Quantidade,Valor Unitário,Valor Final\n\
             1,2024-01-01,S1,Casaco,2,50,100\n\
             2,2024-01-02,S1,Sunga,1,50,50\n\
             3,2024-01-02,S2,Sapato,3,100,300\n\
             4,2024-01-02,S9,Meia,1,5,5\n\
             5,2024-01-02,S1,Troca,1,-5,-5\n",
        )
        .unwrap();
        std::fs::write(root.join("stores.csv"), "ID Loja;Loja\nS1;Alpha\nS2;Beta\n").unwrap();
        std::fs::write(
            root.join("managers.csv"),
            "Loja,Gerente,E-mail\nAlpha,Ana,ana@example.com\nBeta,Bruno,bruno-at-example.com\n",
        )
        .unwrap();
        std::fs::write(
            root.join("config.toml"),
            r#"
[data]
transactions_path = "sales.csv"
stores_path = "stores.csv"
managers_path = "managers.csv"

[output]
dir = "reports"

[mail]
provider = "outbox"
from_email = "bot@example.com"
from_name = "Bot"
executive_email = "board@example.com"
executive_name = "Board"
outbox_dir = "outbox"
"#,
        )
        .unwrap();

        let config = crate::shared::config::load_config(Some(&root.join("config.toml"))).unwrap();

        let summary = execute(&config).await.unwrap();

        assert_eq!(summary.join_stats.unknown_store_rows, 1);
        assert_eq!(summary.join_stats.invalid_rows, 1);
        assert!(summary.join_warning.is_some());
        assert!(summary.rejected_rows.is_empty());
        assert_eq!(summary.latest_date, day(2));
        assert_eq!(
            summary.exported,
            vec![
                root.join("reports/ranking_all_time.csv"),
                root.join("reports/ranking_latest_day.csv"),
            ]
        );
        let all_time = std::fs::read_to_string(root.join("reports/ranking_all_time.csv")).unwrap();
        assert!(all_time.contains("1,Beta,300.0,3,100.0"));

        // Bruno's malformed address fails only his own report
        assert_eq!(summary.deliveries.records.len(), 3);
        assert_eq!(summary.deliveries.delivered(), 2);
        let failed: Vec<_> = summary.deliveries.failed().collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].store_name.as_deref(), Some("Beta"));
        assert_eq!(failed[0].recipient_email, "bruno-at-example.com");

        assert!(root.join("outbox/001-ana_example.com.json").exists());
        assert!(root.join("outbox/002-board_example.com.json").exists());
        assert!(root
            .join("outbox/002-board_example.com-ranking_latest_day.csv")
            .exists());
    }
}
