use anyhow::{Context, Result};
use contracts::dashboards::d400_store_kpi::MetricsWindow;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::dashboards::d401_store_ranking::StoreRanking;

/// One CSV row of a ranking artifact
#[derive(Debug, Serialize)]
struct RankingRow<'a> {
    rank: usize,
    store_name: &'a str,
    total_revenue: f64,
    total_quantity: u64,
    /// Empty cell when undefined
    average_ticket: Option<f64>,
}

/// A ranking written to disk.
#[derive(Debug, Clone)]
pub struct ExportedRanking {
    pub window: MetricsWindow,
    pub path: PathBuf,
    pub filename: String,
    pub content: Vec<u8>,
}

pub fn file_name(window: MetricsWindow) -> &'static str {
    match window {
        MetricsWindow::AllTime => "ranking_all_time.csv",
        MetricsWindow::LatestDay { .. } => "ranking_latest_day.csv",
    }
}

/// Serialize a ranking as CSV, best store first.
pub fn ranking_csv(ranking: &StoreRanking) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for entry in ranking.entries() {
        writer.serialize(RankingRow {
            rank: entry.rank,
            store_name: entry.store_name(),
            total_revenue: entry.metrics.total_revenue,
            total_quantity: entry.metrics.total_quantity,
            average_ticket: entry.metrics.average_ticket.value(),
        })?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush ranking CSV: {}", e))
}

/// Write `ranking` into `dir` (created if missing).
pub fn export_ranking(ranking: &StoreRanking, dir: &Path) -> Result<ExportedRanking> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Cannot create output directory {}", dir.display()))?;

    let filename = file_name(ranking.window()).to_string();
    let path = dir.join(&filename);
    let content = ranking_csv(ranking)?;
    std::fs::write(&path, &content)
        .with_context(|| format!("Cannot write {}", path.display()))?;

    tracing::info!(
        "{} ranking ({} stores) written to {}",
        ranking.window(),
        ranking.len(),
        path.display()
    );

    Ok(ExportedRanking {
        window: ranking.window(),
        path,
        filename,
        content,
    })
}
