use std::path::PathBuf;

use backend::shared::config::load_config;
use backend::usecases::u500_sales_report::execute;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Optional path to config.toml as the first argument
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = load_config(config_path.as_deref())?;

    backend::system::tracing::initialize(&config.logging.dir)?;
    tracing::info!("Sales report started");

    let summary = execute(&config).await?;

    for row in &summary.rejected_rows {
        tracing::warn!("Skipped input: {}", row);
    }
    for record in summary.deliveries.failed() {
        tracing::warn!(
            "Not delivered: {} ({})",
            record.recipient_email,
            record.store_name.as_deref().unwrap_or("executive report")
        );
    }
    tracing::info!(
        "Sales report {} done: latest day {}, {} file(s) exported",
        summary.run_id,
        summary.latest_date,
        summary.exported.len()
    );

    Ok(())
}
