//! GameLens batch runner
//!
//! Processes a review collection end to end and writes the statistics
//! report. The report is written even when documents fail along the way.

use anyhow::Result;
use clap::Parser;
use gamelens_batch::{init_metrics, write_metrics, BatchConfig, BatchDriver, Cli};
use gamelens_telemetry::{write_json, write_report};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Configuration problems abort before any document is touched
    let config = BatchConfig::load(&cli)?;
    info!(
        store = ?config.store_path,
        lexicon = ?config.lexicon_path,
        report = %config.report_path.display(),
        "Configuration loaded"
    );

    let metrics_handle = init_metrics()?;

    let driver = BatchDriver::from_config(&config)?;
    let summary = driver.run().await;

    if !summary.is_clean() {
        warn!(
            failed = summary.failed,
            fetch_error = summary.fetch_error,
            flush_error = summary.flush_error,
            "Run finished with errors, see log for affected documents"
        );
    }

    write_report(&config.report_path, &summary.statistics)?;
    if let Some(path) = &config.stats_json_path {
        write_json(path, &summary.statistics)?;
    }
    write_metrics(&config.metrics_path, &metrics_handle)?;

    println!(
        "Processed {} reviews ({} written, {} unchanged, {} failed) in {} page(s)",
        summary.seen,
        summary.persisted - summary.unchanged,
        summary.unchanged,
        summary.failed,
        summary.pages
    );
    println!("Report: {}", config.report_path.display());

    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("gamelens=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gamelens=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
