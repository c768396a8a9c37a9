//! Run metrics
//!
//! Counters are emitted through the `metrics` facade from every crate. The
//! binary installs a Prometheus recorder before the run and dumps the
//! rendered text next to the report once the run is over.

use gamelens_core::{Error, Result};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Install the global Prometheus recorder and describe the run metrics
pub fn init_metrics() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| Error::config(format!("Failed to install metrics recorder: {e}")))?;

    describe_metrics();
    info!("Metrics recorder installed");
    Ok(handle)
}

/// Register descriptions for every metric the run emits
pub fn describe_metrics() {
    metrics::describe_counter!("gamelens_pages_fetched_total", "Non-empty pages read from the store");
    metrics::describe_counter!(
        "gamelens_reviews_processed_total",
        "Reviews taken through detection and scoring"
    );
    metrics::describe_counter!(
        "gamelens_persist_failures_total",
        "Reviews whose result could not be written back"
    );
    metrics::describe_counter!(
        "gamelens_classifier_failures_total",
        "Sentences whose classification failed and counted as zero"
    );
    metrics::describe_histogram!(
        "gamelens_classifier_latency_us",
        metrics::Unit::Microseconds,
        "Sentence classification latency in microseconds"
    );
    metrics::describe_counter!(
        "gamelens_reviews_recorded_total",
        "Reviews counted into the corpus statistics"
    );
    metrics::describe_counter!(
        "gamelens_aspect_mentions_total",
        "Recorded aspect mentions by aspect"
    );
}

/// Write the Prometheus text rendering of `handle` to `path`
pub fn write_metrics(path: &Path, handle: &PrometheusHandle) -> Result<()> {
    let mut file = File::create(path)?;
    write!(file, "{}", handle.render())?;
    file.flush()?;

    info!(path = %path.display(), "Metrics written");
    Ok(())
}
