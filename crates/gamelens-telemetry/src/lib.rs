//! GameLens Telemetry
//!
//! Corpus statistics and reporting for GameLens batch runs.
//!
//! Provides:
//! - [`CorpusStatistics`], the explicit per-run accumulator
//! - [`CorpusAggregator`], which records processed reviews and hands out
//!   consistent snapshots
//! - Plain-text and JSON report rendering

pub mod aggregator;
pub mod report;
pub mod statistics;

pub use aggregator::CorpusAggregator;
pub use report::{render_report, write_json, write_report};
pub use statistics::{AspectCounts, CorpusStatistics, OverallCounts};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::aggregator::CorpusAggregator;
    pub use crate::statistics::CorpusStatistics;
}
