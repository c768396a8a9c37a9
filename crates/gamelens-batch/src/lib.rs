//! GameLens Batch
//!
//! Runs the aspect sentiment engine over a whole review collection:
//! pages through a [`DocumentStore`], writes each review's aspect
//! sentiments back to its document and accumulates corpus statistics for
//! the final report.

pub mod cli;
pub mod config;
pub mod driver;
pub mod exporter;
pub mod store;

pub use cli::Cli;
pub use config::BatchConfig;
pub use driver::{BatchDriver, BatchSummary, DriverOptions};
pub use exporter::{init_metrics, write_metrics};
pub use store::{DocumentStore, JsonFileStore, MemoryStore, UpdateOutcome};
