//! Batch driver
//!
//! Walks the document store page by page and takes every review through
//! detect, score, persist and record, one document at a time:
//!
//! ```text
//! Fetching -> Processing(doc) -> Persisting(doc) -> Processing(next) | Fetching
//! Fetching -> Done            (empty page or fetch error)
//! ```
//!
//! A review is recorded into the statistics only after its result has been
//! durably written back. The store is flushed once the run is done.
//! Writing the same result twice is harmless, so a crashed run can be
//! restarted from the first page.

use crate::config::BatchConfig;
use crate::store::{DocumentStore, JsonFileStore};
use chrono::{DateTime, Utc};
use gamelens_aspects::{AspectDetector, Classifier, LexiconSentimentClassifier, SentimentAttributor};
use gamelens_core::{AspectSentiments, Result, Review};
use gamelens_telemetry::{CorpusAggregator, CorpusStatistics};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Driver tuning
#[derive(Debug, Clone)]
pub struct DriverOptions {
    pub page_size: usize,
    pub result_field: String,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            page_size: 500,
            result_field: "aspect_sentiments".to_string(),
        }
    }
}

/// Outcome of a full batch run
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Non-empty pages fetched
    pub pages: usize,
    /// Documents taken through detection and scoring
    pub seen: u64,
    /// Documents whose result was written (modified or not)
    pub persisted: u64,
    /// Persisted documents whose stored result was already identical
    pub unchanged: u64,
    /// Documents whose write failed; these are not in `statistics`
    pub failed: u64,
    /// Whether a fetch error ended the run early
    pub fetch_error: bool,
    /// Whether the final store flush failed
    pub flush_error: bool,
    pub statistics: CorpusStatistics,
}

impl BatchSummary {
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && !self.fetch_error && !self.flush_error
    }
}

enum BatchState {
    Fetching,
    Processing(Review),
    Persisting(Review, AspectSentiments),
    Done,
}

pub struct BatchDriver {
    store: Arc<dyn DocumentStore>,
    detector: AspectDetector,
    attributor: SentimentAttributor,
    options: DriverOptions,
}

impl BatchDriver {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        detector: AspectDetector,
        attributor: SentimentAttributor,
    ) -> Self {
        Self {
            store,
            detector,
            attributor,
            options: DriverOptions::default(),
        }
    }

    pub fn with_options(mut self, options: DriverOptions) -> Self {
        self.options = options;
        self
    }

    /// Wire a driver from configuration: JSON file store, configured
    /// lexicon and the built-in sentence classifier.
    pub fn from_config(config: &BatchConfig) -> Result<Self> {
        config.validate()?;

        let lexicon = Arc::new(config.load_lexicon()?);
        info!(
            version = lexicon.version(),
            aspects = lexicon.len(),
            phrases = lexicon.phrase_count(),
            "Aspect lexicon loaded"
        );

        let classifier: Arc<dyn Classifier> = Arc::new(LexiconSentimentClassifier::from_config(
            "sentiment-lexicon",
            &config.sentiment,
        )?);

        let store_path = config.store_path.as_ref().ok_or_else(|| {
            gamelens_core::Error::config("No document store configured")
        })?;
        let store: Arc<dyn DocumentStore> = Arc::new(JsonFileStore::open(store_path)?);

        Ok(Self::new(
            store,
            AspectDetector::new(lexicon),
            SentimentAttributor::new(classifier),
        )
        .with_options(DriverOptions {
            page_size: config.page_size,
            result_field: config.result_field.clone(),
        }))
    }

    pub fn options(&self) -> &DriverOptions {
        &self.options
    }

    /// Run over the whole store.
    ///
    /// Never fails: per-document write errors and fetch errors are logged
    /// and reflected in the summary. Each call starts from fresh statistics.
    pub async fn run(&self) -> BatchSummary {
        let started_at = Utc::now();
        let aggregator = CorpusAggregator::new();

        info!(
            store = self.store.name(),
            classifier = self.attributor.classifier_name(),
            page_size = self.options.page_size,
            field = %self.options.result_field,
            "Starting batch run"
        );

        let mut queue: VecDeque<Review> = VecDeque::new();
        let mut skip = 0;
        let mut pages = 0;
        let mut seen = 0;
        let mut persisted = 0;
        let mut unchanged = 0;
        let mut failed = 0;
        let mut fetch_error = false;

        let mut state = BatchState::Fetching;
        loop {
            state = match state {
                BatchState::Fetching => {
                    match self.store.find(skip, self.options.page_size).await {
                        Ok(page) if page.is_empty() => BatchState::Done,
                        Ok(page) => {
                            pages += 1;
                            metrics::counter!("gamelens_pages_fetched_total").increment(1);
                            skip += page.len();
                            debug!(page = pages, documents = page.len(), "Fetched page");
                            queue.extend(page);
                            next_state(&mut queue)
                        }
                        Err(e) => {
                            error!(skip, error = %e, "Failed to fetch page, ending run");
                            fetch_error = true;
                            BatchState::Done
                        }
                    }
                }

                BatchState::Processing(review) => {
                    seen += 1;
                    let evidence = self.detector.extract(&review.text);
                    let results = self.attributor.score(&evidence).await;
                    metrics::counter!("gamelens_reviews_processed_total").increment(1);
                    debug!(review = %review.id, aspects = results.len(), "Review scored");
                    BatchState::Persisting(review, results)
                }

                BatchState::Persisting(review, results) => {
                    match self.persist(&review, &results).await {
                        Ok(modified) => {
                            persisted += 1;
                            if !modified {
                                unchanged += 1;
                            }
                            aggregator.record(&review, &results);
                        }
                        Err(e) => {
                            failed += 1;
                            metrics::counter!("gamelens_persist_failures_total").increment(1);
                            error!(review = %review.id, error = %e, "Failed to persist aspect sentiments");
                        }
                    }
                    next_state(&mut queue)
                }

                BatchState::Done => break,
            };
        }

        let flush_error = match self.store.flush().await {
            Ok(()) => false,
            Err(e) => {
                error!(error = %e, "Failed to flush store; written results remain journaled");
                true
            }
        };

        let summary = BatchSummary {
            started_at,
            finished_at: Utc::now(),
            pages,
            seen,
            persisted,
            unchanged,
            failed,
            fetch_error,
            flush_error,
            statistics: aggregator.into_statistics(),
        };

        info!(
            pages = summary.pages,
            seen = summary.seen,
            persisted = summary.persisted,
            unchanged = summary.unchanged,
            failed = summary.failed,
            fetch_error = summary.fetch_error,
            flush_error = summary.flush_error,
            "Batch run finished"
        );
        summary
    }

    /// Write the result back as a full overwrite of the result field
    async fn persist(&self, review: &Review, results: &AspectSentiments) -> Result<bool> {
        let value = serde_json::to_value(results)?;
        let outcome = self
            .store
            .update_field(&review.id, &self.options.result_field, value)
            .await?;
        Ok(outcome.modified)
    }
}

fn next_state(queue: &mut VecDeque<Review>) -> BatchState {
    match queue.pop_front() {
        Some(review) => BatchState::Processing(review),
        None => BatchState::Fetching,
    }
}
