//! Corpus aggregator: records processed reviews into a run's statistics

use crate::statistics::CorpusStatistics;
use gamelens_core::{AspectSentiments, Review};
use parking_lot::RwLock;
use tracing::trace;

/// Owns the statistics of one batch run.
///
/// `record` applies a whole review under the write lock, so `snapshot`
/// never observes a partially counted review.
#[derive(Debug, Default)]
pub struct CorpusAggregator {
    inner: RwLock<CorpusStatistics>,
}

impl CorpusAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a review whose result has already been persisted
    pub fn record(&self, review: &Review, results: &AspectSentiments) {
        self.inner.write().record(review, results);

        metrics::counter!("gamelens_reviews_recorded_total").increment(1);
        for aspect in results.keys() {
            metrics::counter!("gamelens_aspect_mentions_total", "aspect" => aspect.clone())
                .increment(1);
        }
        trace!(review = %review.id, aspects = results.len(), "Review recorded");
    }

    /// Fold a partial accumulator (e.g. from another worker) into this run
    pub fn absorb(&self, partial: &CorpusStatistics) {
        self.inner.write().merge(partial);
    }

    /// Point-in-time copy of the statistics
    pub fn snapshot(&self) -> CorpusStatistics {
        self.inner.read().clone()
    }

    pub fn total_reviews(&self) -> u64 {
        self.inner.read().total_reviews
    }

    /// End the run and hand over the final statistics
    pub fn into_statistics(self) -> CorpusStatistics {
        self.inner.into_inner()
    }
}
