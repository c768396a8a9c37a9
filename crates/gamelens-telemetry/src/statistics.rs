//! Corpus statistics for a single batch run

use gamelens_core::{AspectSentiments, Review, Sentiment};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Positive/negative tallies for one aspect
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectCounts {
    pub positive: u64,
    pub negative: u64,
    pub total: u64,
}

impl AspectCounts {
    pub fn add(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Negative => self.negative += 1,
        }
        self.total += 1;
    }

    /// Share of positive mentions, 0.0 when there are none
    pub fn positive_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.positive as f64 / self.total as f64
        }
    }

    /// Corpus-level label: POSITIVE when more than half the mentions are positive
    pub fn label(&self) -> Sentiment {
        if self.positive_ratio() > 0.5 {
            Sentiment::Positive
        } else {
            Sentiment::Negative
        }
    }

    fn merge(&mut self, other: &Self) {
        self.positive += other.positive;
        self.negative += other.negative;
        self.total += other.total;
    }
}

/// Whole-review sentiment tallies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverallCounts {
    pub positive: u64,
    pub negative: u64,
}

/// Accumulated statistics. Construct one per run; it is never global.
///
/// For every aspect `a` present,
/// `aspect_sentiment_counts[a].total == positive + negative == aspect_mention_counts[a]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusStatistics {
    pub total_reviews: u64,
    pub platform_counts: BTreeMap<String, u64>,
    pub aspect_mention_counts: BTreeMap<String, u64>,
    pub aspect_sentiment_counts: BTreeMap<String, AspectCounts>,
    pub overall_sentiment_counts: OverallCounts,
}

impl CorpusStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one processed review.
    ///
    /// The review is overall POSITIVE if any of its aspects is POSITIVE;
    /// a review without aspects counts as NEGATIVE.
    pub fn record(&mut self, review: &Review, results: &AspectSentiments) {
        self.total_reviews += 1;
        *self
            .platform_counts
            .entry(review.platform_or_unknown().to_string())
            .or_insert(0) += 1;

        for (aspect, sentiment) in results {
            *self.aspect_mention_counts.entry(aspect.clone()).or_insert(0) += 1;
            self.aspect_sentiment_counts
                .entry(aspect.clone())
                .or_default()
                .add(*sentiment);
        }

        if results.values().any(Sentiment::is_positive) {
            self.overall_sentiment_counts.positive += 1;
        } else {
            self.overall_sentiment_counts.negative += 1;
        }
    }

    /// Fold another partial accumulator into this one
    pub fn merge(&mut self, other: &CorpusStatistics) {
        self.total_reviews += other.total_reviews;
        for (platform, count) in &other.platform_counts {
            *self.platform_counts.entry(platform.clone()).or_insert(0) += count;
        }
        for (aspect, count) in &other.aspect_mention_counts {
            *self.aspect_mention_counts.entry(aspect.clone()).or_insert(0) += count;
        }
        for (aspect, counts) in &other.aspect_sentiment_counts {
            self.aspect_sentiment_counts
                .entry(aspect.clone())
                .or_default()
                .merge(counts);
        }
        self.overall_sentiment_counts.positive += other.overall_sentiment_counts.positive;
        self.overall_sentiment_counts.negative += other.overall_sentiment_counts.negative;
    }

    /// Aspects by mention count, most mentioned first; ties by name
    pub fn ranked_aspects(&self) -> Vec<(&str, u64)> {
        let mut ranked: Vec<(&str, u64)> = self
            .aspect_mention_counts
            .iter()
            .map(|(aspect, count)| (aspect.as_str(), *count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }

    pub fn positive_percentage(&self) -> f64 {
        percentage(self.overall_sentiment_counts.positive, self.total_reviews)
    }

    pub fn negative_percentage(&self) -> f64 {
        percentage(self.overall_sentiment_counts.negative, self.total_reviews)
    }

    /// Check the mention/sentiment invariant for every aspect
    pub fn is_consistent(&self) -> bool {
        self.aspect_mention_counts.len() == self.aspect_sentiment_counts.len()
            && self.aspect_sentiment_counts.iter().all(|(aspect, counts)| {
                counts.total == counts.positive + counts.negative
                    && self.aspect_mention_counts.get(aspect) == Some(&counts.total)
            })
    }
}

fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}
