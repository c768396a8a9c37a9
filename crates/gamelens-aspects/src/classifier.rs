//! Sentence classifier trait and common types

use async_trait::async_trait;
use gamelens_core::{Result, Sentiment};

/// Sentence-level sentiment classifier.
///
/// Implementations are initialized once before a batch starts and are shared
/// by reference for the rest of the run.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify a single sentence
    async fn classify(&self, text: &str) -> Result<Classification>;

    /// Get the classifier name
    fn name(&self) -> &str;
}

/// Result of classifying one sentence
#[derive(Debug, Clone)]
pub struct Classification {
    /// Polarity label
    pub label: Sentiment,

    /// Confidence in the label (0.0-1.0)
    pub confidence: f32,

    /// Additional metadata
    pub metadata: ClassificationMetadata,

    /// Latency in microseconds
    pub latency_us: u64,
}

impl Classification {
    /// Create a new classification; confidence is clamped into [0, 1]
    pub fn new(label: Sentiment, confidence: f32) -> Self {
        Self {
            label,
            confidence: clamp_confidence(confidence),
            metadata: ClassificationMetadata::default(),
            latency_us: 0,
        }
    }

    /// `+confidence` for positive, `-confidence` for negative
    pub fn signed_score(&self) -> f64 {
        self.label.signed(clamp_confidence(self.confidence) as f64)
    }
}

/// Metadata about classification
#[derive(Debug, Clone, Default)]
pub struct ClassificationMetadata {
    /// Model name or version
    pub model: Option<String>,

    /// Positive and negative term hits (lexicon classifiers)
    pub hits: Option<(usize, usize)>,
}

fn clamp_confidence(confidence: f32) -> f32 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}
