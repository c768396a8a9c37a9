//! Per-aspect sentiment attribution
//!
//! Every evidence sentence of an aspect is classified on its own. The signed
//! confidences are averaged over the aspect's sentence count and the aspect
//! is POSITIVE only when that average is strictly above zero; an average of
//! exactly zero resolves to NEGATIVE, since there is no neutral class.
//!
//! A sentence whose classification fails contributes zero and still counts
//! toward the average. The failure is logged and never aborts the review.

use crate::classifier::Classifier;
use crate::detector::AspectEvidence;
use gamelens_core::{AspectSentiments, Sentiment};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Scoring detail for one aspect
#[derive(Debug, Clone, PartialEq)]
pub struct AspectScore {
    pub label: Sentiment,
    /// Mean signed confidence over all evidence sentences
    pub average: f64,
    pub sentences: usize,
    /// Sentences whose classification failed and contributed zero
    pub failures: usize,
}

#[derive(Clone)]
pub struct SentimentAttributor {
    classifier: Arc<dyn Classifier>,
}

impl SentimentAttributor {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self { classifier }
    }

    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    /// Label every aspect in `evidence`
    pub async fn score(&self, evidence: &AspectEvidence) -> AspectSentiments {
        self.score_detailed(evidence)
            .await
            .into_iter()
            .map(|(aspect, score)| (aspect, score.label))
            .collect()
    }

    /// Label every aspect in `evidence`, keeping the averages and failure counts
    pub async fn score_detailed(&self, evidence: &AspectEvidence) -> BTreeMap<String, AspectScore> {
        let mut scores = BTreeMap::new();
        for (aspect, sentences) in evidence {
            let score = self.score_aspect(aspect, sentences).await;
            debug!(
                aspect = %aspect,
                label = %score.label,
                average = score.average,
                sentences = score.sentences,
                "Aspect scored"
            );
            scores.insert(aspect.clone(), score);
        }
        scores
    }

    async fn score_aspect(&self, aspect: &str, sentences: &[String]) -> AspectScore {
        let mut total = 0.0;
        let mut failures = 0;

        for sentence in sentences {
            match self.classifier.classify(sentence).await {
                Ok(classification) => {
                    metrics::histogram!("gamelens_classifier_latency_us")
                        .record(classification.latency_us as f64);
                    total += classification.signed_score();
                }
                Err(e) => {
                    failures += 1;
                    metrics::counter!("gamelens_classifier_failures_total").increment(1);
                    warn!(
                        classifier = self.classifier.name(),
                        aspect,
                        error = %e,
                        "Sentence classification failed, counting it as neutral"
                    );
                }
            }
        }

        let average = if sentences.is_empty() {
            0.0
        } else {
            total / sentences.len() as f64
        };

        AspectScore {
            label: Sentiment::from_score(average),
            average,
            sentences: sentences.len(),
            failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Classification;
    use async_trait::async_trait;
    use gamelens_core::{Error, Result};

    /// Scores sentences by keyword: "good" +0.9, "bad" -0.6, "boom" fails
    struct KeywordClassifier;

    #[async_trait]
    impl Classifier for KeywordClassifier {
        async fn classify(&self, text: &str) -> Result<Classification> {
            if text.contains("boom") {
                Err(Error::classifier("model exploded"))
            } else if text.contains("good") {
                Ok(Classification::new(Sentiment::Positive, 0.9))
            } else if text.contains("bad") {
                Ok(Classification::new(Sentiment::Negative, 0.6))
            } else {
                Ok(Classification::new(Sentiment::Positive, 0.0))
            }
        }

        fn name(&self) -> &str {
            "keyword"
        }
    }

    fn evidence(entries: Vec<(&str, Vec<&str>)>) -> AspectEvidence {
        entries
            .into_iter()
            .map(|(aspect, sentences)| {
                (
                    aspect.to_string(),
                    sentences.iter().map(|s| s.to_string()).collect(),
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn test_average_decides_label() {
        let attributor = SentimentAttributor::new(Arc::new(KeywordClassifier));
        let evidence = evidence(vec![
            ("visuals", vec!["good looks", "bad fps"]),
            ("value", vec!["bad price", "bad deal", "good game"]),
        ]);

        let scores = attributor.score_detailed(&evidence).await;
        assert_eq!(scores["visuals"].label, Sentiment::Positive);
        assert!((scores["visuals"].average - 0.15).abs() < 1e-6);
        assert_eq!(scores["value"].label, Sentiment::Negative);
        assert!((scores["value"].average - (-0.1)).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_zero_average_is_negative() {
        let attributor = SentimentAttributor::new(Arc::new(KeywordClassifier));
        let result = attributor
            .score(&evidence(vec![("audio", vec!["it has music"])]))
            .await;
        assert_eq!(result["audio"], Sentiment::Negative);
    }

    #[tokio::test]
    async fn test_failed_sentence_contributes_zero() {
        let attributor = SentimentAttributor::new(Arc::new(KeywordClassifier));
        let evidence = evidence(vec![("visuals", vec!["good art", "boom", "bad fps"])]);

        let scores = attributor.score_detailed(&evidence).await;
        let visuals = &scores["visuals"];
        assert_eq!(visuals.failures, 1);
        assert_eq!(visuals.sentences, 3);
        assert!((visuals.average - 0.1).abs() < 1e-6);
        assert_eq!(visuals.label, Sentiment::Positive);
    }

    #[tokio::test]
    async fn test_empty_evidence() {
        let attributor = SentimentAttributor::new(Arc::new(KeywordClassifier));
        assert!(attributor.score(&AspectEvidence::new()).await.is_empty());

        let scores = attributor
            .score_detailed(&evidence(vec![("audio", vec![])]))
            .await;
        assert_eq!(scores["audio"].average, 0.0);
        assert_eq!(scores["audio"].label, Sentiment::Negative);
    }
}
