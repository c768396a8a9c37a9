//! Lightweight sentiment classifier
//!
//! This is a lexicon-based classifier used when no external model is
//! configured. Terms match on word boundaries, ASCII case-insensitive; a
//! negation word directly before a term flips its polarity.

use crate::classifier::{Classification, ClassificationMetadata, Classifier};
use crate::config::SentimentLexiconConfig;
use aho_corasick::{AhoCorasick, MatchKind};
use gamelens_core::{Error, Result, Sentiment};
use std::collections::HashSet;
use std::time::Instant;

pub struct LexiconSentimentClassifier {
    name: String,
    positive: AhoCorasick,
    negative: AhoCorasick,
    negations: HashSet<String>,
}

impl LexiconSentimentClassifier {
    pub fn new() -> Result<Self> {
        Self::from_config("sentiment-lexicon", &SentimentLexiconConfig::default())
    }

    pub fn from_config(name: impl Into<String>, config: &SentimentLexiconConfig) -> Result<Self> {
        if config.positive.is_empty() || config.negative.is_empty() {
            return Err(Error::config(
                "Sentiment lexicon needs at least one positive and one negative term",
            ));
        }

        let positive = build_matcher(&config.positive).map_err(|e| {
            Error::classifier(format!("Failed to build positive sentiment matcher: {e}"))
        })?;
        let negative = build_matcher(&config.negative).map_err(|e| {
            Error::classifier(format!("Failed to build negative sentiment matcher: {e}"))
        })?;

        Ok(Self {
            name: name.into(),
            positive,
            negative,
            negations: config.negations.iter().map(|w| w.to_lowercase()).collect(),
        })
    }

    /// Count (positive, negative) hits after applying negation
    fn count_hits(&self, text: &str) -> (usize, usize) {
        let mut positive = 0;
        let mut negative = 0;

        for (matcher, is_positive) in [(&self.positive, true), (&self.negative, false)] {
            for m in matcher.find_iter(text) {
                if !on_word_boundary(text, m.start(), m.end()) {
                    continue;
                }
                let negated = preceding_word(text, m.start())
                    .map(|w| self.negations.contains(&w.to_lowercase()))
                    .unwrap_or(false);
                if is_positive != negated {
                    positive += 1;
                } else {
                    negative += 1;
                }
            }
        }

        (positive, negative)
    }
}

fn build_matcher(terms: &[String]) -> std::result::Result<AhoCorasick, aho_corasick::BuildError> {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .match_kind(MatchKind::LeftmostLongest)
        .build(terms)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '\''
}

fn on_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.map_or(false, is_word_char) && !after.map_or(false, is_word_char)
}

fn preceding_word(text: &str, start: usize) -> Option<&str> {
    text[..start]
        .split(|c: char| !is_word_char(c))
        .filter(|w| !w.is_empty())
        .next_back()
}

#[async_trait::async_trait]
impl Classifier for LexiconSentimentClassifier {
    async fn classify(&self, text: &str) -> Result<Classification> {
        let start = Instant::now();

        let (positive, negative) = self.count_hits(text);
        let total = positive + negative;

        // No hits or a tie carries no signal.
        let confidence = if total == 0 {
            0.0
        } else {
            positive.abs_diff(negative) as f32 / total as f32
        };
        let label = if positive >= negative {
            Sentiment::Positive
        } else {
            Sentiment::Negative
        };

        Ok(Classification {
            label,
            confidence,
            metadata: ClassificationMetadata {
                model: Some(self.name.clone()),
                hits: Some((positive, negative)),
            },
            latency_us: start.elapsed().as_micros() as u64,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
