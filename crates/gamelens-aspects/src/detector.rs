//! Aspect detection over normalized review text
//!
//! An aspect counts as mentioned when its canonical name occurs anywhere in
//! the normalized review, as a substring. Each mentioned aspect receives
//! *every* sentence of the review as evidence, not just the sentence that
//! mentions it. Attribution is therefore review-level: one strongly worded
//! sentence about something else moves the score of every aspect the review
//! mentions. This is the detector's defining limitation.

use crate::lexicon::AspectLexicon;
use crate::normalizer::Normalizer;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Mentioned aspect -> evidence sentences, in review order
pub type AspectEvidence = BTreeMap<String, Vec<String>>;

const SENTENCE_TERMINATORS: &[&str] = &[".", "!", "?", "…"];

#[derive(Debug, Clone)]
pub struct AspectDetector {
    normalizer: Normalizer,
}

impl AspectDetector {
    pub fn new(lexicon: Arc<AspectLexicon>) -> Self {
        Self {
            normalizer: Normalizer::new(lexicon),
        }
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Extract the mentioned aspects of a raw review.
    ///
    /// An empty map means no aspect was mentioned; that is a valid result.
    pub fn extract(&self, review_text: &str) -> AspectEvidence {
        let lowered = review_text.to_lowercase();
        let tokens = self.normalizer.normalize_tokens(&lowered);
        let normalized = tokens.join(" ");

        let mentioned: Vec<&str> = self
            .normalizer
            .lexicon()
            .aspect_names()
            .filter(|aspect| normalized.contains(*aspect))
            .collect();

        if mentioned.is_empty() {
            return AspectEvidence::new();
        }

        let sentences = split_sentences(&tokens);
        mentioned
            .into_iter()
            .map(|aspect| (aspect.to_string(), sentences.clone()))
            .collect()
    }
}

/// Group tokens into sentences, closing each after a run of terminal marks.
pub fn split_sentences<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        let token = token.as_ref();
        current.push(token);

        let closes = is_terminator(token)
            && tokens
                .get(i + 1)
                .map_or(true, |next| !is_terminator(next.as_ref()));
        if closes {
            sentences.push(current.join(" "));
            current.clear();
        }
    }

    if !current.is_empty() {
        sentences.push(current.join(" "));
    }
    sentences
}

fn is_terminator(token: &str) -> bool {
    SENTENCE_TERMINATORS.contains(&token)
}
