//! Text normalization: rewrite lexicon variations to canonical aspect tokens
//!
//! Normalization works on word tokens. Two-token phrases are matched first,
//! left to right; a matched phrase consumes both of its tokens, so the
//! single-word pass never re-matches a fragment of it and two overlapping
//! phrases resolve to the one that starts first. Remaining tokens are then
//! matched one at a time. The output is the surviving tokens joined by a
//! single space.
//!
//! Case: the lexicon lookup ignores case, but unmatched tokens are kept as
//! they are. Callers lower-case review text before normalizing so that the
//! output is fully case-insensitive.

use crate::lexicon::AspectLexicon;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

/// Words (keeping inner hyphens and apostrophes) or single punctuation marks
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\w+(?:['’\-]\w+)*|[^\w\s]").expect("token pattern is valid")
});

/// Split text into word and punctuation tokens.
pub fn tokenize(text: &str) -> Vec<&str> {
    TOKEN_RE.find_iter(text).map(|m| m.as_str()).collect()
}

/// Lexicon-driven normalizer. Cheap to clone; the lexicon is shared.
#[derive(Debug, Clone)]
pub struct Normalizer {
    lexicon: Arc<AspectLexicon>,
}

impl Normalizer {
    pub fn new(lexicon: Arc<AspectLexicon>) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &AspectLexicon {
        &self.lexicon
    }

    /// Normalize `text` into a single space-joined string.
    ///
    /// Precondition: `text` is already lower-cased.
    pub fn normalize(&self, text: &str) -> String {
        self.normalize_tokens(text).join(" ")
    }

    /// Normalize `text` and return the surviving tokens.
    pub fn normalize_tokens(&self, text: &str) -> Vec<String> {
        let tokens = tokenize(text);
        let mut output: Vec<Option<&str>> = tokens.iter().map(|t| Some(*t)).collect();
        let mut consumed = vec![false; tokens.len()];

        let mut bigram = String::new();
        for i in 0..tokens.len().saturating_sub(1) {
            if consumed[i] || consumed[i + 1] {
                continue;
            }

            bigram.clear();
            bigram.push_str(tokens[i]);
            bigram.push(' ');
            bigram.push_str(tokens[i + 1]);

            if let Some(aspect) = self.lexicon.lookup(&bigram) {
                output[i] = Some(aspect);
                output[i + 1] = None;
                consumed[i] = true;
                consumed[i + 1] = true;
            }
        }

        for (i, token) in tokens.iter().enumerate() {
            if consumed[i] {
                continue;
            }
            if let Some(aspect) = self.lexicon.lookup(token) {
                output[i] = Some(aspect);
            }
        }

        output.into_iter().flatten().map(str::to_string).collect()
    }
}
