//! Aspect lexicon: canonical aspect names and their surface forms
//!
//! The lexicon is built once and is read-only afterwards. Every lower-cased
//! variation resolves to exactly one aspect:
//!
//! - each canonical name is implicitly a variation of its own aspect and
//!   always resolves to it;
//! - any other surface form declared under two aspects keeps its first
//!   registration, and the collision is logged.

use crate::config::LexiconConfig;
use crate::normalizer::tokenize;
use gamelens_core::{Error, Result};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Longest phrase, in tokens, the normalizer can match
pub const MAX_PHRASE_TOKENS: usize = 2;

#[derive(Debug, Clone)]
pub struct AspectLexicon {
    version: u32,
    /// Canonical names in registration order
    aspects: Vec<String>,
    /// Effective variations per aspect, as lookup keys
    variations: Vec<Vec<String>>,
    /// Lookup key (lower-cased tokens joined by one space) -> aspect index
    lookup: HashMap<String, usize>,
}

impl AspectLexicon {
    /// Build a lexicon from `(aspect, variations)` pairs in registration order.
    pub fn new<A, V, S>(entries: A) -> Result<Self>
    where
        A: IntoIterator<Item = (S, V)>,
        V: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::build(1, entries)
    }

    /// Build a lexicon from a versioned configuration
    pub fn from_config(config: &LexiconConfig) -> Result<Self> {
        Self::build(
            config.version,
            config
                .aspects
                .iter()
                .map(|a| (a.name.as_str(), a.variations.iter().map(String::as_str))),
        )
    }

    /// The built-in ten-aspect game review lexicon
    pub fn builtin() -> Result<Self> {
        Self::from_config(&LexiconConfig::builtin())
    }

    fn build<A, V, S>(version: u32, entries: A) -> Result<Self>
    where
        A: IntoIterator<Item = (S, V)>,
        V: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries: Vec<(String, Vec<String>)> = entries
            .into_iter()
            .map(|(name, vars)| {
                (
                    name.as_ref().to_string(),
                    vars.into_iter().map(|v| v.as_ref().to_string()).collect(),
                )
            })
            .collect();

        let mut aspects = Vec::with_capacity(entries.len());
        let mut lookup = HashMap::new();

        // Canonical names first so they always resolve to themselves.
        for (index, (name, _)) in entries.iter().enumerate() {
            let key = canonical_key(name)?;
            if lookup.insert(key.clone(), index).is_some() {
                return Err(Error::lexicon(format!("duplicate aspect name '{}'", key)));
            }
            aspects.push(key);
        }

        let mut variations = vec![Vec::new(); aspects.len()];
        for (index, (_, vars)) in entries.iter().enumerate() {
            variations[index].push(aspects[index].clone());

            for variation in vars {
                let key = phrase_key(variation).map_err(|e| {
                    Error::lexicon(format!("aspect '{}': {}", aspects[index], e))
                })?;

                match lookup.entry(key) {
                    Entry::Vacant(slot) => {
                        variations[index].push(slot.key().clone());
                        slot.insert(index);
                    }
                    Entry::Occupied(slot) if *slot.get() == index => {}
                    Entry::Occupied(slot) => {
                        warn!(
                            variation = %slot.key(),
                            kept = %aspects[*slot.get()],
                            ignored = %aspects[index],
                            "Variation registered under two aspects"
                        );
                    }
                }
            }
        }

        debug!(
            version,
            aspects = aspects.len(),
            phrases = lookup.len(),
            "Aspect lexicon built"
        );

        Ok(Self {
            version,
            aspects,
            variations,
            lookup,
        })
    }

    /// Resolve a variation phrase to its canonical aspect, ignoring case.
    ///
    /// Multi-word phrases must be token-separated by a single space.
    pub fn lookup(&self, phrase: &str) -> Option<&str> {
        let index = match self.lookup.get(phrase) {
            Some(index) => *index,
            None => *self.lookup.get(&phrase.to_lowercase())?,
        };
        Some(&self.aspects[index])
    }

    /// Canonical aspect names in registration order
    pub fn aspect_names(&self) -> impl Iterator<Item = &str> {
        self.aspects.iter().map(String::as_str)
    }

    /// Effective variations of an aspect, its own name first
    pub fn variations(&self, aspect: &str) -> Option<&[String]> {
        let index = self.aspects.iter().position(|a| a == aspect)?;
        Some(&self.variations[index])
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.aspects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aspects.is_empty()
    }

    /// Number of distinct surface forms, canonical names included
    pub fn phrase_count(&self) -> usize {
        self.lookup.len()
    }
}

impl Default for AspectLexicon {
    fn default() -> Self {
        Self::builtin().expect("Built-in lexicon is valid")
    }
}

fn canonical_key(name: &str) -> Result<String> {
    let lowered = name.to_lowercase();
    let tokens = tokenize(&lowered);
    match tokens.as_slice() {
        [single] => Ok(single.to_string()),
        [] => Err(Error::lexicon("aspect name is empty")),
        _ => Err(Error::lexicon(format!(
            "aspect name '{}' must be a single token",
            name
        ))),
    }
}

fn phrase_key(variation: &str) -> std::result::Result<String, String> {
    let lowered = variation.to_lowercase();
    let tokens = tokenize(&lowered);
    if tokens.is_empty() {
        return Err("empty variation".to_string());
    }
    if tokens.len() > MAX_PHRASE_TOKENS {
        return Err(format!(
            "variation '{}' spans {} tokens; at most {} are supported",
            variation,
            tokens.len(),
            MAX_PHRASE_TOKENS
        ));
    }
    Ok(tokens.join(" "))
}
