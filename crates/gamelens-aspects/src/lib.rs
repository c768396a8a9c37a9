//! GameLens Aspects
//!
//! Maps free-text game reviews onto a fixed taxonomy of aspects and
//! attributes a polarity to each detected aspect.
//!
//! The engine is a chain of pure stages plus one external seam:
//! - [`AspectLexicon`]: canonical aspect -> surface-form variations
//! - [`Normalizer`]: tokenizes and rewrites matched spans to canonical tokens
//! - [`AspectDetector`]: finds canonical aspects and collects sentence evidence
//! - [`SentimentAttributor`]: scores evidence through a [`Classifier`]
//!
//! Everything except the classifier is synchronous and deterministic.

pub mod attributor;
pub mod classifier;
pub mod config;
pub mod detector;
pub mod lexicon;
pub mod normalizer;
pub mod sentiment;

pub use attributor::{AspectScore, SentimentAttributor};
pub use classifier::{Classification, ClassificationMetadata, Classifier};
pub use config::{AspectSpec, LexiconConfig, SentimentLexiconConfig};
pub use detector::{AspectDetector, AspectEvidence};
pub use lexicon::AspectLexicon;
pub use normalizer::{tokenize, Normalizer};
pub use sentiment::LexiconSentimentClassifier;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::attributor::SentimentAttributor;
    pub use crate::classifier::{Classification, Classifier};
    pub use crate::detector::AspectDetector;
    pub use crate::lexicon::AspectLexicon;
    pub use crate::normalizer::Normalizer;
    pub use crate::sentiment::LexiconSentimentClassifier;
}
