//! GameLens Core
//!
//! Shared types and error handling for the GameLens aspect sentiment engine.
//!
//! This crate provides:
//! - The review record consumed from the document store
//! - The two-valued sentiment label and per-review aspect results
//! - Error types and result handling

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{AspectSentiments, Review, Sentiment, UNKNOWN_PLATFORM};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{AspectSentiments, Review, Sentiment};
}
