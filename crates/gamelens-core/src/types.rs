//! Core types for GameLens

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Platform bucket used when a review carries no platform
pub const UNKNOWN_PLATFORM: &str = "Unknown";

/// A single review as read from the document store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Opaque store identifier
    pub id: String,

    /// Free-text review body
    pub text: String,

    /// Source platform (steam, reddit, youtube, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,

    /// Title of the reviewed game
    #[serde(default)]
    pub game_title: String,
}

impl Review {
    /// Create a new review without platform or title
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            platform: None,
            game_title: String::new(),
        }
    }

    /// Set the source platform
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    /// Set the game title
    pub fn with_game_title(mut self, title: impl Into<String>) -> Self {
        self.game_title = title.into();
        self
    }

    /// Platform name for aggregation, falling back to [`UNKNOWN_PLATFORM`]
    pub fn platform_or_unknown(&self) -> &str {
        match self.platform.as_deref() {
            Some(p) if !p.trim().is_empty() => p,
            _ => UNKNOWN_PLATFORM,
        }
    }
}

/// Two-valued sentiment label. There is no neutral class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sentiment {
    Positive,
    Negative,
}

impl Sentiment {
    /// Label for a signed average score. Exactly zero resolves to `Negative`.
    pub fn from_score(score: f64) -> Self {
        if score > 0.0 {
            Self::Positive
        } else {
            Self::Negative
        }
    }

    /// Apply this label's sign to a confidence value
    pub fn signed(&self, confidence: f64) -> f64 {
        match self {
            Self::Positive => confidence,
            Self::Negative => -confidence,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "POSITIVE",
            Self::Negative => "NEGATIVE",
        }
    }

    pub fn is_positive(&self) -> bool {
        matches!(self, Self::Positive)
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "POSITIVE" => Ok(Self::Positive),
            "NEGATIVE" => Ok(Self::Negative),
            other => Err(format!("unknown sentiment label: {other}")),
        }
    }
}

/// Per-review result: canonical aspect -> label. Absent aspects were not mentioned.
pub type AspectSentiments = BTreeMap<String, Sentiment>;
