//! Configuration for the aspect lexicon and the built-in sentiment lexicon

use gamelens_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Version stamped on the built-in game review lexicon
pub const BUILTIN_LEXICON_VERSION: u32 = 2;

/// Versioned aspect lexicon definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconConfig {
    /// Lexicon revision, carried into reports and logs
    #[serde(default = "default_version")]
    pub version: u32,

    /// Aspects in registration order
    pub aspects: Vec<AspectSpec>,
}

/// One canonical aspect and its surface forms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectSpec {
    /// Canonical aspect name (a single token)
    pub name: String,

    /// Single words and two-word phrases that canonicalize to `name`
    #[serde(default)]
    pub variations: Vec<String>,
}

impl AspectSpec {
    pub fn new<I, S>(name: impl Into<String>, variations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            variations: variations.into_iter().map(Into::into).collect(),
        }
    }
}

impl LexiconConfig {
    /// Parse from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read lexicon file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml(&content)
    }

    /// The ten-aspect game review taxonomy
    pub fn builtin() -> Self {
        Self {
            version: BUILTIN_LEXICON_VERSION,
            aspects: BUILTIN_ASPECTS
                .iter()
                .map(|(name, variations)| AspectSpec::new(*name, variations.iter().copied()))
                .collect(),
        }
    }
}

impl Default for LexiconConfig {
    fn default() -> Self {
        Self::builtin()
    }
}

fn default_version() -> u32 {
    1
}

const BUILTIN_ASPECTS: &[(&str, &[&str])] = &[
    (
        "value",
        &[
            "cost", "price", "affordability", "expensive", "cheap", "discount", "pricing",
            "value",
        ],
    ),
    (
        "visuals",
        &[
            "graphics", "visuals", "art", "resolution", "textures", "design", "art style",
            "detail", "rendering", "clarity", "HD", "4K", "realism", "performance", "animation",
            "aesthetics",
        ],
    ),
    (
        "platform",
        &[
            "platform", "device", "system", "console", "pc", "cross-platform", "exclusive",
            "device compatibility", "hardware", "software environment",
        ],
    ),
    (
        "narrative",
        &[
            "storyline", "plot", "narrative", "characters", "dialogue", "writing", "script",
            "backstory", "lore", "depth", "twist", "theme", "world-building", "story",
        ],
    ),
    (
        "interaction",
        &[
            "gameplay", "mechanics", "controls", "interaction", "combat", "exploration",
            "level design", "user experience", "playability", "fluidity", "pace", "challenge",
            "variety", "immersion", "customization", "user interaction",
        ],
    ),
    (
        "audio",
        &[
            "music", "sound", "soundtrack", "audio", "bgm", "voice acting", "atmosphere",
            "sound design", "melody", "rhythm", "instrumental", "vocals", "audio design",
        ],
    ),
    (
        "challenge",
        &[
            "difficult", "challenge", "skill level", "difficulty curve", "hard", "easy",
            "moderate", "intense", "frustrating", "beginner", "expert", "progressive",
            "complexity",
        ],
    ),
    (
        "social",
        &[
            "multiplayer", "co-op", "online", "matchmaking", "pvp", "team", "competitive",
            "social", "cooperative", "lobby", "community", "group play", "collaboration",
        ],
    ),
    (
        "performance",
        &[
            "performance", "lag", "frame rate", "fps", "optimization", "stability", "smoothness",
            "load time", "render time", "glitch", "drop", "frame drops", "buffering",
            "scalability", "speed", "efficiency", "system performance",
        ],
    ),
    (
        "engagement",
        &[
            "replayability", "replay value", "longevity", "endgame", "post game",
            "replay options", "multiple endings", "progression", "game duration",
            "content depth",
        ],
    ),
];

/// Word lists for the built-in lexicon sentiment classifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentLexiconConfig {
    #[serde(default = "default_positive_terms")]
    pub positive: Vec<String>,

    #[serde(default = "default_negative_terms")]
    pub negative: Vec<String>,

    /// Words that flip the polarity of the term right after them
    #[serde(default = "default_negations")]
    pub negations: Vec<String>,
}

impl Default for SentimentLexiconConfig {
    fn default() -> Self {
        Self {
            positive: default_positive_terms(),
            negative: default_negative_terms(),
            negations: default_negations(),
        }
    }
}

fn to_strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn default_positive_terms() -> Vec<String> {
    to_strings(&[
        "good", "great", "excellent", "love", "loved", "amazing", "wonderful", "fantastic",
        "awesome", "best", "beautiful", "stunning", "gorgeous", "fun", "enjoy", "enjoyed",
        "masterpiece", "brilliant", "smooth", "polished", "worth", "recommend", "immersive",
        "addictive", "perfect", "solid", "impressive", "incredible",
    ])
}

fn default_negative_terms() -> Vec<String> {
    to_strings(&[
        "bad", "terrible", "awful", "hate", "hated", "horrible", "worst", "boring", "broken",
        "buggy", "crash", "crashes", "disappointed", "disappointing", "poor", "overpriced",
        "ugly", "laggy", "unplayable", "frustrating", "waste", "refund", "mediocre", "clunky",
        "repetitive", "garbage", "trash",
    ])
}

fn default_negations() -> Vec<String> {
    to_strings(&["not", "no", "never", "isn't", "wasn't", "don't", "doesn't", "didn't"])
}
