//! Error types for GameLens

/// Result type alias using GameLens's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for GameLens operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid or inconsistent aspect lexicon
    #[error("lexicon error: {0}")]
    Lexicon(String),

    /// Sentence classifier failures
    #[error("classifier error: {0}")]
    Classifier(String),

    /// Document store read/write failures
    #[error("store error: {0}")]
    Store(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

}

impl Error {
    /// Create a new lexicon error
    pub fn lexicon(msg: impl Into<String>) -> Self {
        Self::Lexicon(msg.into())
    }

    /// Create a new classifier error
    pub fn classifier(msg: impl Into<String>) -> Self {
        Self::Classifier(msg.into())
    }

    /// Create a new store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error must abort a run before any document is processed
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Lexicon(_) | Self::Yaml(_))
    }
}
