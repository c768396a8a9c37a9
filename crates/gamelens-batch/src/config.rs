//! Batch run configuration

use crate::cli::Cli;
use gamelens_aspects::{AspectLexicon, LexiconConfig, SentimentLexiconConfig};
use gamelens_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Fields the result may never overwrite
const RESERVED_FIELDS: &[&str] = &["_id", "id", crate::store::TEXT_FIELD];

/// Batch run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// JSON collection file holding the reviews
    #[serde(default)]
    pub store_path: Option<PathBuf>,

    /// Aspect lexicon file; the built-in lexicon when unset
    #[serde(default)]
    pub lexicon_path: Option<PathBuf>,

    /// Documents fetched per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Document field the aspect sentiments are written to
    #[serde(default = "default_result_field")]
    pub result_field: String,

    /// Plain-text report destination
    #[serde(default = "default_report_path")]
    pub report_path: PathBuf,

    /// Optional JSON statistics snapshot destination
    #[serde(default)]
    pub stats_json_path: Option<PathBuf>,

    /// Prometheus text dump of the run's counters
    #[serde(default = "default_metrics_path")]
    pub metrics_path: PathBuf,

    /// Word lists for the built-in sentence classifier
    #[serde(default)]
    pub sentiment: SentimentLexiconConfig,
}

impl BatchConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        // Apply CLI overrides
        if let Some(store) = &cli.store {
            config.store_path = Some(store.clone());
        }

        if let Some(lexicon) = &cli.lexicon {
            config.lexicon_path = Some(lexicon.clone());
        }

        if let Some(page_size) = cli.page_size {
            config.page_size = page_size;
        }

        if let Some(report) = &cli.report {
            config.report_path = report.clone();
        }

        if let Some(json) = &cli.json {
            config.stats_json_path = Some(json.clone());
        }

        if let Some(metrics) = &cli.metrics {
            config.metrics_path = metrics.clone();
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.store_path.is_none() {
            return Err(Error::config(
                "No document store configured (set store_path, --store or GAMELENS_STORE)",
            ));
        }

        if self.page_size == 0 {
            return Err(Error::config("page_size must be greater than zero"));
        }

        let field = self.result_field.trim();
        if field.is_empty() {
            return Err(Error::config("result_field must not be empty"));
        }
        if RESERVED_FIELDS.contains(&field) {
            return Err(Error::config(format!(
                "result_field '{field}' would overwrite review data"
            )));
        }

        Ok(())
    }

    /// Build the configured aspect lexicon
    pub fn load_lexicon(&self) -> Result<AspectLexicon> {
        match &self.lexicon_path {
            Some(path) => AspectLexicon::from_config(&LexiconConfig::from_file(path)?),
            None => AspectLexicon::builtin(),
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            store_path: None,
            lexicon_path: None,
            page_size: default_page_size(),
            result_field: default_result_field(),
            report_path: default_report_path(),
            stats_json_path: None,
            metrics_path: default_metrics_path(),
            sentiment: SentimentLexiconConfig::default(),
        }
    }
}

fn default_page_size() -> usize {
    500
}

fn default_result_field() -> String {
    "aspect_sentiments".to_string()
}

fn default_report_path() -> PathBuf {
    PathBuf::from("review_statistics.txt")
}

fn default_metrics_path() -> PathBuf {
    PathBuf::from("review_metrics.prom")
}
