//! Runtime configuration for the news sentiment pipeline.
//!
//! Configuration is optional: every field has a default, so the binary runs
//! without a config file. When `--config path/to/config.yaml` is given, the
//! file is parsed and any fields it sets override the defaults. Partial files
//! are fine; omitted sections and fields keep their default values.

use serde::{Deserialize, Serialize};
use std::error::Error;

use crate::analysis::aggregate::DEFAULT_TOPIC_COUNT;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Article fetching settings
    pub fetch: FetchConfig,
    /// Sentiment and topic analysis settings
    pub analysis: AnalysisConfig,
    /// Narration (translation + speech) settings
    pub narrator: NarratorConfig,
}

/// Settings for fetching articles from Google News.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// User-Agent header sent with every HTTP request
    pub user_agent: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Settings for the analysis stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// How many topics to extract per article
    pub topic_count: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            topic_count: DEFAULT_TOPIC_COUNT,
        }
    }
}

/// Settings for the spoken-summary stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NarratorConfig {
    /// Translation endpoint (Google Translate web API)
    pub translate_endpoint: String,
    /// Text-to-speech endpoint
    pub tts_endpoint: String,
    /// Target language code for translation and speech
    pub language: String,
}

impl Default for NarratorConfig {
    fn default() -> Self {
        Self {
            translate_endpoint: "https://translate.googleapis.com/translate_a/single".to_string(),
            tts_endpoint: "https://translate.google.com/translate_tts".to_string(),
            language: "hi".to_string(),
        }
    }
}

/// Loads configuration from an optional YAML file path.
///
/// With `None`, returns the built-in defaults. With `Some(path)`, the file
/// must exist and parse; a missing or malformed file is an error rather than
/// a silent fallback, since the caller asked for it explicitly.
pub fn load_config(path: Option<&str>) -> Result<AppConfig, Box<dyn Error>> {
    match path {
        None => Ok(AppConfig::default()),
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| format!("failed to read config file {}: {}", path, e))?;
            let config: AppConfig = serde_yaml::from_str(&content)
                .map_err(|e| format!("failed to parse config file {}: {}", path, e))?;
            Ok(config)
        }
    }
}
