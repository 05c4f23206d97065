//! Runtime configuration.
//!
//! Concrete providers are selected and parameterized here, never by
//! compiled-in branching. A config file is optional: every field has a
//! default, and credentials fall back to environment variables so a bare
//! `terraval panel` works on a machine with the right env set.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors from configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    pub reasoning: ReasoningConfig,
    pub search: SearchConfig,
    pub measurement: MeasurementConfig,
}

impl RuntimeConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }
}

/// Text-reasoning provider settings (OpenAI-compatible chat completions).
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReasoningConfig {
    /// API base URL; `/chat/completions` is appended.
    pub base_url: String,

    pub model: String,

    /// Inline API key. Prefer `api_key_env`.
    pub api_key: Option<String>,

    /// Environment variable consulted when `api_key` is unset.
    pub api_key_env: String,

    #[serde(with = "duration_str")]
    pub timeout: Duration,

    pub max_tokens: u32,

    pub temperature: f32,
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".to_string(),
            model: "openai/gpt-4o-mini".to_string(),
            api_key: None,
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            timeout: Duration::from_secs(30),
            max_tokens: 2000,
            temperature: 0.3,
        }
    }
}

/// Comparable-listings search provider settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    pub endpoint: String,

    pub api_key: Option<String>,
    pub api_key_env: String,

    /// Custom search engine id.
    pub engine_id: Option<String>,
    pub engine_id_env: String,

    #[serde(with = "duration_str")]
    pub timeout: Duration,

    /// Results fetched per query.
    pub max_results: u8,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://www.googleapis.com/customsearch/v1".to_string(),
            api_key: None,
            api_key_env: "GOOGLE_API_KEY".to_string(),
            engine_id: None,
            engine_id_env: "GOOGLE_CSE_ID".to_string(),
            timeout: Duration::from_secs(10),
            max_results: 10,
        }
    }
}

/// Satellite measurement provider settings.
///
/// No endpoint means no measurement capability: requests must then carry
/// their own `satellite_data`. There is never a synthetic fallback.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MeasurementConfig {
    pub endpoint: Option<String>,

    #[serde(with = "duration_str")]
    pub timeout: Duration,
}

impl Default for MeasurementConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Durations as human-readable strings ("10s", "2m 30s").
mod duration_str {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}
