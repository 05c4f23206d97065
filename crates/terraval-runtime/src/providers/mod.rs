//! External capability boundaries.
//!
//! The valuation pipeline depends on three abstract capabilities — text
//! reasoning, comparable-price search, and satellite measurement — and this
//! module is the ONLY place where their network calls are made. Concrete
//! implementations are chosen by configuration (see [`factory`]), built
//! once per process, and injected into agents; nothing constructs a client
//! at module load.
//!
//! ## Security
//!
//! All providers use the [`secrets`] module for credential handling.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use terraval_core::SatelliteMetrics;

mod chat;
mod earth;
mod factory;
mod search;
pub mod secrets;

pub use chat::ChatCompletionsProvider;
pub use earth::EarthObservationClient;
pub use factory::{build_measurement_provider, build_reasoning_provider, build_search_provider};
pub use search::CustomSearchProvider;
pub use secrets::{ApiCredential, CredentialSource};

/// Errors from external providers.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    #[error("Rate limit exceeded, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    ParseError(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Measurement rejected: {0}")]
    InvalidMeasurement(String),
}

/// Whether a completion must come back as syntactically valid JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    FreeText,
    JsonObject,
}

/// Text-reasoning capability.
///
/// Implementations must honor [`ResponseFormat::JsonObject`] by returning a
/// parseable JSON object — the document-verification contract depends on it.
#[async_trait]
pub trait ReasoningProvider: Send + Sync {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        format: ResponseFormat,
    ) -> Result<String, ProviderError>;

    /// Provider name for diagnostics.
    fn name(&self) -> &str;
}

/// One search result. Text fields may be empty; `metadata` carries
/// description strings from structured page metadata when present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchHit {
    pub title: String,
    pub snippet: String,
    pub link: String,
    pub metadata: Vec<String>,
}

impl SearchHit {
    /// All extractable text of this hit, for price extraction.
    pub fn combined_text(&self) -> String {
        let mut text = format!("{} {}", self.title, self.snippet);
        for meta in &self.metadata {
            text.push(' ');
            text.push_str(meta);
        }
        text
    }
}

/// Comparable-listings search capability.
///
/// Timeout-bound; callers treat any error as "no results for this query"
/// and move on — never as a reason to retry.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, max_results: u8) -> Result<Vec<SearchHit>, ProviderError>;

    fn name(&self) -> &str;
}

/// Satellite measurement capability.
///
/// Must fail loudly when imagery is unavailable: a fabricated measurement
/// would corrupt every downstream valuation, so there is no synthetic
/// fallback anywhere.
#[async_trait]
pub trait MeasurementProvider: Send + Sync {
    async fn measure(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<SatelliteMetrics, ProviderError>;

    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combined_text_joins_all_fields() {
        let hit = SearchHit {
            title: "Plot for sale".to_string(),
            snippet: "asking $50,000".to_string(),
            link: "https://example.com".to_string(),
            metadata: vec!["prime land at $52,000".to_string()],
        };
        let text = hit.combined_text();
        assert!(text.contains("Plot for sale"));
        assert!(text.contains("$50,000"));
        assert!(text.contains("$52,000"));
    }

    #[test]
    fn test_provider_error_messages() {
        let err = ProviderError::ApiError {
            status: 503,
            message: "overloaded".to_string(),
        };
        assert!(err.to_string().contains("503"));

        let err = ProviderError::NotConfigured("GROQ_API_KEY".to_string());
        assert!(err.to_string().contains("GROQ_API_KEY"));
    }
}
