//! Custom-search provider for comparable listings.
//!
//! Speaks the Google Custom Search JSON API dialect: `key` + `cx` + `q`
//! query parameters, results under `items[]` with optional `pagemap`
//! metatags carrying listing descriptions.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use super::{secrets::ApiCredential, ProviderError, SearchHit, SearchProvider};
use crate::config::SearchConfig;

/// The API accepts at most this many results per request.
const MAX_RESULTS_PER_REQUEST: u8 = 10;

pub struct CustomSearchProvider {
    credential: ApiCredential,
    engine_id: String,
    endpoint: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl std::fmt::Debug for CustomSearchProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomSearchProvider")
            .field("credential", &self.credential)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl CustomSearchProvider {
    pub fn from_config(config: &SearchConfig) -> Result<Self, ProviderError> {
        let credential = ApiCredential::from_config_or_env(
            config.api_key.as_deref(),
            &config.api_key_env,
            "search API key",
        )?;

        let engine_id = match &config.engine_id {
            Some(id) if !id.is_empty() => id.clone(),
            _ => std::env::var(&config.engine_id_env).map_err(|_| {
                ProviderError::NotConfigured(format!(
                    "search engine id not set: configure 'engine_id' or '{}' environment variable",
                    config.engine_id_env
                ))
            })?,
        };

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::HttpError(e.to_string()))?;

        Ok(Self {
            credential,
            engine_id,
            endpoint: config.endpoint.clone(),
            timeout: config.timeout,
            client,
        })
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    link: String,
    pagemap: Option<PageMap>,
}

#[derive(Debug, Deserialize)]
struct PageMap {
    #[serde(default)]
    metatags: Vec<serde_json::Value>,
}

impl SearchItem {
    fn into_hit(self) -> SearchHit {
        let mut metadata = Vec::new();
        if let Some(pagemap) = &self.pagemap {
            for tags in &pagemap.metatags {
                for key in ["og:description", "description"] {
                    if let Some(text) = tags.get(key).and_then(|v| v.as_str()) {
                        if !text.is_empty() {
                            metadata.push(text.to_string());
                        }
                    }
                }
            }
        }

        SearchHit {
            title: self.title,
            snippet: self.snippet,
            link: self.link,
            metadata,
        }
    }
}

#[async_trait]
impl SearchProvider for CustomSearchProvider {
    async fn search(&self, query: &str, max_results: u8) -> Result<Vec<SearchHit>, ProviderError> {
        let num = max_results.min(MAX_RESULTS_PER_REQUEST);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("key", self.credential.expose()),
                ("cx", self.engine_id.as_str()),
                ("q", query),
                ("num", &num.to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(self.timeout)
                } else {
                    ProviderError::HttpError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        Ok(body.items.into_iter().map(SearchItem::into_hit).collect())
    }

    fn name(&self) -> &str {
        "custom-search"
    }
}
