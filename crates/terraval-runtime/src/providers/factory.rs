//! Configuration-driven provider construction.
//!
//! Providers are built once per process from [`RuntimeConfig`] sections and
//! injected into whatever needs them. Nothing here is a global: swapping a
//! vendor means changing configuration, not code.

use std::sync::Arc;

use super::{
    ChatCompletionsProvider, CustomSearchProvider, EarthObservationClient, MeasurementProvider,
    ProviderError, ReasoningProvider, SearchProvider,
};
use crate::config::{MeasurementConfig, ReasoningConfig, SearchConfig};

pub fn build_reasoning_provider(
    config: &ReasoningConfig,
) -> Result<Arc<dyn ReasoningProvider>, ProviderError> {
    Ok(Arc::new(ChatCompletionsProvider::from_config(config)?))
}

pub fn build_search_provider(
    config: &SearchConfig,
) -> Result<Arc<dyn SearchProvider>, ProviderError> {
    Ok(Arc::new(CustomSearchProvider::from_config(config)?))
}

/// Returns `Ok(None)` when no measurement endpoint is configured — callers
/// must then rely on request-supplied satellite data.
pub fn build_measurement_provider(
    config: &MeasurementConfig,
) -> Result<Option<Arc<dyn MeasurementProvider>>, ProviderError> {
    if config.endpoint.is_none() {
        return Ok(None);
    }
    Ok(Some(Arc::new(EarthObservationClient::from_config(config)?)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reasoning_provider_from_inline_key() {
        let config = ReasoningConfig {
            api_key: Some("key".to_string()),
            ..ReasoningConfig::default()
        };
        let provider = build_reasoning_provider(&config).unwrap();
        assert_eq!(provider.name(), "chat-completions");
    }

    #[test]
    fn test_measurement_provider_absent_without_endpoint() {
        let provider = build_measurement_provider(&MeasurementConfig::default()).unwrap();
        assert!(provider.is_none());
    }

    #[test]
    fn test_measurement_provider_present_with_endpoint() {
        let config = MeasurementConfig {
            endpoint: Some("http://localhost:8600/measure".to_string()),
            ..MeasurementConfig::default()
        };
        let provider = build_measurement_provider(&config).unwrap();
        assert!(provider.is_some());
    }
}
