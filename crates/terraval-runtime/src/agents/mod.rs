//! Valuation agents.
//!
//! Each agent is one sequential pipeline over the shared request: compute
//! the deterministic appraisal for its strategy, enrich it (market blend,
//! document verification), then ask the reasoning provider for prose.
//!
//! # Isolation Contract
//! Agents operate in isolation:
//! - no shared mutable state between agents
//! - no access to other agents' opinions
//! - reasoning-provider failure never changes a deterministically computed
//!   valuation or confidence — only the prose falls back to a canned string
//! - an agent NEVER returns an error to its caller; every failure is folded
//!   into a well-formed [`ValuationOpinion`]

use async_trait::async_trait;
use std::sync::Arc;

use terraval_core::{
    quality_label, AnalysisRequest, ModelVariant, SatelliteMetrics, ValuationOpinion,
};

mod appraiser;
mod assessor;
mod surveyor;

pub use appraiser::Appraiser;
pub use assessor::Assessor;
pub use surveyor::Surveyor;

use crate::config::RuntimeConfig;
use crate::market::MarketAggregator;
use crate::providers::{build_reasoning_provider, build_search_provider};

/// A valuation agent: one strategy, one opinion per analysis.
#[async_trait]
pub trait ValuationAgent: Send + Sync {
    /// Stable identifier used in the opinion contract.
    fn name(&self) -> &'static str;

    fn variant(&self) -> ModelVariant;

    /// Produce exactly one opinion. Must not panic and must not error:
    /// degraded results carry canned reasoning or an `error` field instead.
    async fn analyze(
        &self,
        request: &AnalysisRequest,
        metrics: &SatelliteMetrics,
    ) -> ValuationOpinion;
}

/// Documents may arrive as contents without a count or vice versa; trust
/// whichever says more.
pub(crate) fn effective_document_count(request: &AnalysisRequest) -> usize {
    request.document_count.max(request.document_contents.len())
}

/// Canned reasoning used when the reasoning provider is unavailable.
pub(crate) fn canned_reasoning(
    variant: ModelVariant,
    metrics: &SatelliteMetrics,
    document_count: usize,
) -> String {
    let label = quality_label(variant, metrics.ndvi);
    match variant {
        ModelVariant::Appraiser => format!(
            "Analysis based on {} sqm property with NDVI {} and {} documents. \
             Vegetation health indicates {} land quality.",
            metrics.area_sqm, metrics.ndvi, document_count, label
        ),
        ModelVariant::Surveyor => format!(
            "Analysis based on {} sqm property with NDVI {} and {} documents. \
             Vegetation health and area indicate {} land quality with documentation {}.",
            metrics.area_sqm,
            metrics.ndvi,
            document_count,
            label,
            if document_count >= 2 {
                "complete"
            } else {
                "limited"
            }
        ),
        ModelVariant::Assessor => format!(
            "Valuation derived from satellite measurements: {} sqm parcel, NDVI {}, \
             {} supporting documents. Vegetation signal is {}.",
            metrics.area_sqm, metrics.ndvi, document_count, label
        ),
    }
}

/// Stand-in for an agent whose providers could not be configured.
///
/// Keeps configuration failures inside that agent's own result: the rest of
/// the panel runs unaffected.
pub struct FailedAgent {
    variant: ModelVariant,
    error: String,
}

impl FailedAgent {
    pub fn new(variant: ModelVariant, error: impl Into<String>) -> Self {
        Self {
            variant,
            error: error.into(),
        }
    }
}

#[async_trait]
impl ValuationAgent for FailedAgent {
    fn name(&self) -> &'static str {
        self.variant.agent_name()
    }

    fn variant(&self) -> ModelVariant {
        self.variant
    }

    async fn analyze(
        &self,
        _request: &AnalysisRequest,
        _metrics: &SatelliteMetrics,
    ) -> ValuationOpinion {
        ValuationOpinion::failed(self.name(), self.error.clone())
    }
}

/// Build one agent from configuration.
///
/// Provider construction failure yields a [`FailedAgent`] rather than an
/// error, so a missing credential surfaces inside that agent's opinion.
pub fn build_agent(variant: ModelVariant, config: &RuntimeConfig) -> Arc<dyn ValuationAgent> {
    let reasoning = match build_reasoning_provider(&config.reasoning) {
        Ok(provider) => provider,
        Err(e) => {
            tracing::warn!(agent = variant.agent_name(), error = %e, "agent disabled");
            return Arc::new(FailedAgent::new(variant, e.to_string()));
        }
    };

    match variant {
        ModelVariant::Appraiser => {
            // Market search is an enrichment: when it cannot be configured
            // the appraiser still runs on the satellite signal alone.
            let market = match build_search_provider(&config.search) {
                Ok(search) => Some(
                    MarketAggregator::new(search).with_max_results(config.search.max_results),
                ),
                Err(e) => {
                    tracing::warn!(error = %e, "market search unavailable");
                    None
                }
            };
            Arc::new(Appraiser::new(reasoning, market))
        }
        ModelVariant::Surveyor => Arc::new(Surveyor::new(reasoning)),
        ModelVariant::Assessor => Arc::new(Assessor::new(reasoning)),
    }
}

/// Build the full panel of agents.
pub fn build_agents(config: &RuntimeConfig) -> Vec<Arc<dyn ValuationAgent>> {
    ModelVariant::ALL
        .iter()
        .map(|variant| build_agent(*variant, config))
        .collect()
}
