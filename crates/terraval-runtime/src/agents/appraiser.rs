//! The appraiser: market-blending generalist.
//!
//! Pipeline: deterministic appraisal → comparable-price search → 60/40
//! blend → reasoning prose. The market signal annotates the opinion in
//! compact summary form.

use async_trait::async_trait;
use std::sync::Arc;

use terraval_core::{
    appraise, blend, risk_factors, AnalysisRequest, MarketSignal, ModelVariant, SatelliteMetrics,
    ValuationOpinion,
};

use super::{canned_reasoning, effective_document_count, ValuationAgent};
use crate::market::MarketAggregator;
use crate::prompts::{prose_prompt, APPRAISER_SYSTEM_PROMPT};
use crate::providers::{ReasoningProvider, ResponseFormat};

pub struct Appraiser {
    reasoning: Arc<dyn ReasoningProvider>,
    market: Option<MarketAggregator>,
}

impl Appraiser {
    pub fn new(reasoning: Arc<dyn ReasoningProvider>, market: Option<MarketAggregator>) -> Self {
        Self { reasoning, market }
    }
}

#[async_trait]
impl ValuationAgent for Appraiser {
    fn name(&self) -> &'static str {
        self.variant().agent_name()
    }

    fn variant(&self) -> ModelVariant {
        ModelVariant::Appraiser
    }

    async fn analyze(
        &self,
        request: &AnalysisRequest,
        metrics: &SatelliteMetrics,
    ) -> ValuationOpinion {
        let document_count = effective_document_count(request);
        let appraisal = appraise(self.variant(), metrics, document_count);

        let market_signal = match &self.market {
            Some(aggregator) => {
                aggregator
                    .fetch(
                        request.location.as_deref(),
                        request.latitude,
                        request.longitude,
                        metrics.area_sqm,
                    )
                    .await
            }
            None => MarketSignal::unavailable("market search not configured"),
        };

        let (valuation, confidence) = blend(&appraisal, &market_signal);
        let risks = risk_factors(self.variant(), metrics, document_count);

        let market_note = market_signal.has_data().then(|| {
            format!(
                "{} comparable prices, average ${}",
                market_signal.price_count, market_signal.average_price
            )
        });

        let prompt = prose_prompt(
            metrics,
            document_count,
            valuation,
            confidence,
            market_note.as_deref(),
        );

        let reasoning = match self
            .reasoning
            .complete(APPRAISER_SYSTEM_PROMPT, &prompt, ResponseFormat::FreeText)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(agent = self.name(), error = %e, "reasoning unavailable, using canned summary");
                canned_reasoning(self.variant(), metrics, document_count)
            }
        };

        ValuationOpinion {
            valuation,
            confidence,
            reasoning,
            risk_factors: risks,
            agent: self.name().to_string(),
            document_verification: None,
            market: Some(market_signal.summary()),
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{ProviderError, SearchHit, SearchProvider};

    struct MockReasoning {
        fail: bool,
    }

    #[async_trait]
    impl ReasoningProvider for MockReasoning {
        async fn complete(
            &self,
            _system: &str,
            _user: &str,
            _format: ResponseFormat,
        ) -> Result<String, ProviderError> {
            if self.fail {
                Err(ProviderError::HttpError("connection reset".to_string()))
            } else {
                Ok("The parcel's healthy vegetation supports a premium rate.".to_string())
            }
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    struct MockSearch {
        snippets: Vec<&'static str>,
    }

    #[async_trait]
    impl SearchProvider for MockSearch {
        async fn search(
            &self,
            _query: &str,
            _max_results: u8,
        ) -> Result<Vec<SearchHit>, ProviderError> {
            Ok(self
                .snippets
                .iter()
                .map(|s| SearchHit {
                    title: "Listing".to_string(),
                    snippet: s.to_string(),
                    link: "https://example.com".to_string(),
                    metadata: vec![],
                })
                .collect())
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    fn request() -> AnalysisRequest {
        AnalysisRequest {
            latitude: 13.08,
            longitude: 80.27,
            satellite_data: None,
            document_count: 3,
            document_contents: vec![],
            location: Some("Chennai".to_string()),
        }
    }

    fn metrics() -> SatelliteMetrics {
        SatelliteMetrics {
            area_sqm: 200.0,
            ndvi: 0.7,
            cloud_coverage: 5.0,
        }
    }

    #[tokio::test]
    async fn test_blends_market_with_satellite() {
        // Two comparables averaging $100,000 over 200 sqm -> market estimate
        // $100,000; satellite appraisal 500,000/85.
        let market = MarketAggregator::new(Arc::new(MockSearch {
            snippets: vec!["sold for $90,000", "asking $110,000"],
        }));
        let agent = Appraiser::new(Arc::new(MockReasoning { fail: false }), Some(market));

        let opinion = agent.analyze(&request(), &metrics()).await;

        assert_eq!(opinion.agent, "appraiser");
        assert_eq!(opinion.valuation, (100_000.0f64 * 0.6 + 500_000.0 * 0.4) as u64);
        assert_eq!(opinion.confidence, 95);

        let market = opinion.market.unwrap();
        assert!(market.has_data);
        assert_eq!(market.average_price, 100_000);
        assert_eq!(market.source_count, 2);
    }

    #[tokio::test]
    async fn test_no_market_passes_satellite_through() {
        let agent = Appraiser::new(Arc::new(MockReasoning { fail: false }), None);
        let opinion = agent.analyze(&request(), &metrics()).await;

        assert_eq!(opinion.valuation, 500_000);
        assert_eq!(opinion.confidence, 85);
        assert!(!opinion.market.unwrap().has_data);
    }

    #[tokio::test]
    async fn test_reasoning_failure_keeps_deterministic_result() {
        let agent = Appraiser::new(Arc::new(MockReasoning { fail: true }), None);
        let opinion = agent.analyze(&request(), &metrics()).await;

        // Valuation and confidence are untouched; only the prose degrades.
        assert_eq!(opinion.valuation, 500_000);
        assert_eq!(opinion.confidence, 85);
        assert!(opinion.reasoning.contains("premium land quality"));
        assert!(opinion.error.is_none());
    }

    #[tokio::test]
    async fn test_risk_factors_on_clean_input_are_empty() {
        let agent = Appraiser::new(Arc::new(MockReasoning { fail: false }), None);
        let opinion = agent.analyze(&request(), &metrics()).await;
        assert!(opinion.risk_factors.is_empty());
    }
}
