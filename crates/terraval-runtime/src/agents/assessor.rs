//! The assessor: conservative satellite-only cross-check.
//!
//! Pipeline: deterministic appraisal → reasoning prose. No market search,
//! no document verification; its value to the panel is an independent
//! coefficient set that disagrees on purpose.

use async_trait::async_trait;
use std::sync::Arc;

use terraval_core::{
    appraise, risk_factors, AnalysisRequest, ModelVariant, SatelliteMetrics, ValuationOpinion,
};

use super::{canned_reasoning, effective_document_count, ValuationAgent};
use crate::prompts::{prose_prompt, ASSESSOR_SYSTEM_PROMPT};
use crate::providers::{ReasoningProvider, ResponseFormat};

pub struct Assessor {
    reasoning: Arc<dyn ReasoningProvider>,
}

impl Assessor {
    pub fn new(reasoning: Arc<dyn ReasoningProvider>) -> Self {
        Self { reasoning }
    }
}

#[async_trait]
impl ValuationAgent for Assessor {
    fn name(&self) -> &'static str {
        self.variant().agent_name()
    }

    fn variant(&self) -> ModelVariant {
        ModelVariant::Assessor
    }

    async fn analyze(
        &self,
        request: &AnalysisRequest,
        metrics: &SatelliteMetrics,
    ) -> ValuationOpinion {
        let document_count = effective_document_count(request);
        let appraisal = appraise(self.variant(), metrics, document_count);
        let risks = risk_factors(self.variant(), metrics, document_count);

        let prompt = prose_prompt(
            metrics,
            document_count,
            appraisal.valuation,
            appraisal.confidence,
            None,
        );

        let reasoning = match self
            .reasoning
            .complete(ASSESSOR_SYSTEM_PROMPT, &prompt, ResponseFormat::FreeText)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(agent = self.name(), error = %e, "reasoning unavailable, using canned summary");
                canned_reasoning(self.variant(), metrics, document_count)
            }
        };

        ValuationOpinion {
            valuation: appraisal.valuation,
            confidence: appraisal.confidence,
            reasoning,
            risk_factors: risks,
            agent: self.name().to_string(),
            document_verification: None,
            market: None,
            error: None,
        }
    }
}
