//! The surveyor: document-verification specialist.
//!
//! Pipeline: deterministic appraisal → structured verification call over
//! the full document texts → invariant enforcement on the returned record.
//! When the reasoning provider fails (or returns unparseable JSON) the
//! local rule-based screener produces the verdict instead, so a document
//! never goes unverified just because a model was down.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use terraval_core::{
    appraise, enforce_invariants, risk_factors, screen_documents, AnalysisRequest,
    DocumentVerification, ModelVariant, SatelliteMetrics, ValuationOpinion, ACCEPTANCE_THRESHOLD,
};

use super::{canned_reasoning, effective_document_count, ValuationAgent};
use crate::prompts::{prose_prompt, verification_prompt, SURVEYOR_SYSTEM_PROMPT};
use crate::providers::{ReasoningProvider, ResponseFormat};

pub struct Surveyor {
    reasoning: Arc<dyn ReasoningProvider>,
}

impl Surveyor {
    pub fn new(reasoning: Arc<dyn ReasoningProvider>) -> Self {
        Self { reasoning }
    }
}

/// The JSON object the verification call must return.
#[derive(Debug, Deserialize)]
struct VerificationVerdict {
    #[serde(default)]
    reasoning: String,
    document_verification: DocumentVerification,
}

fn parse_verdict(text: &str) -> Result<VerificationVerdict, serde_json::Error> {
    serde_json::from_str(text)
}

#[async_trait]
impl ValuationAgent for Surveyor {
    fn name(&self) -> &'static str {
        self.variant().agent_name()
    }

    fn variant(&self) -> ModelVariant {
        ModelVariant::Surveyor
    }

    async fn analyze(
        &self,
        request: &AnalysisRequest,
        metrics: &SatelliteMetrics,
    ) -> ValuationOpinion {
        let documents = request.documents();
        let document_count = effective_document_count(request);

        for (index, document) in documents.iter().enumerate() {
            tracing::debug!(
                agent = self.name(),
                document = index + 1,
                chars = document.char_count,
                preview = %document.preview(),
                "document received"
            );
        }

        let appraisal = appraise(self.variant(), metrics, document_count);
        let mut risks = risk_factors(self.variant(), metrics, document_count);

        let (reasoning, verification) = if documents.is_empty() {
            // Nothing to verify: prose-only reasoning over the appraisal.
            let prompt = prose_prompt(
                metrics,
                document_count,
                appraisal.valuation,
                appraisal.confidence,
                None,
            );
            let text = match self
                .reasoning
                .complete(SURVEYOR_SYSTEM_PROMPT, &prompt, ResponseFormat::FreeText)
                .await
            {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(agent = self.name(), error = %e, "reasoning unavailable");
                    canned_reasoning(self.variant(), metrics, document_count)
                }
            };
            (text, None)
        } else {
            let prompt = verification_prompt(metrics, &documents, &appraisal);
            match self
                .reasoning
                .complete(SURVEYOR_SYSTEM_PROMPT, &prompt, ResponseFormat::JsonObject)
                .await
            {
                Ok(text) => match parse_verdict(&text) {
                    Ok(verdict) => (
                        verdict.reasoning,
                        Some(enforce_invariants(verdict.document_verification)),
                    ),
                    Err(e) => {
                        tracing::warn!(agent = self.name(), error = %e, "unparseable verdict, screening locally");
                        self.local_fallback(request, metrics, document_count)
                    }
                },
                Err(e) => {
                    tracing::warn!(agent = self.name(), error = %e, "reasoning unavailable, screening locally");
                    self.local_fallback(request, metrics, document_count)
                }
            }
        };

        if let Some(verification) = &verification {
            if verification.authenticity_score <= ACCEPTANCE_THRESHOLD {
                risks.push("Document authenticity rejected".to_string());
            }
        }

        ValuationOpinion {
            valuation: appraisal.valuation,
            confidence: appraisal.confidence,
            reasoning,
            risk_factors: risks,
            agent: self.name().to_string(),
            document_verification: verification,
            market: None,
            error: None,
        }
    }
}

impl Surveyor {
    /// Deterministic stand-in for the reasoning call: canned prose plus the
    /// rule-based screen of the weakest submitted document.
    fn local_fallback(
        &self,
        request: &AnalysisRequest,
        metrics: &SatelliteMetrics,
        document_count: usize,
    ) -> (String, Option<DocumentVerification>) {
        (
            canned_reasoning(self.variant(), metrics, document_count),
            screen_documents(&request.document_contents, Some(metrics.area_sqm)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ProviderError;

    enum MockBehavior {
        Respond(&'static str),
        Fail,
    }

    struct MockReasoning {
        behavior: MockBehavior,
    }

    #[async_trait]
    impl ReasoningProvider for MockReasoning {
        async fn complete(
            &self,
            _system: &str,
            _user: &str,
            _format: ResponseFormat,
        ) -> Result<String, ProviderError> {
            match &self.behavior {
                MockBehavior::Respond(text) => Ok(text.to_string()),
                MockBehavior::Fail => Err(ProviderError::Timeout(std::time::Duration::from_secs(10))),
            }
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    const DEED: &str = "\
SALE DEED executed 12 March 2021. Survey No. 142/3, Plot No. 17.
Name of the Owner: Rajesh Kumar. Address of the Owner: 12 Lake View Road, Chennai.
Property Location: located at Velachery, Chennai. Total Area: 200 sq. m.
Bounded on the north by the access road, on the east by Plot No. 18.
This Deed of Sale hereby transfers the property. Registered with the
Sub-Registrar, Chennai South, Document No. 4821/2021.";

    fn request_with_documents() -> AnalysisRequest {
        AnalysisRequest {
            latitude: 13.08,
            longitude: 80.27,
            satellite_data: None,
            document_count: 1,
            document_contents: vec![DEED.to_string()],
            location: None,
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
    async fn test_structured_verdict_is_used() {
        let verdict = r#"{
            "reasoning": "All mandatory fields present; document accepted.",
            "document_verification": {
                "is_land_document": true,
                "document_type_found": "Sale Deed",
                "authenticity_score": 88,
                "missing_fields": [],
                "red_flags": []
            }
        }"#;
        let agent = Surveyor::new(Arc::new(MockReasoning {
            behavior: MockBehavior::Respond(verdict),
        }));

        let opinion = agent.analyze(&request_with_documents(), &metrics()).await;

        let verification = opinion.document_verification.unwrap();
        assert!(verification.is_land_document);
        assert_eq!(verification.authenticity_score, 88);
        assert!(opinion.reasoning.contains("accepted"));
    }

    #[tokio::test]
    async fn test_generous_verdict_is_clamped() {
        // The model claims a high score while reporting a missing field:
        // invariant enforcement caps it at the missing-fields band.
        let verdict = r#"{
            "reasoning": "Mostly complete.",
            "document_verification": {
                "is_land_document": true,
                "document_type_found": "Sale Deed",
                "authenticity_score": 85,
                "missing_fields": ["owner address"],
                "red_flags": []
            }
        }"#;
        let agent = Surveyor::new(Arc::new(MockReasoning {
            behavior: MockBehavior::Respond(verdict),
        }));

        let opinion = agent.analyze(&request_with_documents(), &metrics()).await;

        let verification = opinion.document_verification.unwrap();
        assert!(verification.authenticity_score <= 30);
        assert!(opinion
            .risk_factors
            .contains(&"Document authenticity rejected".to_string()));
    }

    #[tokio::test]
    async fn test_provider_failure_screens_locally() {
        let agent = Surveyor::new(Arc::new(MockReasoning {
            behavior: MockBehavior::Fail,
        }));

        let opinion = agent.analyze(&request_with_documents(), &metrics()).await;

        // Deterministic result is unchanged by the failure.
        let expected = appraise(ModelVariant::Surveyor, &metrics(), 1);
        assert_eq!(opinion.valuation, expected.valuation);
        assert_eq!(opinion.confidence, expected.confidence);
        assert!(opinion.error.is_none());

        // The local screener accepted the complete deed.
        let verification = opinion.document_verification.unwrap();
        assert!(verification.is_land_document);
        assert!(verification.authenticity_score > ACCEPTANCE_THRESHOLD);
        assert!(opinion.reasoning.contains("land quality"));
    }

    #[tokio::test]
    async fn test_unparseable_verdict_screens_locally() {
        let agent = Surveyor::new(Arc::new(MockReasoning {
            behavior: MockBehavior::Respond("I think the document looks fine."),
        }));

        let opinion = agent.analyze(&request_with_documents(), &metrics()).await;
        assert!(opinion.document_verification.is_some());
        assert!(opinion.error.is_none());
    }

    #[tokio::test]
    async fn test_no_documents_means_no_verification() {
        let agent = Surveyor::new(Arc::new(MockReasoning {
            behavior: MockBehavior::Respond("A well-sized parcel with healthy vegetation."),
        }));

        let mut request = request_with_documents();
        request.document_contents.clear();
        request.document_count = 0;

        let opinion = agent.analyze(&request, &metrics()).await;
        assert!(opinion.document_verification.is_none());
        assert!(opinion.reasoning.contains("parcel"));
    }
}
