//! Shared contract types for terraval.
//!
//! Every valuation agent, whatever reasoning backend it uses, emits exactly
//! one [`ValuationOpinion`]. Downstream consumers rely on that uniformity to
//! compare and aggregate opinions without per-agent parsing.

use serde::{Deserialize, Serialize};

/// Remote-sensing measurements for a parcel.
///
/// Produced by an external measurement provider and treated as immutable
/// once fetched. All valuation models consume it read-only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SatelliteMetrics {
    /// Measured parcel area in square meters. Non-negative.
    pub area_sqm: f64,

    /// Normalized Difference Vegetation Index, in `[-1, 1]`.
    pub ndvi: f64,

    /// Cloud coverage percentage of the source imagery, in `[0, 100]`.
    pub cloud_coverage: f64,
}

/// One submitted document. Untrusted, potentially adversarial input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Full extracted text of the document.
    pub raw_text: String,

    /// Character count of `raw_text`, kept for diagnostics.
    pub char_count: usize,
}

impl DocumentRecord {
    pub fn new(raw_text: impl Into<String>) -> Self {
        let raw_text = raw_text.into();
        let char_count = raw_text.chars().count();
        Self {
            raw_text,
            char_count,
        }
    }

    /// First ~100 characters, for diagnostic logging only.
    pub fn preview(&self) -> String {
        self.raw_text.chars().take(100).collect()
    }
}

impl From<String> for DocumentRecord {
    fn from(raw_text: String) -> Self {
        Self::new(raw_text)
    }
}

/// The single JSON object every agent accepts.
///
/// Validated against `spec/request.schema.json` before any agent runs;
/// see [`crate::schema::validate_request`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub latitude: f64,
    pub longitude: f64,

    /// Pre-fetched satellite metrics. When absent, the caller must obtain
    /// them from a measurement provider before invoking agents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub satellite_data: Option<SatelliteMetrics>,

    #[serde(default)]
    pub document_count: usize,

    /// Full text of each submitted document, in submission order.
    #[serde(default)]
    pub document_contents: Vec<String>,

    /// Free-text location description used for comparable-price search.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl AnalysisRequest {
    pub fn documents(&self) -> Vec<DocumentRecord> {
        self.document_contents
            .iter()
            .cloned()
            .map(DocumentRecord::new)
            .collect()
    }
}

/// Structured verdict on a single submitted document.
///
/// Invariants (enforced by [`crate::document::enforce_invariants`]):
/// - `authenticity_score <= 40` whenever `is_land_document` is false or any
///   mandatory field is missing;
/// - `authenticity_score == 0` when placeholder markers were detected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentVerification {
    pub is_land_document: bool,

    /// What the document appears to be ("Sale Deed", "invoice", ...).
    pub document_type_found: String,

    /// How well the document matches the land-title schema, `[0, 100]`.
    pub authenticity_score: u8,

    /// Mandatory fields that could not be located, in check order.
    #[serde(default)]
    pub missing_fields: Vec<String>,

    /// Disqualifying or advisory findings, in detection order.
    #[serde(default)]
    pub red_flags: Vec<String>,
}

/// Compact market annotation attached to an opinion.
///
/// Deliberately omits the full source list so the opinion contract stays
/// small; explainability sources live on the full market signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSummary {
    pub has_data: bool,
    pub average_price: u64,
    pub source_count: usize,
}

/// The canonical output unit: one agent's valuation opinion.
///
/// Agents never propagate errors to their caller. A failed agent still
/// returns a well-formed opinion with `error` set and numeric fields zeroed,
/// so total failure of one agent never blocks aggregation of the others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationOpinion {
    /// Estimated parcel value in whole currency units. Zero when rejecting
    /// or when the agent failed.
    pub valuation: u64,

    /// Confidence in the valuation, `[0, 100]`.
    pub confidence: u8,

    /// Free-text justification. Falls back to a canned summary when the
    /// reasoning provider is unavailable.
    pub reasoning: String,

    /// Named risks, built by explicit conditional appends; never contains
    /// empty entries.
    #[serde(default)]
    pub risk_factors: Vec<String>,

    /// Stable agent identifier ("appraiser", "surveyor", "assessor").
    pub agent: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_verification: Option<DocumentVerification>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market: Option<MarketSummary>,

    /// Set when the agent could not produce a real opinion (missing
    /// credentials, provider failure before any deterministic result).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValuationOpinion {
    /// A well-formed opinion representing total agent failure.
    pub fn failed(agent: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            valuation: 0,
            confidence: 0,
            reasoning: String::new(),
            risk_factors: Vec::new(),
            agent: agent.into(),
            document_verification: None,
            market: None,
            error: Some(error.into()),
        }
    }

    /// Whether this opinion carries a usable valuation.
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_record_counts_chars() {
        let doc = DocumentRecord::new("héllo");
        assert_eq!(doc.char_count, 5);
    }

    #[test]
    fn test_request_defaults() {
        let request: AnalysisRequest =
            serde_json::from_str(r#"{"latitude": 13.08, "longitude": 80.27}"#).unwrap();
        assert_eq!(request.document_count, 0);
        assert!(request.document_contents.is_empty());
        assert!(request.satellite_data.is_none());
        assert!(request.location.is_none());
    }

    #[test]
    fn test_request_roundtrip() {
        let request = AnalysisRequest {
            latitude: 13.0827,
            longitude: 80.2707,
            satellite_data: Some(SatelliteMetrics {
                area_sqm: 200.0,
                ndvi: 0.7,
                cloud_coverage: 5.0,
            }),
            document_count: 1,
            document_contents: vec!["SALE DEED".to_string()],
            location: Some("Chennai, India".to_string()),
        };

        let json = serde_json::to_string(&request).unwrap();
        let parsed: AnalysisRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, request);
    }

    #[test]
    fn test_failed_opinion_is_well_formed() {
        let opinion = ValuationOpinion::failed("appraiser", "OPENROUTER_API_KEY not configured");
        assert_eq!(opinion.valuation, 0);
        assert_eq!(opinion.confidence, 0);
        assert!(!opinion.is_valid());

        // Must survive serialization as the standard contract shape.
        let json = serde_json::to_value(&opinion).unwrap();
        assert_eq!(json["agent"], "appraiser");
        assert!(json["error"].as_str().unwrap().contains("OPENROUTER"));
    }
}
