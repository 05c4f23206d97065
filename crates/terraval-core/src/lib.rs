//! # terraval-core
//!
//! Deterministic land-valuation and document-screening engine.
//!
//! This crate turns heterogeneous, unreliable inputs — satellite metrics,
//! free-text search snippets, unstructured document text — into structured,
//! comparable valuation signals. It answers:
//! - What is this parcel worth, per strategy?
//! - Do the submitted documents hold up as land-title instruments?
//! - How much does the panel agree?
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: same input always produces same output
//! 2. **No network calls**: all provider I/O lives in `terraval-runtime`
//! 3. **Degradation over failure**: empty extraction results and low
//!    authenticity scores are normal outcomes, not errors
//! 4. **Immutable values**: nothing is mutated after construction —
//!    aggregation always produces a new derived value
//!
//! ## Example
//!
//! ```rust
//! use terraval_core::{appraise, blend, MarketSignal, ModelVariant, SatelliteMetrics};
//!
//! let metrics = SatelliteMetrics { area_sqm: 200.0, ndvi: 0.7, cloud_coverage: 5.0 };
//! let appraisal = appraise(ModelVariant::Appraiser, &metrics, 3);
//! assert_eq!(appraisal.valuation, 500_000);
//!
//! // Without market data the appraisal passes through unchanged.
//! let (valuation, confidence) = blend(&appraisal, &MarketSignal::unavailable("no comparables"));
//! assert_eq!((valuation, confidence), (appraisal.valuation, appraisal.confidence));
//! ```

pub mod blend;
pub mod consensus;
pub mod document;
pub mod extract;
pub mod market;
pub mod models;
pub mod schema;
pub mod types;

// Re-export main types at crate root
pub use blend::{blend, BLENDED_CONFIDENCE_CAP, MARKET_CONFIDENCE_BONUS, MARKET_WEIGHT, SATELLITE_WEIGHT};
pub use consensus::{consensus, ConsensusOutcome, ConsensusStatistics};
pub use document::{
    enforce_invariants, screen_document, screen_documents, ACCEPTANCE_THRESHOLD,
    RECOGNIZED_DEED_TYPES,
};
pub use extract::{extract_prices, MAX_PLAUSIBLE_PRICE, MIN_PLAUSIBLE_PRICE};
pub use market::{MarketSignal, PriceSource};
pub use models::{appraise, quality_label, risk_factors, Appraisal, ModelVariant};
pub use schema::{is_valid_request, validate_request, SchemaError};
pub use types::{
    AnalysisRequest, DocumentRecord, DocumentVerification, MarketSummary, SatelliteMetrics,
    ValuationOpinion,
};
