//! Market signal types and price statistics.
//!
//! The statistics here are pure functions over extracted price lists; the
//! query/search side lives in the runtime crate so this stays unit-testable
//! without a network.

use serde::{Deserialize, Serialize};

use crate::types::MarketSummary;

/// Confidence floor when any prices were found at all.
const BASE_CONFIDENCE: u32 = 50;

/// Confidence gained per extracted price.
const CONFIDENCE_PER_PRICE: u32 = 5;

/// Market confidence never exceeds this, however many prices turn up.
const MAX_CONFIDENCE: u32 = 90;

/// Area floor used for price-per-sqm derivation, preventing division
/// blow-up for tiny or zero measured areas.
pub const AREA_FLOOR_SQM: f64 = 100.0;

/// How many contributing sources are retained for explainability.
const MAX_SOURCES: usize = 5;

/// One search result that contributed at least one extracted price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSource {
    pub title: String,
    pub link: String,
    /// Prices extracted from this source's text.
    pub prices: Vec<f64>,
    /// Snippet truncated to 100 characters.
    pub snippet: String,
}

impl PriceSource {
    pub fn new(title: impl Into<String>, link: impl Into<String>, prices: Vec<f64>, snippet: &str) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            prices,
            snippet: snippet.chars().take(100).collect(),
        }
    }
}

/// Aggregated comparable-price signal for a location.
///
/// Invariant: when `error` is set, every numeric field is zero and callers
/// must fall back to satellite-only valuation. "No market signal" is a
/// normal degraded outcome, never a reason to retry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSignal {
    pub average_price: u64,
    pub median_price: u64,
    pub min_price: u64,
    pub max_price: u64,
    pub price_count: usize,
    pub confidence: u8,
    /// `price_per_sqm * area_sqm`, i.e. the market's opinion of this parcel.
    pub estimated_valuation: u64,
    pub price_per_sqm: u64,
    /// Up to five contributing sources, in discovery order.
    pub sources: Vec<PriceSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MarketSignal {
    /// The degraded signal returned when no usable prices were found.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            average_price: 0,
            median_price: 0,
            min_price: 0,
            max_price: 0,
            price_count: 0,
            confidence: 0,
            estimated_valuation: 0,
            price_per_sqm: 0,
            sources: Vec::new(),
            error: Some(reason.into()),
        }
    }

    /// Derive the full signal from extracted prices.
    ///
    /// `prices` must be non-empty; callers with an empty list use
    /// [`MarketSignal::unavailable`] instead. The median uses the lower
    /// middle of the sorted list for even counts. `price_per_sqm` divides
    /// the average by `max(area_sqm, 100)`.
    pub fn from_prices(prices: &[f64], mut sources: Vec<PriceSource>, area_sqm: f64) -> Self {
        debug_assert!(!prices.is_empty());

        let mut sorted: Vec<f64> = prices.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let sum: f64 = sorted.iter().sum();
        let average = sum / sorted.len() as f64;
        let median = sorted[sorted.len() / 2];
        let min = sorted[0];
        let max = sorted[sorted.len() - 1];

        let confidence =
            (BASE_CONFIDENCE + CONFIDENCE_PER_PRICE * sorted.len() as u32).min(MAX_CONFIDENCE);

        let price_per_sqm = average / area_sqm.max(AREA_FLOOR_SQM);
        let estimated_valuation = price_per_sqm * area_sqm;

        sources.truncate(MAX_SOURCES);

        Self {
            average_price: average as u64,
            median_price: median as u64,
            min_price: min as u64,
            max_price: max as u64,
            price_count: sorted.len(),
            confidence: confidence as u8,
            estimated_valuation: estimated_valuation as u64,
            price_per_sqm: price_per_sqm as u64,
            sources,
            error: None,
        }
    }

    pub fn has_data(&self) -> bool {
        self.error.is_none() && self.price_count > 0
    }

    /// The compact annotation attached to an opinion.
    pub fn summary(&self) -> MarketSummary {
        MarketSummary {
            has_data: self.has_data(),
            average_price: self.average_price,
            source_count: self.sources.len(),
        }
    }
}
