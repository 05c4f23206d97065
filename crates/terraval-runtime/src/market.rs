//! Comparable-price aggregation over a search provider.
//!
//! Tries up to two query phrasings and stops at the first that yields any
//! extractable price — a deliberate cost/latency trade-off against
//! exhaustiveness. Provider errors are logged and treated as "try the next
//! query"; running out of queries degrades to an error-tagged signal, never
//! to a propagated failure.

use std::sync::Arc;

use terraval_core::{extract_prices, MarketSignal, PriceSource};

use crate::providers::SearchProvider;

/// Results fetched per query when not configured otherwise.
const DEFAULT_MAX_RESULTS: u8 = 10;

pub struct MarketAggregator {
    search: Arc<dyn SearchProvider>,
    max_results: u8,
}

impl MarketAggregator {
    pub fn new(search: Arc<dyn SearchProvider>) -> Self {
        Self {
            search,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    pub fn with_max_results(mut self, max_results: u8) -> Self {
        self.max_results = max_results;
        self
    }

    /// Alternative query phrasings, most specific first.
    fn queries(location: Option<&str>, latitude: f64, longitude: f64) -> Vec<String> {
        let mut queries = Vec::new();
        if let Some(location) = location.filter(|l| !l.trim().is_empty()) {
            queries.push(format!("property for sale price {}", location));
        }
        queries.push(format!("real estate price {},{}", latitude, longitude));
        queries
    }

    /// Search comparable listings and derive a market signal.
    ///
    /// Never fails: total failure across all queries returns a signal with
    /// `error` set, which callers must treat as "no market signal".
    pub async fn fetch(
        &self,
        location: Option<&str>,
        latitude: f64,
        longitude: f64,
        area_sqm: f64,
    ) -> MarketSignal {
        let mut all_prices: Vec<f64> = Vec::new();
        let mut sources: Vec<PriceSource> = Vec::new();

        for query in Self::queries(location, latitude, longitude) {
            let hits = match self.search.search(&query, self.max_results).await {
                Ok(hits) => hits,
                Err(e) => {
                    tracing::warn!(query = %query, error = %e, "search query failed, trying next");
                    continue;
                }
            };

            tracing::debug!(query = %query, hits = hits.len(), "search results received");

            for hit in &hits {
                let prices = extract_prices(&hit.combined_text());
                if prices.is_empty() {
                    continue;
                }

                tracing::debug!(
                    title = %hit.title,
                    count = prices.len(),
                    "prices extracted from search hit"
                );
                sources.push(PriceSource::new(
                    hit.title.clone(),
                    hit.link.clone(),
                    prices.clone(),
                    &hit.snippet,
                ));
                all_prices.extend(prices);
            }

            // First query with candidates wins; skip the rest.
            if !all_prices.is_empty() {
                break;
            }
        }

        if all_prices.is_empty() {
            return MarketSignal::unavailable(
                "no extractable prices found in search results; using satellite-only valuation",
            );
        }

        MarketSignal::from_prices(&all_prices, sources, area_sqm)
    }
}
