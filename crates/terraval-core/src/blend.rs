//! Market/satellite valuation blending.
//!
//! The weights and the confidence bonus are fixed policy constants, not
//! derived values and not tuning knobs. When no market signal exists the
//! satellite-based appraisal passes through unchanged.

use crate::market::MarketSignal;
use crate::models::Appraisal;

/// Weight of the market-derived valuation in the blend.
pub const MARKET_WEIGHT: f64 = 0.6;

/// Weight of the satellite-derived valuation in the blend.
pub const SATELLITE_WEIGHT: f64 = 0.4;

/// Confidence bonus applied when market data corroborates the appraisal.
pub const MARKET_CONFIDENCE_BONUS: u8 = 10;

/// Blended confidence never exceeds this.
pub const BLENDED_CONFIDENCE_CAP: u8 = 95;

/// Blend a satellite appraisal with a market signal.
///
/// Returns `(valuation, confidence)`. A signal with `error` set (or with no
/// prices) leaves the appraisal untouched.
pub fn blend(appraisal: &Appraisal, market: &MarketSignal) -> (u64, u8) {
    if !market.has_data() {
        return (appraisal.valuation, appraisal.confidence);
    }

    let valuation = (market.estimated_valuation as f64 * MARKET_WEIGHT
        + appraisal.valuation as f64 * SATELLITE_WEIGHT)
        .round() as u64;

    let confidence =
        (appraisal.confidence.saturating_add(MARKET_CONFIDENCE_BONUS)).min(BLENDED_CONFIDENCE_CAP);

    (valuation, confidence)
}
