//! Price extraction from noisy listing text.
//!
//! Search snippets mix prices with phone numbers, plot sizes, and listing
//! ids. Extraction applies an ordered set of pattern/multiplier rules, then
//! a plausibility band, then a decile trim, and returns whatever survives.
//! An empty result is a normal outcome, not an error.
//!
//! Values are pooled without currency conversion: ₹, £, € and $ amounts all
//! land in the same list. Downstream confidence scoring assumes this scale,
//! so callers must not re-normalize.

use lazy_static::lazy_static;
use regex::Regex;

/// Lower bound of the plausibility band. Anything below is assumed to be
/// noise (listing ids, counts) rather than a property price.
pub const MIN_PLAUSIBLE_PRICE: f64 = 1_000.0;

/// Upper bound of the plausibility band.
pub const MAX_PLAUSIBLE_PRICE: f64 = 500_000_000.0;

lazy_static! {
    /// Ordered pattern/multiplier rules. Group 1 is always the numeric part.
    static ref PRICE_RULES: Vec<(Regex, f64)> = vec![
        // $1,234,567.89
        (
            Regex::new(r"\$\s*(\d{1,3}(?:,\d{3})+(?:\.\d{2})?)").unwrap(),
            1.0,
        ),
        // 1,234,567 USD / dollars
        (
            Regex::new(r"(?i)(\d{1,3}(?:,\d{3})+)\s*(?:usd|dollars?)").unwrap(),
            1.0,
        ),
        // ₹12,34,567
        (Regex::new(r"₹\s*(\d{1,3}(?:,\d{3})+)").unwrap(), 1.0),
        // Rs 12,34,567 / INR 12,34,567
        (
            Regex::new(r"(?i)(?:rs\.?|inr)\s*(\d{1,3}(?:,\d{3})+)").unwrap(),
            1.0,
        ),
        // 1.5 Crore
        (
            Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*crores?").unwrap(),
            10_000_000.0,
        ),
        // 1.5 Cr (word-bounded so it does not double-count "Crore")
        (
            Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*cr\b\.?").unwrap(),
            10_000_000.0,
        ),
        // 50 Lakh / 50 lac
        (
            Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:lakhs?|lacs?)").unwrap(),
            100_000.0,
        ),
        // 5,000 per sq ft
        (
            Regex::new(r"(?i)(\d{1,3}(?:,\d{3})+)\s*per\s*(?:sq|square)").unwrap(),
            1.0,
        ),
        // £567,890
        (Regex::new(r"£\s*(\d{1,3}(?:,\d{3})+)").unwrap(), 1.0),
        // €890,123
        (Regex::new(r"€\s*(\d{1,3}(?:,\d{3})+)").unwrap(), 1.0),
    ];
}

/// Extract plausible price values from free text.
///
/// Pure and idempotent: identical input always yields identical output.
/// Returns candidates in rule order, trimmed of the outermost decile on
/// each end once more than two candidates remain.
pub fn extract_prices(text: &str) -> Vec<f64> {
    let mut prices = Vec::new();

    for (pattern, multiplier) in PRICE_RULES.iter() {
        for captures in pattern.captures_iter(text) {
            let raw = match captures.get(1) {
                Some(m) => m.as_str(),
                None => continue,
            };

            let value: f64 = match raw.replace(',', "").parse() {
                Ok(v) => v,
                Err(_) => continue,
            };

            let price = value * multiplier;
            if (MIN_PLAUSIBLE_PRICE..=MAX_PLAUSIBLE_PRICE).contains(&price) {
                prices.push(price);
            }
        }
    }

    trim_outliers(prices)
}

/// Drop the lowest and highest decile once more than two candidates exist.
///
/// The trim count is at least one per end, so a single wildly mis-extracted
/// number never dominates a small sample.
fn trim_outliers(mut prices: Vec<f64>) -> Vec<f64> {
    if prices.len() <= 2 {
        return prices;
    }

    prices.sort_by(|a, b| a.total_cmp(b));
    let trim = (prices.len() / 10).max(1);
    prices[trim..prices.len() - trim].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dollar_amount_with_separators() {
        let prices = extract_prices("$1,234,567.89 for this plot");
        assert!(prices.contains(&1_234_567.89));
    }

    #[test]
    fn test_crore_multiplier() {
        let prices = extract_prices("1.5 Crore");
        assert_eq!(prices, vec![15_000_000.0]);
    }

    #[test]
    fn test_cr_abbreviation() {
        let prices = extract_prices("asking 2.5 Cr. negotiable");
        assert_eq!(prices, vec![25_000_000.0]);
    }

    #[test]
    fn test_lakh_multiplier() {
        let prices = extract_prices("plots from 50 Lakh onwards");
        assert_eq!(prices, vec![5_000_000.0]);
    }

    #[test]
    fn test_rupee_symbol_and_rs_prefix() {
        let prices = extract_prices("₹1,234,567 or Rs 4,500,000");
        assert_eq!(prices, vec![1_234_567.0, 4_500_000.0]);
    }

    #[test]
    fn test_below_plausibility_floor_is_dropped() {
        assert!(extract_prices("only $50").is_empty());
    }

    #[test]
    fn test_above_plausibility_ceiling_is_dropped() {
        assert!(extract_prices("600,000,000 USD").is_empty());
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        assert!(extract_prices("call 555-123-4567 for details").is_empty());
    }

    #[test]
    fn test_trim_excludes_min_and_max_of_five() {
        let text = "$10,000 then $11,000 then $12,000 then $13,000 then $450,000,000";
        let prices = extract_prices(text);
        assert_eq!(prices, vec![11_000.0, 12_000.0, 13_000.0]);
    }

    #[test]
    fn test_two_candidates_are_not_trimmed() {
        let prices = extract_prices("$10,000 or $90,000");
        assert_eq!(prices.len(), 2);
    }

    #[test]
    fn test_per_square_amount() {
        let prices = extract_prices("5,000 per sq ft in this area");
        assert_eq!(prices, vec![5_000.0]);
    }

    #[test]
    fn test_pound_and_euro() {
        let prices = extract_prices("£567,890 or €890,123");
        assert_eq!(prices, vec![567_890.0, 890_123.0]);
    }

    #[test]
    fn test_idempotent() {
        let text = "plots at $12,000 and 1.5 crore near the lake";
        assert_eq!(extract_prices(text), extract_prices(text));
    }

    proptest::proptest! {
        #[test]
        fn prop_never_panics(text in ".{0,400}") {
            let _ = extract_prices(&text);
        }

        #[test]
        fn prop_idempotent(text in ".{0,400}") {
            proptest::prop_assert_eq!(extract_prices(&text), extract_prices(&text));
        }

        #[test]
        fn prop_all_within_band(text in ".{0,400}") {
            for price in extract_prices(&text) {
                proptest::prop_assert!((MIN_PLAUSIBLE_PRICE..=MAX_PLAUSIBLE_PRICE).contains(&price));
            }
        }
    }
}
