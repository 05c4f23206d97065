//! Deterministic fan-in over agent opinions.
//!
//! Aggregation applies fixed arithmetic, never judgment: a
//! confidence-weighted mean valuation, the population standard deviation,
//! and a consensus score derived from the coefficient of variation. No
//! reasoning call is ever made here.

use serde::{Deserialize, Serialize};

use crate::types::ValuationOpinion;

/// Consensus scores below this knock a penalty off the final confidence.
const LOW_CONSENSUS_THRESHOLD: u8 = 60;

/// Confidence penalty applied when the panel visibly disagrees.
const LOW_CONSENSUS_PENALTY: u8 = 10;

/// Spread statistics over the valid opinions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusStatistics {
    pub mean_valuation: f64,
    pub standard_deviation: f64,
    pub min_valuation: u64,
    pub max_valuation: u64,
    pub opinion_count: usize,
}

/// The panel's aggregate verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusOutcome {
    /// Confidence-weighted mean of the valid valuations.
    pub final_valuation: u64,
    pub final_confidence: u8,
    /// Agreement measure in `[0, 100]`: 100 means identical valuations.
    pub consensus_score: u8,
    pub statistics: ConsensusStatistics,
}

/// Aggregate the valid opinions into a consensus.
///
/// Opinions with `error` set are skipped. Returns `None` when no valid
/// opinion remains — the caller decides whether that is fatal.
pub fn consensus(opinions: &[ValuationOpinion]) -> Option<ConsensusOutcome> {
    let valid: Vec<&ValuationOpinion> = opinions.iter().filter(|o| o.is_valid()).collect();
    if valid.is_empty() {
        return None;
    }

    let count = valid.len() as f64;
    let mean = valid.iter().map(|o| o.valuation as f64).sum::<f64>() / count;

    let variance = valid
        .iter()
        .map(|o| {
            let d = o.valuation as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / count;
    let standard_deviation = variance.sqrt();

    // Coefficient of variation drives the agreement score; a zero mean
    // (every agent rejected) counts as full agreement on zero.
    let consensus_score = if mean > 0.0 {
        let cv = standard_deviation / mean;
        (100.0 - (cv * 100.0).min(100.0)).round() as u8
    } else {
        100
    };

    let weight_sum: f64 = valid.iter().map(|o| o.confidence as f64).sum();
    let final_valuation = if weight_sum > 0.0 {
        valid
            .iter()
            .map(|o| o.valuation as f64 * o.confidence as f64)
            .sum::<f64>()
            / weight_sum
    } else {
        mean
    };

    let mean_confidence =
        (valid.iter().map(|o| o.confidence as u32).sum::<u32>() as f64 / count).round() as u8;
    let final_confidence = if consensus_score < LOW_CONSENSUS_THRESHOLD {
        mean_confidence.saturating_sub(LOW_CONSENSUS_PENALTY)
    } else {
        mean_confidence
    };

    Some(ConsensusOutcome {
        final_valuation: final_valuation.round() as u64,
        final_confidence,
        consensus_score,
        statistics: ConsensusStatistics {
            mean_valuation: mean,
            standard_deviation,
            min_valuation: valid.iter().map(|o| o.valuation).min().unwrap_or(0),
            max_valuation: valid.iter().map(|o| o.valuation).max().unwrap_or(0),
            opinion_count: valid.len(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opinion(agent: &str, valuation: u64, confidence: u8) -> ValuationOpinion {
        ValuationOpinion {
            valuation,
            confidence,
            reasoning: String::new(),
            risk_factors: vec![],
            agent: agent.to_string(),
            document_verification: None,
            market: None,
            error: None,
        }
    }

    #[test]
    fn test_identical_opinions_agree_fully() {
        let opinions = vec![
            opinion("appraiser", 500_000, 85),
            opinion("surveyor", 500_000, 82),
            opinion("assessor", 500_000, 80),
        ];
        let outcome = consensus(&opinions).unwrap();

        assert_eq!(outcome.final_valuation, 500_000);
        assert_eq!(outcome.consensus_score, 100);
        assert_eq!(outcome.statistics.standard_deviation, 0.0);
        // Mean of 85, 82, 80, rounded.
        assert_eq!(outcome.final_confidence, 82);
    }

    #[test]
    fn test_weighted_mean_favors_confident_agents() {
        let opinions = vec![
            opinion("appraiser", 400_000, 90),
            opinion("surveyor", 600_000, 60),
        ];
        let outcome = consensus(&opinions).unwrap();

        // (400000*90 + 600000*60) / 150 = 480000 — pulled toward the
        // more confident agent.
        assert_eq!(outcome.final_valuation, 480_000);
        assert!(outcome.final_valuation < 500_000);
    }

    #[test]
    fn test_disagreement_lowers_consensus_and_confidence() {
        let opinions = vec![
            opinion("appraiser", 100_000, 80),
            opinion("surveyor", 500_000, 80),
        ];
        let outcome = consensus(&opinions).unwrap();

        // mean 300000, stddev 200000, cv 0.667 -> score 33.
        assert_eq!(outcome.consensus_score, 33);
        assert_eq!(outcome.final_confidence, 70);
    }

    #[test]
    fn test_error_opinions_are_skipped() {
        let opinions = vec![
            opinion("appraiser", 500_000, 85),
            ValuationOpinion::failed("surveyor", "provider unavailable"),
        ];
        let outcome = consensus(&opinions).unwrap();
        assert_eq!(outcome.statistics.opinion_count, 1);
        assert_eq!(outcome.final_valuation, 500_000);
    }

    #[test]
    fn test_all_failed_is_none() {
        let opinions = vec![
            ValuationOpinion::failed("appraiser", "x"),
            ValuationOpinion::failed("surveyor", "y"),
        ];
        assert!(consensus(&opinions).is_none());
    }

    #[test]
    fn test_all_rejections_agree_on_zero() {
        let opinions = vec![opinion("appraiser", 0, 20), opinion("surveyor", 0, 25)];
        let outcome = consensus(&opinions).unwrap();
        assert_eq!(outcome.final_valuation, 0);
        assert_eq!(outcome.consensus_score, 100);
    }
}
