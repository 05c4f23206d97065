//! Deterministic valuation models.
//!
//! Three independently parameterized pricing strategies, one per agent.
//! The coefficient tables intentionally disagree: the panel wants an
//! ensemble of differing heuristics, not one formula, so these tables are
//! never to be unified or deduplicated.
//!
//! Each strategy follows the same shape:
//! 1. a vegetation-tier base price per sqm selected by NDVI thresholds,
//! 2. an area discount factor stepping down as the parcel grows,
//! 3. a document-confidence factor capped at 1.0,
//! 4. `valuation = area * base_price * area_factor * doc_factor`, truncated,
//! 5. a confidence score penalized for clouds, sparse documents, and low
//!    vegetation, clamped to a per-strategy band.

use serde::{Deserialize, Serialize};

use crate::types::SatelliteMetrics;

/// The closed set of valuation strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelVariant {
    /// Market-blending generalist.
    Appraiser,
    /// Document-verification specialist.
    Surveyor,
    /// Conservative cross-check.
    Assessor,
}

impl ModelVariant {
    pub const ALL: [ModelVariant; 3] = [
        ModelVariant::Appraiser,
        ModelVariant::Surveyor,
        ModelVariant::Assessor,
    ];

    /// Stable agent identifier used in the opinion contract.
    pub fn agent_name(&self) -> &'static str {
        match self {
            ModelVariant::Appraiser => "appraiser",
            ModelVariant::Surveyor => "surveyor",
            ModelVariant::Assessor => "assessor",
        }
    }

    fn coefficients(&self) -> &'static Coefficients {
        match self {
            ModelVariant::Appraiser => &APPRAISER,
            ModelVariant::Surveyor => &SURVEYOR,
            ModelVariant::Assessor => &ASSESSOR,
        }
    }
}

impl std::str::FromStr for ModelVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "appraiser" => Ok(ModelVariant::Appraiser),
            "surveyor" => Ok(ModelVariant::Surveyor),
            "assessor" => Ok(ModelVariant::Assessor),
            other => Err(format!(
                "unknown agent '{}', expected one of: appraiser, surveyor, assessor",
                other
            )),
        }
    }
}

/// One strategy's constant table.
struct Coefficients {
    /// `(ndvi_above, price_per_sqm)` tiers, checked in order.
    ndvi_tiers: &'static [(f64, f64)],
    /// Price when no tier matches.
    floor_price: f64,
    /// `(area_below_sqm, factor)` tiers, checked in order.
    area_tiers: &'static [(f64, f64)],
    /// Factor for the largest parcels.
    floor_area_factor: f64,
    /// Document factor is `min(1.0, doc_base + doc_step * count)`.
    doc_base: f64,
    doc_step: f64,
    confidence_base: i32,
    cloud_above: f64,
    cloud_penalty: i32,
    doc_penalty: i32,
    ndvi_below: f64,
    ndvi_penalty: i32,
    confidence_min: i32,
    confidence_max: i32,
    /// Risk-factor labels: `[cloud, documentation, vegetation]`.
    risk_labels: [&'static str; 3],
    /// Vegetation quality labels by descending tier, used in canned prose.
    quality_labels: &'static [&'static str],
}

static APPRAISER: Coefficients = Coefficients {
    ndvi_tiers: &[(0.6, 2500.0), (0.4, 2200.0)],
    floor_price: 1800.0,
    area_tiers: &[(500.0, 1.0), (1000.0, 0.95)],
    floor_area_factor: 0.90,
    doc_base: 0.7,
    doc_step: 0.15,
    confidence_base: 85,
    cloud_above: 10.0,
    cloud_penalty: 5,
    doc_penalty: 10,
    ndvi_below: 0.3,
    ndvi_penalty: 5,
    confidence_min: 60,
    confidence_max: 95,
    risk_labels: [
        "Cloud coverage impact",
        "Limited documentation",
        "Low vegetation index",
    ],
    quality_labels: &["premium", "moderate", "standard"],
};

static SURVEYOR: Coefficients = Coefficients {
    ndvi_tiers: &[(0.65, 2700.0), (0.5, 2400.0), (0.3, 2000.0)],
    floor_price: 1700.0,
    area_tiers: &[(500.0, 1.0), (1000.0, 0.93)],
    floor_area_factor: 0.88,
    doc_base: 0.65,
    doc_step: 0.175,
    confidence_base: 82,
    cloud_above: 15.0,
    cloud_penalty: 8,
    doc_penalty: 12,
    ndvi_below: 0.25,
    ndvi_penalty: 7,
    confidence_min: 55,
    confidence_max: 95,
    risk_labels: [
        "High cloud coverage",
        "Insufficient documentation",
        "Poor vegetation health",
    ],
    quality_labels: &["excellent", "good", "moderate", "poor"],
};

static ASSESSOR: Coefficients = Coefficients {
    ndvi_tiers: &[(0.55, 2600.0), (0.35, 2100.0)],
    floor_price: 1900.0,
    area_tiers: &[(400.0, 1.0), (900.0, 0.94)],
    floor_area_factor: 0.90,
    doc_base: 0.75,
    doc_step: 0.12,
    confidence_base: 80,
    cloud_above: 12.0,
    cloud_penalty: 6,
    doc_penalty: 9,
    ndvi_below: 0.28,
    ndvi_penalty: 6,
    confidence_min: 58,
    confidence_max: 92,
    risk_labels: [
        "Reduced image quality",
        "Sparse documentation",
        "Weak vegetation signal",
    ],
    quality_labels: &["strong", "fair", "marginal"],
};

/// A strategy's deterministic output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Appraisal {
    /// Whole-currency valuation, truncated from the factor product.
    pub valuation: u64,
    /// Confidence in `[0, 100]`, clamped to the strategy's band.
    pub confidence: u8,
    pub base_price_per_sqm: f64,
    pub area_factor: f64,
    pub doc_factor: f64,
}

/// Run one strategy over satellite metrics and a document count.
///
/// Pure: same inputs always yield the same appraisal.
pub fn appraise(
    variant: ModelVariant,
    metrics: &SatelliteMetrics,
    document_count: usize,
) -> Appraisal {
    let c = variant.coefficients();

    let base_price = c
        .ndvi_tiers
        .iter()
        .find(|(threshold, _)| metrics.ndvi > *threshold)
        .map(|(_, price)| *price)
        .unwrap_or(c.floor_price);

    let area_factor = c
        .area_tiers
        .iter()
        .find(|(threshold, _)| metrics.area_sqm < *threshold)
        .map(|(_, factor)| *factor)
        .unwrap_or(c.floor_area_factor);

    let doc_factor = (c.doc_base + c.doc_step * document_count as f64).min(1.0);

    let valuation = (metrics.area_sqm * base_price * area_factor * doc_factor) as u64;

    let mut confidence = c.confidence_base;
    if metrics.cloud_coverage > c.cloud_above {
        confidence -= c.cloud_penalty;
    }
    if document_count < 2 {
        confidence -= c.doc_penalty;
    }
    if metrics.ndvi < c.ndvi_below {
        confidence -= c.ndvi_penalty;
    }
    let confidence = confidence.clamp(c.confidence_min, c.confidence_max) as u8;

    Appraisal {
        valuation,
        confidence,
        base_price_per_sqm: base_price,
        area_factor,
        doc_factor,
    }
}

/// Named risks for an opinion, built by explicit conditional appends so the
/// list never contains empty entries.
pub fn risk_factors(
    variant: ModelVariant,
    metrics: &SatelliteMetrics,
    document_count: usize,
) -> Vec<String> {
    let c = variant.coefficients();
    let mut risks = Vec::new();

    if metrics.cloud_coverage > c.cloud_above {
        risks.push(c.risk_labels[0].to_string());
    }
    if document_count < 2 {
        risks.push(c.risk_labels[1].to_string());
    }
    if metrics.ndvi < c.ndvi_below {
        risks.push(c.risk_labels[2].to_string());
    }

    risks
}

/// The strategy's vegetation-quality label for an NDVI reading.
pub fn quality_label(variant: ModelVariant, ndvi: f64) -> &'static str {
    let c = variant.coefficients();
    let tier = c
        .ndvi_tiers
        .iter()
        .position(|(threshold, _)| ndvi > *threshold)
        .unwrap_or(c.ndvi_tiers.len());
    c.quality_labels[tier.min(c.quality_labels.len() - 1)]
}
