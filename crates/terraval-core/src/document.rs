//! Land-document screening rules.
//!
//! One rule set, two consumers: the reasoning-provider prompt states these
//! rules in prose, and this module applies them deterministically. The local
//! screener serves as the fallback verdict when the reasoning provider is
//! unavailable, and [`enforce_invariants`] clamps any provider-returned
//! verification so a hallucinated score can never bypass the rejection
//! semantics.
//!
//! Screening is a staged check per document:
//! 1. **Type check** — the document must be a recognized land-title
//!    instrument; anything else is rejected outright with score 0.
//! 2. **Field check** — all mandatory fields must be present; missing
//!    fields cap the score at 30.
//! 3. **Content integrity** — placeholder tokens zero the score; signs of
//!    incompleteness cap it at 20.
//! 4. **Cross check** — declared area vs satellite area; a >20% relative
//!    difference is an advisory red flag, never a rejection by itself.
//! 5. **Accepted** — only a document that clears every stage scores above
//!    the acceptance threshold of 40.

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::DocumentVerification;

/// The document types accepted as land-title instruments.
pub const RECOGNIZED_DEED_TYPES: [&str; 6] = [
    "Sale Deed",
    "Purchase Deed",
    "Land Title",
    "Property Deed",
    "Transfer Deed",
    "Conveyance Deed",
];

/// Highest possible score once any mandatory field is missing.
pub const MISSING_FIELDS_SCORE_CAP: u8 = 30;

/// Highest possible score once the document looks incomplete or forged.
pub const INTEGRITY_SCORE_CAP: u8 = 20;

/// Scores above this mean the document was accepted.
pub const ACCEPTANCE_THRESHOLD: u8 = 40;

/// Relative area difference beyond which the cross-check raises a flag.
pub const AREA_MISMATCH_TOLERANCE: f64 = 0.20;

/// Score for a document that clears every stage with no flags.
const CLEAN_SCORE: u8 = 85;

/// Score for an accepted document carrying advisory flags.
const ADVISORY_SCORE: u8 = 70;

/// Documents shorter than this read as fragments, not deeds.
const MIN_CREDIBLE_CHARS: usize = 200;

lazy_static! {
    static ref DEED_TYPE_PATTERN: Regex = Regex::new(
        r"(?i)\b(sale\s+deed|purchase\s+deed|land\s+title|property\s+deed|transfer\s+deed|conveyance\s+deed)\b"
    )
    .unwrap();

    static ref NON_LAND_TYPES: Vec<(&'static str, Regex)> = vec![
        ("invoice", Regex::new(r"(?i)\binvoice\b").unwrap()),
        ("receipt", Regex::new(r"(?i)\breceipt\b").unwrap()),
        ("contract", Regex::new(r"(?i)\bcontract\b").unwrap()),
        ("business agreement", Regex::new(r"(?i)\bagreement\b").unwrap()),
    ];

    /// Mandatory land-document fields and the patterns that locate them.
    static ref FIELD_PATTERNS: Vec<(&'static str, Regex)> = vec![
        (
            "property identifier",
            Regex::new(r"(?i)\b(?:survey|plot|deed)\s*(?:no\.?|number|#)").unwrap(),
        ),
        (
            "owner name",
            Regex::new(
                r"(?i)\b(?:owner|seller|vendor)\b[^\n]{0,30}?\bname\b|\bname\s+of\s+(?:the\s+)?(?:owner|seller|vendor)\b"
            )
            .unwrap(),
        ),
        (
            "owner address",
            Regex::new(
                r"(?i)\b(?:owner|seller|vendor)\b[^\n]{0,40}?\baddress\b|\baddress\s+of\s+(?:the\s+)?(?:owner|seller|vendor)\b|\bresiding\s+at\b"
            )
            .unwrap(),
        ),
        (
            "property location",
            Regex::new(r"(?i)\bproperty\s+location\b|\blocated\s+at\b|\bsituated\s+(?:at|in)\b")
                .unwrap(),
        ),
        (
            "total area",
            Regex::new(
                r"(?i)\b(?:total\s+)?area\b[^\n]{0,40}?\d[\d,.]*\s*(?:sq\.?\s*(?:m\b|meters?|metres?|ft\b|feet|yards?)|square\s+\w+|acres?|hectares?|cents?)"
            )
            .unwrap(),
        ),
        (
            "boundary description",
            Regex::new(r"(?i)\bbound(?:ed|ary|aries)\b|\bnorth\s*(?::|by)\b|\beast\s*(?::|by)\b")
                .unwrap(),
        ),
        (
            "legal description",
            Regex::new(
                r"(?i)\bdeed\s+of\b|\bthis\s+deed\b|\bdeed\s+type\b|\bconveyance\b|\bhereby\s+(?:sells?|transfers?|conveys?)\b"
            )
            .unwrap(),
        ),
        (
            "registration details",
            Regex::new(r"(?i)\bregist(?:ered|ration)\b|\bsub-?registrar\b|\bdocument\s+no\.?")
                .unwrap(),
        ),
    ];

    static ref PLACEHOLDER_PATTERN: Regex =
        Regex::new(r"(?i)\bTODO\b|\bTBD\b|\bN/A\b").unwrap();

    /// A declared area in square meters, for the satellite cross-check.
    static ref DECLARED_AREA_PATTERN: Regex = Regex::new(
        r"(?i)(\d[\d,]*(?:\.\d+)?)\s*(?:sq\.?\s*m\b|sq\.?\s*met(?:er|re)s?|sqm\b|square\s+met(?:er|re)s?)"
    )
    .unwrap();
}

/// Screen one document against the land-title rule set.
///
/// Never fails: an unrecognizable or fraudulent document is a valid,
/// low-score outcome, not an error.
pub fn screen_document(raw_text: &str, satellite_area_sqm: Option<f64>) -> DocumentVerification {
    // Type check: terminal rejection for anything that is not a land-title
    // instrument.
    let document_type = match DEED_TYPE_PATTERN.find(raw_text) {
        Some(m) => canonical_deed_type(m.as_str()),
        None => {
            tracing::debug!(
                guessed_type = %guess_document_type(raw_text),
                "document rejected at type check"
            );
            return DocumentVerification {
                is_land_document: false,
                document_type_found: guess_document_type(raw_text),
                authenticity_score: 0,
                missing_fields: Vec::new(),
                red_flags: vec!["not a land document".to_string()],
            };
        }
    };

    // Field check.
    let missing_fields: Vec<String> = FIELD_PATTERNS
        .iter()
        .filter(|(_, pattern)| !pattern.is_match(raw_text))
        .map(|(name, _)| name.to_string())
        .collect();

    // Content integrity.
    let mut red_flags = Vec::new();
    let has_placeholder = PLACEHOLDER_PATTERN.is_match(raw_text);
    if has_placeholder {
        red_flags.push("contains placeholder data".to_string());
    }
    let too_short = raw_text.chars().count() < MIN_CREDIBLE_CHARS;
    if too_short {
        red_flags.push("document appears incomplete".to_string());
    }

    // Cross check against the satellite measurement. Advisory only.
    if let (Some(declared), Some(measured)) = (declared_area_sqm(raw_text), satellite_area_sqm) {
        if measured > 0.0 && ((declared - measured).abs() / measured) > AREA_MISMATCH_TOLERANCE {
            red_flags.push(format!(
                "area mismatch: document declares {declared:.0} sqm vs {measured:.0} sqm measured"
            ));
        }
    }

    let authenticity_score = if has_placeholder {
        0
    } else if !missing_fields.is_empty() {
        let present = FIELD_PATTERNS.len() - missing_fields.len();
        let scaled = (MISSING_FIELDS_SCORE_CAP as usize * present / FIELD_PATTERNS.len()) as u8;
        if too_short {
            scaled.min(INTEGRITY_SCORE_CAP)
        } else {
            scaled
        }
    } else if too_short {
        INTEGRITY_SCORE_CAP
    } else if red_flags.is_empty() {
        CLEAN_SCORE
    } else {
        ADVISORY_SCORE
    };

    DocumentVerification {
        is_land_document: true,
        document_type_found: document_type,
        authenticity_score,
        missing_fields,
        red_flags,
    }
}

/// Screen every document and keep the lowest-scoring verdict.
///
/// The weakest document dominates: one forged deed in a bundle of clean
/// ones is still a forged deed.
pub fn screen_documents(
    texts: &[String],
    satellite_area_sqm: Option<f64>,
) -> Option<DocumentVerification> {
    texts
        .iter()
        .map(|text| screen_document(text, satellite_area_sqm))
        .min_by_key(|v| v.authenticity_score)
}

/// Clamp a verification record to the rule-set invariants.
///
/// Applied to every provider-returned record so a generous reasoning model
/// cannot score an invalid document above the rejection bands:
/// - placeholder red flag ⇒ score 0;
/// - not a land document ⇒ score 0;
/// - any missing field ⇒ score capped at [`MISSING_FIELDS_SCORE_CAP`].
pub fn enforce_invariants(mut verification: DocumentVerification) -> DocumentVerification {
    verification.authenticity_score = verification.authenticity_score.min(100);

    if !verification.is_land_document {
        verification.authenticity_score = 0;
    }
    if !verification.missing_fields.is_empty() {
        verification.authenticity_score = verification
            .authenticity_score
            .min(MISSING_FIELDS_SCORE_CAP);
    }
    if verification
        .red_flags
        .iter()
        .any(|flag| flag.to_lowercase().contains("placeholder"))
    {
        verification.authenticity_score = 0;
    }

    verification
}

/// The area the document itself declares, in square meters.
fn declared_area_sqm(raw_text: &str) -> Option<f64> {
    DECLARED_AREA_PATTERN
        .captures(raw_text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().replace(',', "").parse().ok())
}

fn canonical_deed_type(matched: &str) -> String {
    let normalized = matched.split_whitespace().collect::<Vec<_>>().join(" ");
    RECOGNIZED_DEED_TYPES
        .iter()
        .find(|t| t.eq_ignore_ascii_case(&normalized))
        .map(|t| t.to_string())
        .unwrap_or(normalized)
}

fn guess_document_type(raw_text: &str) -> String {
    NON_LAND_TYPES
        .iter()
        .find(|(_, pattern)| pattern.is_match(raw_text))
        .map(|(name, _)| name.to_string())
        .unwrap_or_else(|| "unknown document".to_string())
}
