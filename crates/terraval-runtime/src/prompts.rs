//! Prompt contracts for the reasoning provider.
//!
//! The document-verification prompt is the externally-executed half of the
//! rule set in `terraval_core::document`: the same recognized deed types,
//! the same eight mandatory fields, the same rejection bands. If the
//! reasoning step is ever replaced by a local classifier, these rules are
//! what it must preserve.

use terraval_core::{Appraisal, DocumentRecord, SatelliteMetrics};

/// System prompt for the market-blending appraiser agent.
pub const APPRAISER_SYSTEM_PROMPT: &str = "You are an expert real estate appraiser. \
Analyze property data and market comparables and provide accurate, grounded valuations.";

/// System prompt for the document-verification surveyor agent.
pub const SURVEYOR_SYSTEM_PROMPT: &str = "You are a certified land surveyor and real estate \
expert specializing in land document verification. You MUST analyze the actual document \
content provided and verify it contains all mandatory fields required for land documents. \
REJECT documents that do not meet the standards.";

/// System prompt for the conservative assessor agent.
pub const ASSESSOR_SYSTEM_PROMPT: &str = "You are a real estate valuation analyst. \
Explain property valuations from satellite measurements and documentation levels in \
clear, professional language.";

/// The structured output the surveyor's verification call must return.
pub const VERIFICATION_RESPONSE_SHAPE: &str = r#"Return ONLY valid JSON in exactly this shape:
{
    "reasoning": "<detailed explanation with SPECIFIC findings from the document content>",
    "document_verification": {
        "is_land_document": <true/false>,
        "document_type_found": "<what type of document this appears to be>",
        "authenticity_score": <0-100, MUST be 0-40 if not a land document or missing mandatory fields>,
        "missing_fields": ["<field1>", "<field2>"],
        "red_flags": ["<flag1>", "<flag2>"]
    }
}"#;

/// The full-text document section shared by all document-bearing prompts.
fn document_section(documents: &[DocumentRecord]) -> String {
    if documents.is_empty() {
        return String::new();
    }

    let mut section = String::from("\n\nDOCUMENT CONTENT FOR VERIFICATION:\n");
    for (index, document) in documents.iter().enumerate() {
        section.push_str(&format!(
            "\nDocument {} (FULL TEXT - {} characters):\n{}\n",
            index + 1,
            document.char_count,
            document.raw_text
        ));
    }
    section
}

/// User prompt for the surveyor's structured document verification.
pub fn verification_prompt(
    metrics: &SatelliteMetrics,
    documents: &[DocumentRecord],
    appraisal: &Appraisal,
) -> String {
    format!(
        "STRICT Land Document Verification & Property Authentication:

SATELLITE MEASUREMENTS:
- Measured Area: {area} sqm
- Vegetation Index (NDVI): {ndvi}
- Image Quality (Cloud Coverage): {cloud}%

SUBMITTED DOCUMENTATION:
- Document Count: {doc_count}
- Preliminary Valuation: ${valuation}
- Data Confidence: {confidence}%
{documents}

STEP 1: DOCUMENT TYPE AUTHENTICATION
The submitted document MUST be a recognized land document:
VALID: Sale Deed, Purchase Deed, Land Title, Property Deed, Transfer Deed, Conveyance Deed
INVALID: Invoice, Receipt, Contract, Business Document, Any Non-Land Document
If the document is NOT a land/property document, REJECT IMMEDIATELY with authenticity_score 0.

STEP 2: MANDATORY LAND DOCUMENT FIELD VERIFICATION
Verify ALL of these fields are present in the ACTUAL document content above:
1. Survey Number / Plot Number / Deed Number - property identifier
2. Owner/Seller Name - full legal name
3. Owner/Seller Address - complete address
4. Property Location - full location or address
5. Total Area - size with units clearly stated
6. Boundaries - detailed boundary description
7. Legal Description - deed type
8. Registration Details - registration number or details

STEP 3: VALIDATION & REJECTION RULES
- NOT a land/property document: authenticity_score 0, red flag \"not a land document\"
- Missing ANY mandatory field: authenticity_score 0-30, list each in missing_fields
- Contains placeholders (TODO, TBD, N/A): authenticity_score 0, red flag \"contains placeholder data\"
- Document appears forged or incomplete: authenticity_score 0-20
- Documented area differs from the satellite measurement ({area} sqm) by more than 20%: \
add an \"area mismatch\" red flag (advisory; does not by itself zero the score)

List which mandatory fields ARE present and which are MISSING from the actual content, \
compare the documented area with the satellite measurement, and give a clear verdict.

{shape}",
        area = metrics.area_sqm,
        ndvi = metrics.ndvi,
        cloud = metrics.cloud_coverage,
        doc_count = documents.len(),
        valuation = appraisal.valuation,
        confidence = appraisal.confidence,
        documents = document_section(documents),
        shape = VERIFICATION_RESPONSE_SHAPE,
    )
}

/// User prompt for prose-only reasoning about a computed valuation.
pub fn prose_prompt(
    metrics: &SatelliteMetrics,
    document_count: usize,
    valuation: u64,
    confidence: u8,
    market_note: Option<&str>,
) -> String {
    let market_line = match market_note {
        Some(note) => format!("\n- Market Comparables: {}", note),
        None => String::new(),
    };

    format!(
        "Property Analysis:

SATELLITE DATA:
- Area: {area} sqm
- Vegetation Health (NDVI): {ndvi}
- Cloud Coverage: {cloud}%

DOCUMENTATION:
- Documents Submitted: {doc_count}

COMPUTED RESULT:
- Valuation: ${valuation}
- Confidence: {confidence}%{market_line}

Explain this valuation in 3-5 sentences, citing the vegetation health, parcel size, \
documentation level{market_clause}. Do not change the numbers.",
        area = metrics.area_sqm,
        ndvi = metrics.ndvi,
        cloud = metrics.cloud_coverage,
        doc_count = document_count,
        valuation = valuation,
        confidence = confidence,
        market_line = market_line,
        market_clause = if market_note.is_some() {
            ", and the market comparables"
        } else {
            ""
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> SatelliteMetrics {
        SatelliteMetrics {
            area_sqm: 200.0,
            ndvi: 0.7,
            cloud_coverage: 5.0,
        }
    }

    fn appraisal() -> Appraisal {
        Appraisal {
            valuation: 500_000,
            confidence: 85,
            base_price_per_sqm: 2500.0,
            area_factor: 1.0,
            doc_factor: 1.0,
        }
    }

    #[test]
    fn test_verification_prompt_states_recognized_types() {
        let prompt = verification_prompt(&metrics(), &[], &appraisal());
        for deed_type in terraval_core::RECOGNIZED_DEED_TYPES {
            assert!(prompt.contains(deed_type), "missing deed type: {deed_type}");
        }
    }

    #[test]
    fn test_verification_prompt_states_all_mandatory_fields() {
        let prompt = verification_prompt(&metrics(), &[], &appraisal());
        for field in [
            "Survey Number",
            "Owner/Seller Name",
            "Owner/Seller Address",
            "Property Location",
            "Total Area",
            "Boundaries",
            "Legal Description",
            "Registration Details",
        ] {
            assert!(prompt.contains(field), "missing field: {field}");
        }
    }

    #[test]
    fn test_verification_prompt_states_rejection_bands() {
        let prompt = verification_prompt(&metrics(), &[], &appraisal());
        assert!(prompt.contains("TODO, TBD, N/A"));
        assert!(prompt.contains("0-30"));
        assert!(prompt.contains("0-20"));
        assert!(prompt.contains("more than 20%"));
        assert!(prompt.contains("area mismatch"));
    }

    #[test]
    fn test_verification_prompt_demands_structured_json() {
        let prompt = verification_prompt(&metrics(), &[], &appraisal());
        assert!(prompt.contains("\"document_verification\""));
        assert!(prompt.contains("\"is_land_document\""));
        assert!(prompt.contains("\"authenticity_score\""));
        assert!(prompt.contains("\"missing_fields\""));
        assert!(prompt.contains("\"red_flags\""));
    }

    #[test]
    fn test_verification_prompt_embeds_full_document_text() {
        let documents = vec![DocumentRecord::new("SALE DEED between A and B")];
        let prompt = verification_prompt(&metrics(), &documents, &appraisal());
        assert!(prompt.contains("SALE DEED between A and B"));
        assert!(prompt.contains("Document 1 (FULL TEXT - 25 characters)"));
    }

    #[test]
    fn test_prose_prompt_pins_the_numbers() {
        let prompt = prose_prompt(&metrics(), 3, 500_000, 85, None);
        assert!(prompt.contains("$500000"));
        assert!(prompt.contains("85%"));
        assert!(prompt.contains("Do not change the numbers"));
        assert!(!prompt.contains("Market Comparables"));
    }

    #[test]
    fn test_prose_prompt_with_market_note() {
        let prompt = prose_prompt(&metrics(), 3, 500_000, 85, Some("5 prices, average $100000"));
        assert!(prompt.contains("Market Comparables: 5 prices"));
    }

    #[test]
    fn test_system_prompts_frame_each_agent() {
        assert!(APPRAISER_SYSTEM_PROMPT.contains("appraiser"));
        assert!(SURVEYOR_SYSTEM_PROMPT.contains("land surveyor"));
        assert!(SURVEYOR_SYSTEM_PROMPT.contains("REJECT"));
        assert!(ASSESSOR_SYSTEM_PROMPT.contains("valuation analyst"));
    }
}
