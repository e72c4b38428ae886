//! Document type detection and primary-number selection.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::record::{Confidence, DocumentType};
use crate::normalize::NormalizedLines;
use crate::rules::patterns::{
    keyword_regex, AADHAAR_KEYWORDS, AADHAAR_SHAPE, DRIVING_LICENCE_KEYWORDS, PAN_KEYWORDS,
    PAN_SHAPE, PASSPORT_KEYWORDS, VOTER_ID_KEYWORDS,
};
use crate::rules::IdNumbers;

lazy_static! {
    /// Keyword groups in priority order; the first group with a hit wins.
    static ref DOCUMENT_KEYWORDS: Vec<(DocumentType, Regex)> = vec![
        (DocumentType::Aadhaar, keyword_regex(AADHAAR_KEYWORDS)),
        (DocumentType::Pan, keyword_regex(PAN_KEYWORDS)),
        (DocumentType::DrivingLicence, keyword_regex(DRIVING_LICENCE_KEYWORDS)),
        (DocumentType::Passport, keyword_regex(PASSPORT_KEYWORDS)),
        (DocumentType::VoterId, keyword_regex(VOTER_ID_KEYWORDS)),
    ];
}

/// Classify a document from its text, then from the shape of its numbers.
pub fn classify_document(lines: &NormalizedLines, numbers: &IdNumbers) -> DocumentType {
    let text = lines.text();

    if let Some((doc_type, _)) = DOCUMENT_KEYWORDS.iter().find(|(_, re)| re.is_match(text)) {
        return *doc_type;
    }

    numbers
        .general
        .iter()
        .find_map(|n| number_shape(n))
        .unwrap_or(DocumentType::Other)
}

fn number_shape(number: &str) -> Option<DocumentType> {
    if AADHAAR_SHAPE.is_match(number) {
        Some(DocumentType::Aadhaar)
    } else if PAN_SHAPE.is_match(number) {
        Some(DocumentType::Pan)
    } else {
        None
    }
}

/// The authoritative number and the type it was read as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryNumber {
    pub number: Option<String>,
    pub doc_type: DocumentType,
}

/// Pick the primary number for a detected document type.
///
/// A number matching the detected type wins; otherwise any 12-digit
/// number, then any 5+4+1 code (the type is relabeled for both), then the
/// first raw candidate under the detected type.
pub fn select_primary(detected: DocumentType, numbers: &IdNumbers) -> PrimaryNumber {
    let pick = |number: &String, doc_type| PrimaryNumber {
        number: Some(number.clone()),
        doc_type,
    };

    let matching = match detected {
        DocumentType::Aadhaar => numbers.aadhaar.first(),
        DocumentType::Pan => numbers.pan.first(),
        _ => None,
    };

    if let Some(number) = matching {
        return pick(number, detected);
    }
    if let Some(number) = numbers.aadhaar.first() {
        return pick(number, DocumentType::Aadhaar);
    }
    if let Some(number) = numbers.pan.first() {
        return pick(number, DocumentType::Pan);
    }
    if let Some(number) = numbers.general.first() {
        return pick(number, detected);
    }

    PrimaryNumber {
        number: None,
        doc_type: detected,
    }
}

/// High only for a found number on a canonical national ID.
pub fn confidence(detected: DocumentType, primary: &PrimaryNumber) -> Confidence {
    if primary.number.is_some() && detected.is_canonical() {
        Confidence::High
    } else {
        Confidence::Medium
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_lines;
    use crate::rules::harvest_id_numbers;

    fn numbers(values: &[&str]) -> IdNumbers {
        IdNumbers::from_candidates(values.iter().map(|v| v.to_string()).collect())
    }

    #[test]
    fn test_aadhaar_by_keywords() {
        let lines = normalize_lines(&[
            "Government of India",
            "Unique Identification Authority",
            "2345 6789 0123",
        ]);
        let found = harvest_id_numbers(&lines);
        let detected = classify_document(&lines, &found);
        let primary = select_primary(detected, &found);

        assert_eq!(detected, DocumentType::Aadhaar);
        assert_eq!(primary.number.as_deref(), Some("234567890123"));
        assert_eq!(confidence(detected, &primary), Confidence::High);
    }

    #[test]
    fn test_first_keyword_group_wins() {
        let lines = normalize_lines(&["INCOME TAX DEPARTMENT", "Passport size photo"]);
        assert_eq!(classify_document(&lines, &IdNumbers::default()), DocumentType::Pan);
    }

    #[test]
    fn test_keyword_needs_whole_word() {
        let lines = normalize_lines(&["Company Panel"]);
        assert_eq!(classify_document(&lines, &IdNumbers::default()), DocumentType::Other);
    }

    #[test]
    fn test_classify_by_number_shape() {
        let lines = normalize_lines(&["Name: Jane"]);
        assert_eq!(
            classify_document(&lines, &numbers(&["ABCDE1234F", "234567890123"])),
            DocumentType::Pan
        );
        assert_eq!(classify_document(&lines, &numbers(&[])), DocumentType::Other);
    }

    #[test]
    fn test_primary_relabels_type() {
        let primary = select_primary(DocumentType::Passport, &numbers(&["ABCDE1234F"]));
        assert_eq!(primary.doc_type, DocumentType::Pan);
        assert_eq!(confidence(DocumentType::Passport, &primary), Confidence::Medium);
    }

    #[test]
    fn test_primary_prefers_detected_shape() {
        let found = numbers(&["234567890123", "ABCDE1234F"]);
        let primary = select_primary(DocumentType::Pan, &found);
        assert_eq!(primary.number.as_deref(), Some("ABCDE1234F"));
        assert_eq!(primary.doc_type, DocumentType::Pan);
    }

    #[test]
    fn test_no_primary_number() {
        let primary = select_primary(DocumentType::Aadhaar, &IdNumbers::default());
        assert_eq!(primary.number, None);
        assert_eq!(primary.doc_type, DocumentType::Aadhaar);
        assert_eq!(confidence(DocumentType::Aadhaar, &primary), Confidence::Medium);
    }
}
