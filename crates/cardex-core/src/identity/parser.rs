//! Identity-document record assembly.

use std::time::Instant;

use tracing::{debug, info, warn};

use super::classifier::{classify_document, confidence, select_primary};
use crate::models::config::ExtractionConfig;
use crate::models::record::{Field, IdentityRecord};
use crate::normalize::{LineNormalizer, NormalizedLines};
use crate::rules::{harvest_id_numbers, run_isolated, IdNumbers};

/// Result of an identity-document extraction.
#[derive(Debug, Clone)]
pub struct IdentityExtraction {
    /// Assembled record.
    pub record: IdentityRecord,
    /// Normalized lines the record was built from.
    pub lines: NormalizedLines,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Rule-based identity-document parser.
#[derive(Debug, Clone)]
pub struct IdentityParser {
    normalizer: LineNormalizer,
    /// Number of normalized lines echoed in the record.
    extracted_text_limit: usize,
}

impl IdentityParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self {
            normalizer: LineNormalizer::new(),
            extracted_text_limit: 10,
        }
    }

    /// Create a parser from the extraction configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new()
            .with_placeholders(&config.extra_placeholders)
            .with_extracted_text_limit(config.extracted_text_limit)
    }

    /// Add template phrases to drop.
    pub fn with_placeholders<I, S>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.normalizer = self.normalizer.with_placeholders(phrases);
        self
    }

    /// Set how many lines are echoed in `extracted_text`.
    pub fn with_extracted_text_limit(mut self, limit: usize) -> Self {
        self.extracted_text_limit = limit;
        self
    }

    /// Normalize raw OCR lines with this parser's placeholder list.
    pub fn normalize<S: AsRef<str>>(&self, raw: &[S]) -> NormalizedLines {
        self.normalizer.normalize(raw)
    }

    /// Parse an identity document from raw OCR lines.
    pub fn parse<S: AsRef<str>>(&self, raw: &[S]) -> IdentityExtraction {
        let start = Instant::now();
        let lines = self.normalize(raw);

        info!("Parsing identity document from {} lines", lines.len());

        let mut warnings = Vec::new();
        let numbers = self.harvest(&lines, &mut warnings);
        let record = self.assemble(&lines, numbers);

        IdentityExtraction {
            record,
            lines,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Harvest numeric candidates; a failure leaves the lists empty.
    pub fn harvest(&self, lines: &NormalizedLines, warnings: &mut Vec<String>) -> IdNumbers {
        match run_isolated("General Numbers", || harvest_id_numbers(lines)) {
            Ok(numbers) => numbers,
            Err(e) => {
                warn!("{}", e);
                warnings.push(e.to_string());
                IdNumbers::default()
            }
        }
    }

    /// Classify and build the record from already harvested numbers.
    pub fn assemble(&self, lines: &NormalizedLines, numbers: IdNumbers) -> IdentityRecord {
        let detected = classify_document(lines, &numbers);
        let primary = select_primary(detected, &numbers);
        let confidence = confidence(detected, &primary);

        debug!(
            "Detected {} with {} numeric candidates, confidence {}",
            detected,
            numbers.general.len(),
            confidence
        );

        IdentityRecord {
            detected_card_type: detected,
            primary_number: primary.number.into(),
            primary_type: primary.doc_type,
            aadhaar: numbers.aadhaar,
            pan: numbers.pan,
            general_numbers: numbers.general,
            extracted_text: lines
                .lines()
                .iter()
                .take(self.extracted_text_limit)
                .cloned()
                .collect(),
            confidence,
        }
    }
}

impl Default for IdentityParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Identity record with every value at its empty default.
pub fn empty_identity_record() -> IdentityRecord {
    IdentityRecord {
        primary_number: Field::missing(),
        ..Default::default()
    }
}
