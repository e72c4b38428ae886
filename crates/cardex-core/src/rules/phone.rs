//! Mobile and landline number extraction.
//!
//! Both extractors read the concatenated text, so a landline and a mobile
//! number printed on the same line compete for the same digits. The mobile
//! rules reject numbers sitting next to an extension or fax marker, and the
//! landline rules reject anything that is really a bare mobile number.

use serde::{Deserialize, Serialize};

use super::patterns::{
    EXTENSION_AFTER, LANDLINE_AREA_CODE, LANDLINE_LABELED, MARKER_BEFORE, MOBILE_BARE,
    MOBILE_LABELED, MOBILE_WITH_COUNTRY_CODE,
};
use super::{digits_only, ExtractionCandidate, FieldExtractor};
use crate::normalize::NormalizedLines;

/// How much context a mobile number needs before it is accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MobilePolicy {
    /// Label and country code optional; bare 10-digit numbers accepted.
    #[default]
    Lenient,
    /// Only numbers carrying the +91 country code are accepted.
    Strict,
}

/// Mobile number extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct MobileExtractor {
    policy: MobilePolicy,
}

impl MobileExtractor {
    /// Create a new mobile extractor with the lenient policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the acceptance policy.
    pub fn with_policy(mut self, policy: MobilePolicy) -> Self {
        self.policy = policy;
        self
    }

    fn lenient(&self, text: &str) -> Vec<ExtractionCandidate<String>> {
        let mut results: Vec<ExtractionCandidate<String>> = Vec::new();

        // Labeled / country-code form first
        for caps in MOBILE_LABELED.captures_iter(text) {
            let Some(digits) = caps.get(2) else { continue };
            let prefix = caps.get(1).map_or("", |m| m.as_str());
            let number = format!("{}{}", prefix, digits.as_str()).trim().to_string();

            if results.iter().any(|r| r.value == number) {
                continue;
            }
            if next_to_extension(text, &number, digits.end()) {
                continue;
            }

            let start = caps.get(1).map_or(digits.start(), |m| m.start());
            results.push(
                ExtractionCandidate::new(number, "mobile_labeled", &text[start..digits.end()])
                    .with_position(start, digits.end()),
            );
        }

        // Bare ten digits as a fallback
        for caps in MOBILE_BARE.captures_iter(text) {
            let Some(digits) = caps.get(1) else { continue };
            let number = digits.as_str().to_string();

            if results.iter().any(|r| r.value.ends_with(&number)) {
                continue;
            }
            if next_to_extension(text, &number, digits.end()) {
                continue;
            }

            results.push(
                ExtractionCandidate::new(number, "mobile_bare", digits.as_str())
                    .with_position(digits.start(), digits.end()),
            );
        }

        results
    }

    fn strict(&self, text: &str) -> Vec<ExtractionCandidate<String>> {
        let mut results: Vec<ExtractionCandidate<String>> = Vec::new();

        for m in MOBILE_WITH_COUNTRY_CODE.find_iter(text) {
            let number = m.as_str().trim().to_string();
            if results.iter().any(|r| r.value == number) {
                continue;
            }
            if EXTENSION_AFTER.is_match(&text[m.end()..]) {
                continue;
            }
            results.push(
                ExtractionCandidate::new(number, "mobile_country_code", m.as_str())
                    .with_position(m.start(), m.end()),
            );
        }

        results
    }
}

impl FieldExtractor for MobileExtractor {
    type Output = ExtractionCandidate<String>;

    fn extract_all(&self, input: &NormalizedLines) -> Vec<Self::Output> {
        match self.policy {
            MobilePolicy::Lenient => self.lenient(input.text()),
            MobilePolicy::Strict => self.strict(input.text()),
        }
    }
}

/// True when `number` appears right after an ext/fax marker anywhere in the
/// text, or the match ending at `end` is followed by an extension marker.
fn next_to_extension(text: &str, number: &str, end: usize) -> bool {
    let preceded = text
        .match_indices(number)
        .any(|(idx, _)| MARKER_BEFORE.is_match(&text[..idx]));
    preceded || EXTENSION_AFTER.is_match(&text[end..])
}

/// Landline / company number extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct LandlineExtractor;

impl LandlineExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for LandlineExtractor {
    type Output = ExtractionCandidate<String>;

    fn extract_all(&self, input: &NormalizedLines) -> Vec<Self::Output> {
        let text = input.text();
        let mut results: Vec<ExtractionCandidate<String>> = Vec::new();

        // Keyword-anchored numbers (Tel:, Office:, Fax: ...)
        for caps in LANDLINE_LABELED.captures_iter(text) {
            let Some(number) = caps.get(2) else { continue };
            let country = caps.get(1).map_or("", |m| m.as_str());
            let value = join_extension(
                &format!("{}{}", country, number.as_str()),
                caps.get(3).map(|m| m.as_str()),
            );
            let start = caps.get(1).map_or(number.start(), |m| m.start());
            let end = caps.get(3).map_or(number.end(), |m| m.end());
            push_landline(&mut results, value, "landline_labeled", text, start, end);
        }

        // Country code + area code without a label
        for caps in LANDLINE_AREA_CODE.captures_iter(text) {
            let Some(number) = caps.get(1) else { continue };
            let value = join_extension(number.as_str(), caps.get(2).map(|m| m.as_str()));
            let end = caps.get(2).map_or(number.end(), |m| m.end());
            push_landline(&mut results, value, "landline_area_code", text, number.start(), end);
        }

        results
    }
}

fn join_extension(number: &str, extension: Option<&str>) -> String {
    let number = number.trim();
    match extension.map(str::trim).filter(|e| !e.is_empty()) {
        Some(ext) => format!("{} {}", number, ext),
        None => number.to_string(),
    }
}

fn push_landline(
    results: &mut Vec<ExtractionCandidate<String>>,
    value: String,
    rule: &'static str,
    text: &str,
    start: usize,
    end: usize,
) {
    if is_mobile_digits(&value) {
        return;
    }
    if results.iter().any(|r| r.value == value) {
        return;
    }
    results.push(ExtractionCandidate::new(value, rule, &text[start..end]).with_position(start, end));
}

/// Exactly ten digits starting with a mobile prefix.
fn is_mobile_digits(value: &str) -> bool {
    let digits = digits_only(value);
    digits.len() == 10 && digits.starts_with(['6', '7', '8', '9'])
}

/// Extract the first mobile number with the lenient policy.
pub fn extract_mobile(input: &NormalizedLines) -> Option<String> {
    MobileExtractor::new().extract(input).map(|m| m.value)
}

/// Extract the first landline number.
pub fn extract_landline(input: &NormalizedLines) -> Option<String> {
    LandlineExtractor::new().extract(input).map(|m| m.value)
}
