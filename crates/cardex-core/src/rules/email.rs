//! Email address extraction.

use super::patterns::EMAIL;
use super::{ExtractionCandidate, FieldExtractor};
use crate::normalize::NormalizedLines;

/// Email field extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailExtractor;

impl EmailExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for EmailExtractor {
    type Output = ExtractionCandidate<String>;

    fn extract_all(&self, input: &NormalizedLines) -> Vec<Self::Output> {
        EMAIL
            .find_iter(input.text())
            .map(|m| {
                ExtractionCandidate::new(m.as_str().to_string(), "email", m.as_str())
                    .with_position(m.start(), m.end())
            })
            .collect()
    }
}

/// Extract the first email address from the lines.
pub fn extract_email(input: &NormalizedLines) -> Option<String> {
    EmailExtractor::new().extract(input).map(|m| m.value)
}
