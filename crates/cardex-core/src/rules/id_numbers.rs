//! Identity-number harvesting for ID documents.

use super::patterns::{AADHAAR_SHAPE, ID_NUMBER, PAN_SHAPE, WHITESPACE};
use crate::normalize::NormalizedLines;

/// Numeric candidates found on an ID document.
///
/// `general` keeps every harvested candidate in text order with whitespace
/// removed; `aadhaar` and `pan` are the subsets with the matching shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdNumbers {
    pub general: Vec<String>,
    pub aadhaar: Vec<String>,
    pub pan: Vec<String>,
}

impl IdNumbers {
    /// Split cleaned candidates into their shape buckets.
    pub fn from_candidates(general: Vec<String>) -> Self {
        let aadhaar = general
            .iter()
            .filter(|n| AADHAAR_SHAPE.is_match(n))
            .cloned()
            .collect();
        let pan = general
            .iter()
            .filter(|n| PAN_SHAPE.is_match(n))
            .cloned()
            .collect();

        Self {
            general,
            aadhaar,
            pan,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.general.is_empty()
    }
}

/// Harvest 12-digit and 5+4+1 alphanumeric codes from the joined text.
pub fn harvest_id_numbers(input: &NormalizedLines) -> IdNumbers {
    let general = ID_NUMBER
        .find_iter(input.text())
        .map(|m| WHITESPACE.replace_all(m.as_str(), "").into_owned())
        .collect();

    IdNumbers::from_candidates(general)
}
