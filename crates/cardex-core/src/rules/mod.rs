//! Rule-based field extractors for business cards and ID documents.

pub mod address;
pub mod company;
pub mod email;
pub mod id_numbers;
pub mod patterns;
pub mod person;
pub mod phone;
pub mod website;

pub use address::{extract_address, AddressExtractor};
pub use company::{company_from_email, extract_company, CompanyExtractor};
pub use email::{extract_email, EmailExtractor};
pub use id_numbers::{harvest_id_numbers, IdNumbers};
pub use person::{extract_person, PersonFields};
pub use phone::{extract_landline, extract_mobile, LandlineExtractor, MobileExtractor, MobilePolicy};
pub use website::{extract_website, WebsiteExtractor};

use std::panic::{self, AssertUnwindSafe};

use crate::error::ExtractionError;
use crate::normalize::NormalizedLines;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the winning candidate for the field.
    fn extract(&self, input: &NormalizedLines) -> Option<Self::Output> {
        self.extract_all(input).into_iter().next()
    }

    /// Extract every accepted candidate, in precedence order.
    fn extract_all(&self, input: &NormalizedLines) -> Vec<Self::Output>;
}

/// A matched value plus where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionCandidate<T> {
    /// Extracted value.
    pub value: T,
    /// Name of the rule that produced the match.
    pub rule: &'static str,
    /// Index of the source line, for line-based rules.
    pub line: Option<usize>,
    /// Byte span in the concatenated text, for text-based rules.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionCandidate<T> {
    pub fn new(value: T, rule: &'static str, source: impl Into<String>) -> Self {
        Self {
            value,
            rule,
            line: None,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_line(mut self, index: usize) -> Self {
        self.line = Some(index);
        self
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

/// Title-case every word: first letter upper, the rest lower.
///
/// A word starts after any non-letter, so `"o'neil-smith"` becomes
/// `"O'Neil-Smith"` and `"5th"` becomes `"5Th"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_letter = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_letter = true;
        } else {
            out.push(c);
            prev_letter = false;
        }
    }
    out
}

/// True when the string has letters and none of them are lowercase.
pub fn is_all_uppercase(s: &str) -> bool {
    let mut has_upper = false;
    for c in s.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_upper = true;
        }
    }
    has_upper
}

/// True for a non-empty word made only of letters.
pub fn is_alphabetic_word(word: &str) -> bool {
    !word.is_empty() && word.chars().all(char::is_alphabetic)
}

pub(crate) fn digits_only(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Run one extractor so that a panic inside it stays local to its field.
pub fn run_isolated<T, F>(field: &str, extractor: F) -> Result<T, ExtractionError>
where
    F: FnOnce() -> T,
{
    panic::catch_unwind(AssertUnwindSafe(extractor)).map_err(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        ExtractionError::ExtractorFailed {
            field: field.to_string(),
            reason,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("jane DOE"), "Jane Doe");
        assert_eq!(title_case("block iii, mg road"), "Block Iii, Mg Road");
        assert_eq!(title_case("acme-labs"), "Acme-Labs");
    }

    #[test]
    fn test_is_all_uppercase() {
        assert!(is_all_uppercase("ACME TRADING CO"));
        assert!(is_all_uppercase("ACME 24X7"));
        assert!(!is_all_uppercase("Acme Trading"));
        assert!(!is_all_uppercase("1234"));
    }

    #[test]
    fn test_digits_only() {
        assert_eq!(digits_only("+91-40-1234 5678"), "914012345678");
    }

    #[test]
    fn test_run_isolated_catches_panic() {
        assert_eq!(run_isolated("email", || 7).unwrap(), 7);

        let err = run_isolated("email", || -> Option<String> { panic!("bad pattern") }).unwrap_err();
        assert!(err.to_string().contains("email"));
        assert!(err.to_string().contains("bad pattern"));
    }
}
