//! Multi-line postal address extraction.

use tracing::debug;

use super::patterns::{
    ADDRESS_TOKEN, COUNTRY_TOKENS, NON_ADDRESS_TOKEN, PINCODE, POSTAL_CODE, ROMAN_SUFFIX,
    TITLE_CASED_ROMAN, TRAILING_POSTAL,
};
use super::{is_alphabetic_word, title_case, ExtractionCandidate, FieldExtractor};
use crate::normalize::NormalizedLines;

/// Address extractor.
///
/// Finds the first line with address vocabulary and no contact, company or
/// designation token, then collects the following lines until a
/// disqualifying line or a country / postal-code line ends the block.
#[derive(Debug, Clone)]
pub struct AddressExtractor {
    /// Locale-specific address words (city or locality names).
    extra_tokens: Vec<String>,
    /// Words that end the block once two parts are collected.
    country_tokens: Vec<String>,
}

impl AddressExtractor {
    /// Create an extractor with the generic vocabulary.
    pub fn new() -> Self {
        Self {
            extra_tokens: Vec::new(),
            country_tokens: COUNTRY_TOKENS.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Add locale address words such as city names.
    pub fn with_extra_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extra_tokens
            .extend(tokens.into_iter().map(|t| t.as_ref().trim().to_lowercase()));
        self
    }

    /// Replace the country tokens.
    pub fn with_country_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.country_tokens = tokens
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .collect();
        self
    }

    fn has_address_vocabulary(&self, line: &str) -> bool {
        if ADDRESS_TOKEN.is_match(line) {
            return true;
        }
        let lower = line.to_lowercase();
        self.extra_tokens
            .iter()
            .chain(self.country_tokens.iter())
            .any(|t| contains_word(&lower, t))
    }

    fn ends_block(&self, line: &str) -> bool {
        let lower = line.to_lowercase();
        POSTAL_CODE.is_match(line) || self.country_tokens.iter().any(|t| contains_word(&lower, t))
    }

    /// A bare two- or three-word alphabetic phrase, most likely a name.
    fn looks_like_name(&self, line: &str) -> bool {
        let words: Vec<&str> = line.split_whitespace().collect();
        (2..=3).contains(&words.len())
            && words.iter().all(|w| is_alphabetic_word(w))
            && !self.has_address_vocabulary(line)
    }

    fn collect_parts<'a>(&self, lines: &'a [String]) -> Option<(usize, Vec<&'a str>)> {
        let start = lines.iter().position(|line| {
            self.has_address_vocabulary(line) && !NON_ADDRESS_TOKEN.is_match(line)
        })?;

        let mut parts: Vec<&str> = Vec::new();
        for line in &lines[start..] {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if NON_ADDRESS_TOKEN.is_match(line) {
                break;
            }
            if self.looks_like_name(line) {
                continue;
            }
            parts.push(line);
            if parts.len() >= 2 && self.ends_block(line) {
                break;
            }
        }

        Some((start, parts))
    }
}

impl Default for AddressExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AddressExtractor {
    type Output = ExtractionCandidate<String>;

    fn extract_all(&self, input: &NormalizedLines) -> Vec<Self::Output> {
        let lines = input.lines();
        let Some((start, mut parts)) = self.collect_parts(lines) else {
            debug!("No address start line among {} lines", lines.len());
            return Vec::new();
        };

        let pincode = lines
            .iter()
            .find_map(|line| PINCODE.captures(line))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str());
        if let Some(pin) = pincode {
            if !parts.iter().any(|p| p.contains(pin)) {
                parts.push(pin);
            }
        }

        if parts.is_empty() {
            return Vec::new();
        }

        let source = parts.join(" | ");
        vec![ExtractionCandidate::new(format_address(&parts), "address_block", source).with_line(start)]
    }
}

/// Join address parts and clean up OCR casing.
pub fn format_address(parts: &[&str]) -> String {
    let segments: Vec<String> = parts
        .iter()
        .flat_map(|part| part.split(','))
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(format_segment)
        .collect();

    let address = segments.join(", ");
    let address = ROMAN_SUFFIX.replace_all(&address, "${1}-${2}");
    TRAILING_POSTAL.replace(&address, " - ${1}").into_owned()
}

fn format_segment(segment: &str) -> String {
    let titled = title_case(segment);
    let titled = TITLE_CASED_ROMAN.replace_all(&titled, "III");
    titled
        .split(' ')
        .map(|word| {
            if word.chars().count() == 2 && is_alphabetic_word(word) {
                word.to_uppercase()
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Substring match that respects word edges on both sides.
fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(idx, _)| {
        let before = haystack[..idx].chars().next_back();
        let after = haystack[idx + needle.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

/// Extract the address with the generic vocabulary.
pub fn extract_address(input: &NormalizedLines) -> Option<String> {
    AddressExtractor::new().extract(input).map(|m| m.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_lines;

    #[test]
    fn test_address_with_postal_code() {
        let lines = normalize_lines(&["ABC Pvt Ltd", "Block III, MG Road", "Bengaluru, KA", "560001", "India"]);
        let address = extract_address(&lines).unwrap();

        assert!(address.contains("Block-III"));
        assert!(!address.contains("Iii"));
        assert!(address.contains("KA"));
        assert!(address.ends_with(" - 560001"));
        assert_eq!(address, "Block-III, MG Road, Bengaluru, KA - 560001");
    }

    #[test]
    fn test_stops_at_contact_line() {
        let lines = normalize_lines(&[
            "12 Park Street",
            "Kolkata",
            "Phone: 033 22334455",
            "Sector 5",
        ]);
        assert_eq!(extract_address(&lines), Some("12 Park Street, Kolkata".to_string()));
    }

    #[test]
    fn test_skips_name_like_line() {
        let lines = normalize_lines(&["Plot 4, Jubilee Hills", "Ravi Kumar", "Hyderabad 500033"]);
        assert_eq!(
            extract_address(&lines),
            Some("Plot 4, Jubilee Hills, Hyderabad 500033".to_string())
        );
    }

    #[test]
    fn test_appends_pincode_found_elsewhere() {
        let lines = normalize_lines(&["PIN 400001", "Ravi Kumar", "Flat 9, Marine Drive Road"]);
        let address = extract_address(&lines).unwrap();
        assert!(address.starts_with("Pin 400001"));

        let lines = normalize_lines(&["Flat 9, Marine Drive Road", "Ravi Kumar", "Pin: 400001 Tel 22"]);
        let address = extract_address(&lines).unwrap();
        assert_eq!(address, "Flat 9, Marine Drive Road - 400001");
    }

    #[test]
    fn test_locale_tokens_from_configuration() {
        let lines = normalize_lines(&["Begumpet", "Hyderabad"]);
        assert_eq!(extract_address(&lines), None);

        let extractor = AddressExtractor::new().with_extra_tokens(["Begumpet"]);
        let found = extractor.extract(&lines).unwrap();
        assert_eq!(found.value, "Begumpet, Hyderabad");
        assert_eq!(found.line, Some(0));
    }

    #[test]
    fn test_no_address() {
        let lines = normalize_lines(&["Jane Doe", "jane@acme.com"]);
        assert_eq!(extract_address(&lines), None);
    }

    #[test]
    fn test_contains_word() {
        assert!(contains_word("new delhi, india", "india"));
        assert!(!contains_word("indiana", "india"));
    }
}
