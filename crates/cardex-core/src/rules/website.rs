//! Website extraction.

use super::patterns::{WEBSITE, WEBSITE_TLDS};
use super::{ExtractionCandidate, FieldExtractor};
use crate::normalize::NormalizedLines;

/// Website field extractor.
///
/// Domain-like matches that belong to an email token are skipped, and only
/// allow-listed top-level domains are accepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebsiteExtractor;

impl WebsiteExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for WebsiteExtractor {
    type Output = ExtractionCandidate<String>;

    fn extract_all(&self, input: &NormalizedLines) -> Vec<Self::Output> {
        let text = input.text();

        WEBSITE
            .find_iter(text)
            .filter(|m| !enclosing_token(text, m.start(), m.end()).contains('@'))
            .filter(|m| has_allowed_tld(m.as_str()))
            .map(|m| {
                ExtractionCandidate::new(m.as_str().to_string(), "website", m.as_str())
                    .with_position(m.start(), m.end())
            })
            .collect()
    }
}

/// The whitespace-delimited token around a match.
fn enclosing_token(text: &str, start: usize, end: usize) -> &str {
    let token_start = text[..start]
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map_or(0, |(i, c)| i + c.len_utf8());
    let token_end = text[end..]
        .find(char::is_whitespace)
        .map_or(text.len(), |i| end + i);
    &text[token_start..token_end]
}

fn has_allowed_tld(url: &str) -> bool {
    let url = url.to_lowercase();
    url.rsplit_once('.')
        .is_some_and(|(_, tld)| WEBSITE_TLDS.contains(&tld))
}

/// Extract the first website from the lines.
pub fn extract_website(input: &NormalizedLines) -> Option<String> {
    WebsiteExtractor::new().extract(input).map(|m| m.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_lines;

    #[test]
    fn test_extract_website() {
        let lines = normalize_lines(&["www.acme-labs.in"]);
        assert_eq!(extract_website(&lines), Some("www.acme-labs.in".to_string()));
    }

    #[test]
    fn test_email_is_not_a_website() {
        let lines = normalize_lines(&["jane.doe@example.com"]);
        assert_eq!(extract_website(&lines), None);
    }

    #[test]
    fn test_website_after_email() {
        let lines = normalize_lines(&["jane.doe@example.com", "https://example.com"]);
        assert_eq!(extract_website(&lines), Some("https://example.com".to_string()));
    }

    #[test]
    fn test_unknown_tld_rejected() {
        let lines = normalize_lines(&["Dr. J.R. Smith"]);
        assert_eq!(extract_website(&lines), None);
    }

    #[test]
    fn test_website_after_non_breaking_space() {
        let lines = normalize_lines(&["Web:\u{00A0}www.acme.com"]);
        assert_eq!(extract_website(&lines), Some("www.acme.com".to_string()));
    }
}
