//! OCR line cleanup and placeholder filtering.

use std::collections::HashSet;

use tracing::debug;

use crate::rules::patterns::{PLACEHOLDER_PHRASES, ROMAN_CONFUSION};

/// Normalized OCR lines together with their space-joined text.
///
/// Line-based extractors (names, address, company) read `lines`; pattern
/// extractors (email, phones, website) read `text`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedLines {
    lines: Vec<String>,
    text: String,
}

impl NormalizedLines {
    /// Wrap lines that are already normalized.
    pub fn new(lines: Vec<String>) -> Self {
        let text = lines.join(" ");
        Self { lines, text }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }
}

/// Cleans raw OCR lines before extraction.
#[derive(Debug, Clone)]
pub struct LineNormalizer {
    placeholders: HashSet<String>,
}

impl LineNormalizer {
    /// Create a normalizer with the built-in placeholder phrases.
    pub fn new() -> Self {
        Self {
            placeholders: PLACEHOLDER_PHRASES.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Add extra placeholder phrases (compared lower-cased and trimmed).
    pub fn with_placeholders<I, S>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.placeholders
            .extend(phrases.into_iter().map(|p| p.as_ref().trim().to_lowercase()));
        self
    }

    /// Whether a raw line is template boilerplate.
    pub fn is_placeholder(&self, line: &str) -> bool {
        self.placeholders.contains(&line.trim().to_lowercase())
    }

    /// Normalize a single line without placeholder filtering.
    pub fn normalize_line(&self, line: &str) -> String {
        let line = line.trim().replace(';', ",");
        ROMAN_CONFUSION.replace_all(&line, "III${1}").into_owned()
    }

    /// Normalize a full OCR line list, dropping placeholders and blank lines.
    pub fn normalize<S: AsRef<str>>(&self, raw: &[S]) -> NormalizedLines {
        let mut dropped = 0usize;
        let lines: Vec<String> = raw
            .iter()
            .map(AsRef::as_ref)
            .filter(|line| {
                let keep = !self.is_placeholder(line);
                if !keep {
                    dropped += 1;
                }
                keep
            })
            .map(|line| self.normalize_line(line))
            .filter(|line| !line.is_empty())
            .collect();

        debug!(
            "Normalized {} raw lines into {} ({} placeholders dropped)",
            raw.len(),
            lines.len(),
            dropped
        );

        NormalizedLines::new(lines)
    }
}

impl Default for LineNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize lines with the default placeholder table.
pub fn normalize_lines<S: AsRef<str>>(raw: &[S]) -> NormalizedLines {
    LineNormalizer::new().normalize(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_and_unifies_punctuation() {
        let lines = normalize_lines(&["  Plot 4; Jubilee Hills  "]);
        assert_eq!(lines.lines(), &["Plot 4, Jubilee Hills".to_string()]);
    }

    #[test]
    fn test_roman_numeral_confusion() {
        let normalizer = LineNormalizer::new();
        assert_eq!(normalizer.normalize_line("Block IIl, MG Road"), "Block III, MG Road");
        assert_eq!(normalizer.normalize_line("Phase iii"), "Phase III");
        assert_eq!(normalizer.normalize_line("Banjara Hills"), "Banjara Hills");
    }

    #[test]
    fn test_drops_placeholders() {
        let lines = normalize_lines(&["Your Name Here", "Jane Doe", "  COMPANY TAGLINE "]);
        assert_eq!(lines.lines(), &["Jane Doe".to_string()]);
    }

    #[test]
    fn test_extra_placeholders() {
        let normalizer = LineNormalizer::new().with_placeholders(["Sample Text"]);
        let lines = normalizer.normalize(&["sample text", "Jane Doe"]);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let raw: Vec<String> = Vec::new();
        let lines = normalize_lines(&raw);
        assert!(lines.is_empty());
        assert_eq!(lines.text(), "");
    }

    #[test]
    fn test_text_is_space_joined() {
        let lines = normalize_lines(&["Tel: 040 1234567", "Mob: 9876543210"]);
        assert_eq!(lines.text(), "Tel: 040 1234567 Mob: 9876543210");
    }
}
