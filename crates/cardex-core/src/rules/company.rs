//! Organization name extraction.

use super::patterns::{COMPANY_KEYWORD, ORGANIZATION_TLDS, PUBLIC_EMAIL_DOMAINS};
use super::{is_all_uppercase, title_case, ExtractionCandidate, FieldExtractor};
use crate::normalize::NormalizedLines;

/// Company name extractor.
///
/// Rules in precedence order: a line carrying a company suffix, then an
/// all-uppercase line of three or four words. Email and web address lines
/// are never company names.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompanyExtractor;

impl CompanyExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for CompanyExtractor {
    type Output = ExtractionCandidate<String>;

    fn extract_all(&self, input: &NormalizedLines) -> Vec<Self::Output> {
        let lines: Vec<(usize, &String)> = input
            .lines()
            .iter()
            .enumerate()
            .filter(|(_, line)| !is_contact_line(line))
            .collect();

        let by_keyword = lines
            .iter()
            .copied()
            .filter(|(_, line)| COMPANY_KEYWORD.is_match(line))
            .map(|(i, line)| {
                ExtractionCandidate::new(title_case(line.trim()), "company_keyword", line.as_str())
                    .with_line(i)
            });

        let by_shape = lines
            .iter()
            .copied()
            .filter(|(_, line)| {
                let words = line.split_whitespace().count();
                is_all_uppercase(line) && (3..=4).contains(&words)
            })
            .map(|(i, line)| {
                ExtractionCandidate::new(title_case(line.trim()), "company_uppercase", line.as_str())
                    .with_line(i)
            });

        by_keyword.chain(by_shape).collect()
    }
}

fn is_contact_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower.contains('@') || lower.contains("www.") || lower.contains("http")
}

/// Extract the company name from the lines.
pub fn extract_company(input: &NormalizedLines) -> Option<String> {
    CompanyExtractor::new().extract(input).map(|m| m.value)
}

/// Derive a company name from an email's domain.
///
/// Public mail providers yield nothing. The longest matching suffix from
/// [`ORGANIZATION_TLDS`] is stripped so `.co.in` wins over `.in`.
pub fn company_from_email(email: &str, extra_public_domains: &[String]) -> Option<String> {
    let (_, domain) = email.rsplit_once('@')?;
    let lowered = domain.to_lowercase();

    let is_public = PUBLIC_EMAIL_DOMAINS.contains(&lowered.as_str())
        || extra_public_domains
            .iter()
            .any(|d| d.eq_ignore_ascii_case(&lowered));
    if is_public {
        return None;
    }

    let mut suffixes: Vec<&str> = ORGANIZATION_TLDS.to_vec();
    suffixes.sort_by_key(|s| std::cmp::Reverse(s.len()));

    let stem = suffixes
        .iter()
        .find(|tld| lowered.ends_with(**tld))
        .map_or(lowered.as_str(), |tld| &lowered[..lowered.len() - tld.len()]);

    let name = title_case(&stem.replace('-', " "));
    let name = name.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
