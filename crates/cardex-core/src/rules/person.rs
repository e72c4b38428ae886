//! Person name and designation extraction.

use super::patterns::{DESIGNATION_KEYWORD, NON_NAME_KEYWORD};
use super::{title_case, ExtractionCandidate};
use crate::normalize::NormalizedLines;

/// Name and designation found on a card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonFields {
    /// Personal name.
    pub name: Option<ExtractionCandidate<String>>,
    /// Job title.
    pub designation: Option<ExtractionCandidate<String>>,
}

/// Extract name and designation from one shared candidate pool.
///
/// The pool holds lines with no digits, no contact/company/address keyword
/// and one to four words. The first pool line with a designation keyword
/// becomes the designation; the others compete for the name. A two- or
/// three-word line is preferred, longest first; otherwise the longest line.
pub fn extract_person(input: &NormalizedLines) -> PersonFields {
    let pool: Vec<(usize, &str)> = input
        .lines()
        .iter()
        .enumerate()
        .map(|(i, line)| (i, line.trim()))
        .filter(|(_, line)| !line.chars().any(|c| c.is_ascii_digit()))
        .filter(|(_, line)| !NON_NAME_KEYWORD.is_match(line))
        .filter(|(_, line)| (1..=4).contains(&line.split_whitespace().count()))
        .collect();

    let mut designation = None;
    let mut remaining = Vec::with_capacity(pool.len());

    for (i, line) in pool {
        if DESIGNATION_KEYWORD.is_match(line) {
            if designation.is_none() {
                designation = Some(
                    ExtractionCandidate::new(title_case(line), "designation_keyword", line)
                        .with_line(i),
                );
            }
        } else {
            remaining.push((i, line));
        }
    }

    let full_name_shaped: Vec<(usize, &str)> = remaining
        .iter()
        .copied()
        .filter(|(_, line)| (2..=3).contains(&line.split_whitespace().count()))
        .collect();

    let name = longest(&full_name_shaped)
        .map(|pick| (pick, "name_full_shape"))
        .or_else(|| longest(&remaining).map(|pick| (pick, "name_longest")))
        .map(|((i, line), rule)| {
            ExtractionCandidate::new(title_case(line), rule, line).with_line(i)
        });

    PersonFields { name, designation }
}

/// Longest line by characters; the earliest one wins a tie.
fn longest<'a>(candidates: &[(usize, &'a str)]) -> Option<(usize, &'a str)> {
    candidates.iter().copied().fold(None, |best, current| match best {
        Some((_, b)) if b.chars().count() >= current.1.chars().count() => best,
        _ => Some(current),
    })
}
