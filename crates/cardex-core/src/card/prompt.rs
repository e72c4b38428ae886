//! Instruction-driven field selection.

use tracing::debug;

use super::parser::CardParser;
use crate::models::record::{CardField, SelectedFields};
use crate::normalize::NormalizedLines;

/// Literal instruction keywords and the field each one asks for.
///
/// Several keywords may name the same field; the first hit decides its
/// position in the output.
const FIELD_KEYWORDS: &[(&str, CardField)] = &[
    ("name", CardField::Name),
    ("designation", CardField::Designation),
    ("company", CardField::Company),
    ("email", CardField::Email),
    ("mobile", CardField::PersonalMobileNumber),
    ("phone", CardField::PersonalMobileNumber),
    ("company number", CardField::CompanyNumber),
    ("company tel", CardField::CompanyNumber),
    ("website", CardField::Website),
    ("address", CardField::Address),
    ("items", CardField::Items),
];

const RECEIPT_FIELDS: &[CardField] = &[CardField::Items, CardField::Company, CardField::Address];

/// Decide which fields an instruction asks for.
///
/// Returns `None` for a blank instruction: the caller runs the full card
/// extraction instead. Literal keywords win; context words ("receipt",
/// "business card") only apply when no keyword matched.
pub fn select_fields(instruction: &str) -> Option<Vec<CardField>> {
    let instruction = instruction.trim().to_lowercase();
    if instruction.is_empty() {
        return None;
    }

    let mut fields: Vec<CardField> = Vec::new();
    for (keyword, field) in FIELD_KEYWORDS {
        if instruction.contains(keyword) && !fields.contains(field) {
            fields.push(*field);
        }
    }

    if fields.is_empty() {
        fields = if instruction.contains("receipt") {
            RECEIPT_FIELDS.to_vec()
        } else if instruction.contains("business card") {
            CardField::RECORD.to_vec()
        } else {
            CardField::RECORD.iter().copied().chain([CardField::Items]).collect()
        };
        debug!("No field keyword in instruction, inferred {} fields", fields.len());
    }

    Some(fields)
}

impl CardParser {
    /// Extract only the fields named by `instruction`.
    ///
    /// Each selected field comes straight from its extractor.
    pub fn extract_selected(
        &self,
        instruction: &str,
        lines: &NormalizedLines,
        warnings: &mut Vec<String>,
    ) -> Option<SelectedFields> {
        let fields = select_fields(instruction)?;

        let mut selected = SelectedFields::new();
        for field in fields {
            selected.insert(field, self.field(field, lines, warnings));
        }
        Some(selected)
    }
}
