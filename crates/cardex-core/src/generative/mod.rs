//! Optional generative-model extraction.
//!
//! The model is an outside collaborator behind [`GenerativeExtractor`]. Its
//! raw reply is only trusted after it parses as a JSON object carrying the
//! keys the mode requires; anything else sends the caller to the rules.

pub mod prompts;

use serde_json::{Map, Value};

use crate::error::GenerativeError;
use crate::models::record::{CardField, ContactRecord, ExtractionMode};
use crate::rules::patterns::WHITESPACE;
use crate::rules::IdNumbers;

pub use prompts::{build_prompt, default_instruction};

/// Keys an identity-mode reply must carry.
pub const IDENTITY_REQUIRED_KEYS: [&str; 3] = ["Aadhar", "PAN", "General Numbers"];

/// One request to a generative extractor.
#[derive(Debug, Clone, Copy)]
pub struct GenerativeRequest<'a> {
    pub mode: ExtractionMode,
    /// Instruction text; the mode's default when the user gave none.
    pub instruction: &'a str,
    /// Normalized OCR lines.
    pub lines: &'a [String],
}

impl<'a> GenerativeRequest<'a> {
    pub fn new(mode: ExtractionMode, instruction: &'a str, lines: &'a [String]) -> Self {
        Self {
            mode,
            instruction,
            lines,
        }
    }

    /// Whether the user supplied their own instruction.
    pub fn is_custom(&self) -> bool {
        !self.instruction.trim().is_empty()
    }

    /// Instruction to send: the user's, or the mode default.
    pub fn effective_instruction(&self) -> &'a str {
        if self.is_custom() {
            self.instruction
        } else {
            default_instruction(self.mode)
        }
    }

    /// Full prompt text for the model.
    pub fn prompt(&self) -> String {
        build_prompt(self.effective_instruction(), self.lines)
    }
}

/// A model that turns OCR lines into structured JSON text.
pub trait GenerativeExtractor: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Return the model's raw reply.
    fn generate(&self, request: &GenerativeRequest<'_>) -> Result<String, GenerativeError>;
}

/// Strip a Markdown code fence (with or without a language tag).
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

/// Parse a reply into a JSON object.
pub fn parse_object(raw: &str) -> Result<Map<String, Value>, GenerativeError> {
    let value: Value = serde_json::from_str(strip_code_fences(raw))
        .map_err(|e| GenerativeError::InvalidJson(e.to_string()))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(GenerativeError::NotAnObject),
    }
}

/// Check that every required key is present.
pub fn require_keys(object: &Map<String, Value>, required: &[&str]) -> Result<(), GenerativeError> {
    let missing: Vec<String> = required
        .iter()
        .filter(|k| !object.contains_key(**k))
        .map(|k| k.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(GenerativeError::MissingKeys(missing))
    }
}

/// Read a card reply into a [`ContactRecord`].
pub fn contact_record_from(
    object: &Map<String, Value>,
    validate: bool,
) -> Result<ContactRecord, GenerativeError> {
    if validate {
        let required: Vec<&str> = CardField::RECORD.iter().map(|f| f.key()).collect();
        require_keys(object, &required)?;
    }
    let mut record = ContactRecord::empty();
    for field in CardField::RECORD {
        let value = object.get(field.key()).and_then(scalar_text);
        let slot = match field {
            CardField::Name => &mut record.name,
            CardField::Designation => &mut record.designation,
            CardField::Company => &mut record.company,
            CardField::Email => &mut record.email,
            CardField::PersonalMobileNumber => &mut record.personal_mobile_number,
            CardField::CompanyNumber => &mut record.company_number,
            CardField::Website => &mut record.website,
            CardField::Address => &mut record.address,
            CardField::Items => continue,
        };
        *slot = value.into();
    }
    Ok(record)
}

/// Read an identity reply into cleaned number lists.
pub fn id_numbers_from(
    object: &Map<String, Value>,
    validate: bool,
) -> Result<IdNumbers, GenerativeError> {
    if validate {
        require_keys(object, &IDENTITY_REQUIRED_KEYS)?;
    }

    // Shape buckets are rebuilt from every listed value so a malformed
    // "Aadhar" or "PAN" entry only survives as a general number.
    let mut candidates = string_list(object.get("General Numbers"));
    for value in string_list(object.get("Aadhar"))
        .into_iter()
        .chain(string_list(object.get("PAN")))
    {
        if !candidates.contains(&value) {
            candidates.push(value);
        }
    }
    Ok(IdNumbers::from_candidates(candidates))
}

/// A custom-instruction reply: any non-empty object.
pub fn custom_object(
    object: Map<String, Value>,
    validate: bool,
) -> Result<Map<String, Value>, GenerativeError> {
    if validate && object.is_empty() {
        return Err(GenerativeError::EmptyObject);
    }
    Ok(object)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    let items: Vec<&Value> = match value {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(other) => vec![other],
        None => Vec::new(),
    };
    items
        .into_iter()
        .filter_map(scalar_text)
        .map(|s| WHITESPACE.replace_all(&s, "").into_owned())
        .filter(|s| !s.is_empty())
        .collect()
}
