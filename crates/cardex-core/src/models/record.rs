//! Output records for business cards and identity documents.
//!
//! Every key is always serialized. A value the engine could not find is
//! written as the [`NOT_FOUND`] sentinel, never omitted or `null`.

use std::fmt;

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// Placeholder written for any field that was not extracted.
pub const NOT_FOUND: &str = "Not Found";

/// A single extracted value, or the sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Field(Option<String>);

impl Field {
    /// A found value. Blank strings and the sentinel itself count as missing.
    pub fn found(value: impl Into<String>) -> Self {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == NOT_FOUND {
            Self(None)
        } else {
            Self(Some(trimmed.to_string()))
        }
    }

    pub fn missing() -> Self {
        Self(None)
    }

    pub fn is_found(&self) -> bool {
        self.0.is_some()
    }

    pub fn value(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// The value, or [`NOT_FOUND`].
    pub fn as_str(&self) -> &str {
        self.0.as_deref().unwrap_or(NOT_FOUND)
    }
}

impl From<Option<String>> for Field {
    fn from(value: Option<String>) -> Self {
        value.map_or_else(Self::missing, Self::found)
    }
}

impl From<&str> for Field {
    fn from(value: &str) -> Self {
        Self::found(value)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(Self::from(value))
    }
}

/// Which kind of document a request is about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMode {
    /// Business card: contact fields.
    #[default]
    Card,
    /// Government ID: document type and numbers.
    Identity,
}

impl fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionMode::Card => f.write_str("card"),
            ExtractionMode::Identity => f.write_str("identity"),
        }
    }
}

/// Names of the fields a card extraction can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CardField {
    Name,
    Designation,
    Company,
    Email,
    PersonalMobileNumber,
    CompanyNumber,
    Website,
    Address,
    /// Lines mentioning items or products (prompt selection only).
    Items,
}

impl CardField {
    /// Fields of a full [`ContactRecord`], in output order.
    pub const RECORD: [CardField; 8] = [
        CardField::Name,
        CardField::Designation,
        CardField::Company,
        CardField::Email,
        CardField::PersonalMobileNumber,
        CardField::CompanyNumber,
        CardField::Website,
        CardField::Address,
    ];

    /// Output key of the field.
    pub fn key(self) -> &'static str {
        match self {
            CardField::Name => "name",
            CardField::Designation => "designation",
            CardField::Company => "company",
            CardField::Email => "email",
            CardField::PersonalMobileNumber => "personal_mobile_number",
            CardField::CompanyNumber => "company_number",
            CardField::Website => "website",
            CardField::Address => "address",
            CardField::Items => "items",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        CardField::RECORD
            .into_iter()
            .chain([CardField::Items])
            .find(|f| f.key() == key)
    }
}

impl fmt::Display for CardField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Structured business-card record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactRecord {
    pub name: Field,
    pub designation: Field,
    pub company: Field,
    pub email: Field,
    pub personal_mobile_number: Field,
    pub company_number: Field,
    pub website: Field,
    pub address: Field,
}

impl ContactRecord {
    /// A record with every field set to the sentinel.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Look up a field by name. `Items` is not part of the record.
    pub fn get(&self, field: CardField) -> Option<&Field> {
        match field {
            CardField::Name => Some(&self.name),
            CardField::Designation => Some(&self.designation),
            CardField::Company => Some(&self.company),
            CardField::Email => Some(&self.email),
            CardField::PersonalMobileNumber => Some(&self.personal_mobile_number),
            CardField::CompanyNumber => Some(&self.company_number),
            CardField::Website => Some(&self.website),
            CardField::Address => Some(&self.address),
            CardField::Items => None,
        }
    }

    /// Fields that hold the sentinel.
    pub fn missing_fields(&self) -> Vec<CardField> {
        CardField::RECORD
            .into_iter()
            .filter(|f| self.get(*f).is_some_and(|v| !v.is_found()))
            .collect()
    }

    /// `(key, value)` pairs in output order.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        CardField::RECORD
            .into_iter()
            .filter_map(|f| self.get(f).map(|v| (f.key(), v.as_str())))
            .collect()
    }
}

/// Fields picked by a free-text instruction, in selection order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedFields {
    entries: Vec<(CardField, Field)>,
}

impl SelectedFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field; a repeated field keeps its first value.
    pub fn insert(&mut self, field: CardField, value: Field) {
        if !self.contains(field) {
            self.entries.push((field, value));
        }
    }

    pub fn contains(&self, field: CardField) -> bool {
        self.entries.iter().any(|(f, _)| *f == field)
    }

    pub fn get(&self, field: CardField) -> Option<&Field> {
        self.entries.iter().find(|(f, _)| *f == field).map(|(_, v)| v)
    }

    pub fn fields(&self) -> Vec<CardField> {
        self.entries.iter().map(|(f, _)| *f).collect()
    }

    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        self.entries.iter().map(|(f, v)| (f.key(), v.as_str())).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for SelectedFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, value) in &self.entries {
            map.serialize_entry(field.key(), value)?;
        }
        map.end()
    }
}

/// Kind of identity document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    /// 12-digit national identity number.
    #[serde(rename = "Aadhar")]
    Aadhaar,
    /// 10-character tax account number.
    #[serde(rename = "PAN")]
    Pan,
    #[serde(rename = "Driving Licence")]
    DrivingLicence,
    #[serde(rename = "Passport")]
    Passport,
    #[serde(rename = "Voter ID")]
    VoterId,
    #[default]
    #[serde(rename = "Other")]
    Other,
}

impl DocumentType {
    pub fn label(self) -> &'static str {
        match self {
            DocumentType::Aadhaar => "Aadhar",
            DocumentType::Pan => "PAN",
            DocumentType::DrivingLicence => "Driving Licence",
            DocumentType::Passport => "Passport",
            DocumentType::VoterId => "Voter ID",
            DocumentType::Other => "Other",
        }
    }

    /// The two national ID types whose number shape is known.
    pub fn is_canonical(self) -> bool {
        matches!(self, DocumentType::Aadhaar | DocumentType::Pan)
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Confidence in the primary number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    #[default]
    Medium,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::High => f.write_str("high"),
            Confidence::Medium => f.write_str("medium"),
        }
    }
}

/// Structured identity-document record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub detected_card_type: DocumentType,
    pub primary_number: Field,
    pub primary_type: DocumentType,
    #[serde(rename = "Aadhar")]
    pub aadhaar: Vec<String>,
    #[serde(rename = "PAN")]
    pub pan: Vec<String>,
    #[serde(rename = "General Numbers")]
    pub general_numbers: Vec<String>,
    /// First normalized lines, echoed for inspection.
    pub extracted_text: Vec<String>,
    pub confidence: Confidence,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_field_sentinel() {
        assert_eq!(Field::missing().as_str(), NOT_FOUND);
        assert_eq!(Field::found("  ").value(), None);
        assert_eq!(Field::found("Not Found").value(), None);
        assert_eq!(Field::found(" Jane ").as_str(), "Jane");
    }

    #[test]
    fn test_empty_record_serializes_every_key() {
        let json = serde_json::to_value(ContactRecord::empty()).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), 8);
        for field in CardField::RECORD {
            assert_eq!(object[field.key()], NOT_FOUND);
        }
    }

    #[test]
    fn test_record_from_json_with_sentinel_and_null() {
        let record: ContactRecord = serde_json::from_str(
            r#"{"name": "Jane Doe", "email": "Not Found", "website": null}"#,
        )
        .unwrap();

        assert_eq!(record.name.value(), Some("Jane Doe"));
        assert!(!record.email.is_found());
        assert!(!record.website.is_found());
        assert_eq!(record.missing_fields().len(), 7);
    }

    #[test]
    fn test_selected_fields_keep_order() {
        let mut selected = SelectedFields::new();
        selected.insert(CardField::Company, Field::found("Acme"));
        selected.insert(CardField::Address, Field::missing());
        selected.insert(CardField::Company, Field::found("Other"));

        let json = serde_json::to_string(&selected).unwrap();
        assert_eq!(json, r#"{"company":"Acme","address":"Not Found"}"#);
    }

    #[test]
    fn test_identity_record_keys() {
        let record = IdentityRecord {
            detected_card_type: DocumentType::Aadhaar,
            primary_number: Field::found("234567890123"),
            primary_type: DocumentType::Aadhaar,
            aadhaar: vec!["234567890123".to_string()],
            confidence: Confidence::High,
            ..Default::default()
        };
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["detected_card_type"], "Aadhar");
        assert_eq!(json["Aadhar"][0], "234567890123");
        assert_eq!(json["General Numbers"], serde_json::json!([]));
        assert_eq!(json["confidence"], "high");
    }

    #[test]
    fn test_card_field_keys_round_trip() {
        assert_eq!(CardField::from_key("company_number"), Some(CardField::CompanyNumber));
        assert_eq!(CardField::from_key("items"), Some(CardField::Items));
        assert_eq!(CardField::from_key("phone"), None);
    }
}
