//! Data models: output records and configuration.

pub mod config;
pub mod record;

pub use config::{CardexConfig, ExtractionConfig, GenerativeConfig, OcrConfig};
pub use record::{
    CardField, Confidence, ContactRecord, DocumentType, ExtractionMode, Field, IdentityRecord,
    SelectedFields, NOT_FOUND,
};
