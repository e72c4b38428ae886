//! Core library for business-card and identity-document field extraction.
//!
//! This crate provides:
//! - OCR line normalization and placeholder filtering
//! - Rule-based extractors for contact fields and national ID numbers
//! - Identity-document classification and primary-number selection
//! - Instruction-driven field selection
//! - A pipeline that consults an optional generative model before the rules

pub mod card;
pub mod error;
pub mod generative;
pub mod identity;
pub mod models;
pub mod normalize;
pub mod ocr;
pub mod pipeline;
pub mod rules;

pub use card::{select_fields, CardExtraction, CardParser};
pub use error::{CardexError, Result};
pub use generative::{GenerativeExtractor, GenerativeRequest};
pub use identity::{IdentityExtraction, IdentityParser};
pub use models::{
    CardField, CardexConfig, ContactRecord, DocumentType, ExtractionMode, Field, IdentityRecord,
    SelectedFields, NOT_FOUND,
};
pub use normalize::{normalize_lines, LineNormalizer, NormalizedLines};
pub use ocr::{FileLineSource, InputKind, LineSource, StaticLines};
#[cfg(feature = "native")]
pub use ocr::ImageLineSource;
pub use pipeline::{ExtractionOutput, ExtractionSource, Pipeline, PipelineResult};
pub use rules::MobilePolicy;
