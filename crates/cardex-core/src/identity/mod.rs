//! Identity-document classification and number extraction.

mod classifier;
mod parser;

pub use classifier::{classify_document, confidence, select_primary, PrimaryNumber};
pub use parser::{empty_identity_record, IdentityExtraction, IdentityParser};
