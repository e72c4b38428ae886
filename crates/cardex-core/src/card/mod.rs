//! Business-card field extraction.

mod parser;
mod prompt;

pub use parser::{CardExtraction, CardParser};
pub use prompt::select_fields;
