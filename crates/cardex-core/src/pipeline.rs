//! End-to-end extraction: line source, optional generative model, rules.

use std::path::Path;
use std::time::Instant;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::card::CardParser;
use crate::error::GenerativeError;
use crate::generative::{
    contact_record_from, custom_object, id_numbers_from, parse_object, GenerativeExtractor,
    GenerativeRequest,
};
use crate::identity::IdentityParser;
use crate::models::config::{CardexConfig, GenerativeConfig};
use crate::models::record::{ContactRecord, ExtractionMode, IdentityRecord, SelectedFields};
use crate::normalize::NormalizedLines;
use crate::ocr::LineSource;

/// Which path produced the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionSource {
    Generative,
    Heuristic,
}

/// Structured output of one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExtractionOutput {
    /// Full business-card record.
    Card(ContactRecord),
    /// Fields picked by a user instruction.
    Selected(SelectedFields),
    /// Identity-document record.
    Identity(IdentityRecord),
    /// Whatever object the model returned for a custom instruction.
    Custom(Map<String, Value>),
}

impl ExtractionOutput {
    /// `(key, value)` pairs for flat outputs such as CSV rows.
    pub fn entries(&self) -> Vec<(String, String)> {
        match self {
            ExtractionOutput::Card(record) => owned(record.entries()),
            ExtractionOutput::Selected(fields) => owned(fields.entries()),
            ExtractionOutput::Identity(record) => vec![
                ("detected_card_type".to_string(), record.detected_card_type.to_string()),
                ("primary_number".to_string(), record.primary_number.to_string()),
                ("primary_type".to_string(), record.primary_type.to_string()),
                ("Aadhar".to_string(), record.aadhaar.join(" ")),
                ("PAN".to_string(), record.pan.join(" ")),
                ("General Numbers".to_string(), record.general_numbers.join(" ")),
                ("confidence".to_string(), record.confidence.to_string()),
            ],
            ExtractionOutput::Custom(object) => object
                .iter()
                .map(|(k, v)| {
                    let text = match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    (k.clone(), text)
                })
                .collect(),
        }
    }
}

fn owned(entries: Vec<(&'static str, &str)>) -> Vec<(String, String)> {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Result of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    pub mode: ExtractionMode,
    pub source: ExtractionSource,
    pub output: ExtractionOutput,
    /// Normalized lines the output was built from.
    pub lines: Vec<String>,
    /// Isolated failures and fallbacks.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Extraction pipeline.
///
/// Reads lines from the injected [`LineSource`], asks the generative model
/// first when one is attached and enabled, and falls back to the rules.
/// Nothing in here fails: collaborator errors become warnings.
pub struct Pipeline {
    source: Box<dyn LineSource>,
    generative: Option<Box<dyn GenerativeExtractor>>,
    generative_config: GenerativeConfig,
    card: CardParser,
    identity: IdentityParser,
}

impl Pipeline {
    /// Create a pipeline with default settings.
    pub fn new(source: Box<dyn LineSource>) -> Self {
        Self {
            source,
            generative: None,
            generative_config: GenerativeConfig::default(),
            card: CardParser::new(),
            identity: IdentityParser::new(),
        }
    }

    /// Create a pipeline from configuration.
    pub fn from_config(source: Box<dyn LineSource>, config: &CardexConfig) -> Self {
        Self {
            source,
            generative: None,
            generative_config: config.generative.clone(),
            card: CardParser::from_config(&config.extraction),
            identity: IdentityParser::from_config(&config.extraction),
        }
    }

    /// Attach a generative extractor.
    pub fn with_generative(mut self, extractor: Box<dyn GenerativeExtractor>) -> Self {
        self.generative = Some(extractor);
        self
    }

    /// Whether a generative extractor will be consulted.
    pub fn uses_generative(&self) -> bool {
        self.generative.is_some() && self.generative_config.enabled
    }

    /// Process one input file.
    ///
    /// A line source failure is logged and treated as an input with no lines.
    pub fn process_file(
        &self,
        input: &Path,
        mode: ExtractionMode,
        instruction: Option<&str>,
    ) -> PipelineResult {
        let start = Instant::now();
        info!("Processing {} in {} mode", input.display(), mode);

        let mut warnings = Vec::new();
        let raw = match self.source.read_lines(input) {
            Ok(lines) => lines,
            Err(e) => {
                warn!("{} could not read {}: {}", self.source.name(), input.display(), e);
                warnings.push(format!("ocr: {}", e));
                Vec::new()
            }
        };

        let mut result = self.process_lines(&raw, mode, instruction);
        warnings.append(&mut result.warnings);
        result.warnings = warnings;
        result.processing_time_ms = start.elapsed().as_millis() as u64;
        result
    }

    /// Process already recognized lines.
    pub fn process_lines<S: AsRef<str>>(
        &self,
        raw: &[S],
        mode: ExtractionMode,
        instruction: Option<&str>,
    ) -> PipelineResult {
        let start = Instant::now();
        let instruction = instruction.unwrap_or("");
        let mut warnings = Vec::new();

        let (lines, source, output) = match mode {
            ExtractionMode::Card => {
                let lines = self.card.normalize(raw);
                let (source, output) = self.card_output(&lines, instruction, &mut warnings);
                (lines, source, output)
            }
            ExtractionMode::Identity => {
                let lines = self.identity.normalize(raw);
                let (source, output) = self.identity_output(&lines, instruction, &mut warnings);
                (lines, source, output)
            }
        };

        debug!("{} output from {:?} path", mode, source);

        PipelineResult {
            mode,
            source,
            output,
            lines: lines.lines().to_vec(),
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    fn card_output(
        &self,
        lines: &NormalizedLines,
        instruction: &str,
        warnings: &mut Vec<String>,
    ) -> (ExtractionSource, ExtractionOutput) {
        let request = GenerativeRequest::new(ExtractionMode::Card, instruction, lines.lines());
        let validate = self.generative_config.validate_required_keys;

        let generated = self.ask_model(&request, warnings, |object| {
            if request.is_custom() {
                custom_object(object, validate).map(ExtractionOutput::Custom)
            } else {
                contact_record_from(&object, validate).map(ExtractionOutput::Card)
            }
        });
        if let Some(output) = generated {
            return (ExtractionSource::Generative, output);
        }

        let output = match self.card.extract_selected(instruction, lines, warnings) {
            Some(selected) => ExtractionOutput::Selected(selected),
            None => ExtractionOutput::Card(self.card.assemble(lines, warnings)),
        };
        (ExtractionSource::Heuristic, output)
    }

    fn identity_output(
        &self,
        lines: &NormalizedLines,
        instruction: &str,
        warnings: &mut Vec<String>,
    ) -> (ExtractionSource, ExtractionOutput) {
        let request = GenerativeRequest::new(ExtractionMode::Identity, instruction, lines.lines());
        let validate = self.generative_config.validate_required_keys;

        let generated = self.ask_model(&request, warnings, |object| {
            if request.is_custom() {
                custom_object(object, validate).map(ExtractionOutput::Custom)
            } else {
                id_numbers_from(&object, validate)
                    .map(|numbers| ExtractionOutput::Identity(self.identity.assemble(lines, numbers)))
            }
        });
        if let Some(output) = generated {
            return (ExtractionSource::Generative, output);
        }

        let numbers = self.identity.harvest(lines, warnings);
        (
            ExtractionSource::Heuristic,
            ExtractionOutput::Identity(self.identity.assemble(lines, numbers)),
        )
    }

    /// Ask the model and convert its reply; `None` sends the caller to the rules.
    fn ask_model<F>(
        &self,
        request: &GenerativeRequest<'_>,
        warnings: &mut Vec<String>,
        convert: F,
    ) -> Option<ExtractionOutput>
    where
        F: FnOnce(Map<String, Value>) -> Result<ExtractionOutput, GenerativeError>,
    {
        if !self.generative_config.enabled {
            return None;
        }
        let extractor = self.generative.as_ref()?;
        if request.lines.is_empty() {
            debug!("No lines to send to {}", extractor.name());
            return None;
        }

        let reply = extractor
            .generate(request)
            .and_then(|raw| parse_object(&raw))
            .and_then(convert);

        match reply {
            Ok(output) => {
                info!("Using {} reply", extractor.name());
                Some(output)
            }
            Err(e) => {
                warn!("{} failed, falling back to rules: {}", extractor.name(), e);
                warnings.push(format!("{}: {}", extractor.name(), e));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::{CardField, Confidence, DocumentType, NOT_FOUND};
    use crate::ocr::StaticLines;
    use pretty_assertions::assert_eq;

    struct FixedReply(&'static str);

    impl GenerativeExtractor for FixedReply {
        fn name(&self) -> &str {
            "fixed"
        }

        fn generate(&self, _request: &GenerativeRequest<'_>) -> Result<String, GenerativeError> {
            Ok(self.0.to_string())
        }
    }

    struct Offline;

    impl GenerativeExtractor for Offline {
        fn name(&self) -> &str {
            "offline"
        }

        fn generate(&self, _request: &GenerativeRequest<'_>) -> Result<String, GenerativeError> {
            Err(GenerativeError::Unavailable("no network".to_string()))
        }
    }

    const CARD: [&str; 4] = ["Jane Doe", "Chief Executive Officer", "Acme Pvt Ltd", "jane@acme.com"];

    fn card_record(result: &PipelineResult) -> &ContactRecord {
        match &result.output {
            ExtractionOutput::Card(record) => record,
            other => panic!("expected a card record, got {:?}", other),
        }
    }

    #[test]
    fn test_heuristic_card() {
        let pipeline = Pipeline::new(Box::new(StaticLines::new(CARD)));
        let result = pipeline.process_file(Path::new("card.png"), ExtractionMode::Card, None);

        assert_eq!(result.source, ExtractionSource::Heuristic);
        let record = card_record(&result);
        assert_eq!(record.email.as_str(), "jane@acme.com");
        assert_eq!(record.company.as_str(), "Acme Pvt Ltd");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_source_failure_gives_sentinel_record() {
        let pipeline = Pipeline::new(Box::new(crate::ocr::FileLineSource::new()));
        let result = pipeline.process_file(Path::new("missing.txt"), ExtractionMode::Card, None);

        assert_eq!(result.output, ExtractionOutput::Card(ContactRecord::empty()));
        assert!(result.lines.is_empty());
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].starts_with("ocr:"));
    }

    #[test]
    fn test_valid_model_reply_is_used() {
        let reply = r#"{"name": "J. Doe", "designation": "CEO", "company": "Acme",
            "email": "jane@acme.com", "personal_mobile_number": "Not Found",
            "company_number": "Not Found", "website": "Not Found", "address": "Not Found"}"#;
        let pipeline = Pipeline::new(Box::new(StaticLines::new(CARD)))
            .with_generative(Box::new(FixedReply(reply)));
        let result = pipeline.process_lines(&CARD, ExtractionMode::Card, None);

        assert_eq!(result.source, ExtractionSource::Generative);
        assert_eq!(card_record(&result).name.as_str(), "J. Doe");
    }

    #[test]
    fn test_incomplete_reply_falls_back() {
        let pipeline = Pipeline::new(Box::new(StaticLines::new(CARD)))
            .with_generative(Box::new(FixedReply(r#"{"name": "J. Doe"}"#)));
        let result = pipeline.process_lines(&CARD, ExtractionMode::Card, None);

        assert_eq!(result.source, ExtractionSource::Heuristic);
        assert_eq!(card_record(&result).name.as_str(), "Jane Doe");
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_unavailable_model_falls_back() {
        let pipeline =
            Pipeline::new(Box::new(StaticLines::new(CARD))).with_generative(Box::new(Offline));
        let result = pipeline.process_lines(&CARD, ExtractionMode::Card, None);

        assert_eq!(result.source, ExtractionSource::Heuristic);
        assert!(result.warnings[0].contains("no network"));
    }

    #[test]
    fn test_disabled_model_is_skipped() {
        let mut config = CardexConfig::default();
        config.generative.enabled = false;
        let pipeline = Pipeline::from_config(Box::new(StaticLines::new(CARD)), &config)
            .with_generative(Box::new(Offline));

        assert!(!pipeline.uses_generative());
        let result = pipeline.process_lines(&CARD, ExtractionMode::Card, None);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_instruction_selects_fields() {
        let pipeline = Pipeline::new(Box::new(StaticLines::new(CARD)));
        let result = pipeline.process_lines(&CARD, ExtractionMode::Card, Some("just the email please"));

        match result.output {
            ExtractionOutput::Selected(fields) => {
                assert_eq!(fields.fields(), vec![CardField::Email]);
                assert_eq!(fields.get(CardField::Email).unwrap().as_str(), "jane@acme.com");
            }
            other => panic!("expected selected fields, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_instruction_reply() {
        let pipeline = Pipeline::new(Box::new(StaticLines::new(CARD)))
            .with_generative(Box::new(FixedReply(r#"{"initials": "JD"}"#)));
        let result = pipeline.process_lines(&CARD, ExtractionMode::Card, Some("initials only"));

        assert_eq!(result.source, ExtractionSource::Generative);
        assert_eq!(
            result.output.entries(),
            vec![("initials".to_string(), "JD".to_string())]
        );
    }

    #[test]
    fn test_identity_reply_is_classified() {
        let lines = ["Government of India", "Jane Doe"];
        let reply = r#"{"Aadhar": ["2345 6789 0123"], "PAN": [], "General Numbers": ["2345 6789 0123"]}"#;
        let pipeline = Pipeline::new(Box::new(StaticLines::new(lines)))
            .with_generative(Box::new(FixedReply(reply)));
        let result = pipeline.process_lines(&lines, ExtractionMode::Identity, None);

        assert_eq!(result.source, ExtractionSource::Generative);
        match result.output {
            ExtractionOutput::Identity(record) => {
                assert_eq!(record.detected_card_type, DocumentType::Aadhaar);
                assert_eq!(record.primary_number.as_str(), "234567890123");
            }
            other => panic!("expected identity record, got {:?}", other),
        }
    }

    #[test]
    fn test_identity_reply_numbers_are_reshaped() {
        let lines = ["Jane Doe"];
        let reply = r#"{"Aadhar": ["1234"], "PAN": [], "General Numbers": []}"#;
        let pipeline = Pipeline::new(Box::new(StaticLines::new(lines)))
            .with_generative(Box::new(FixedReply(reply)));
        let result = pipeline.process_lines(&lines, ExtractionMode::Identity, None);

        match result.output {
            ExtractionOutput::Identity(record) => {
                assert!(record.aadhaar.is_empty());
                assert_eq!(record.general_numbers, vec!["1234"]);
                assert_eq!(record.primary_type, DocumentType::Other);
                assert_eq!(record.confidence, Confidence::Medium);
            }
            other => panic!("expected identity record, got {:?}", other),
        }
    }

    #[test]
    fn test_identity_without_lines() {
        let empty: Vec<String> = Vec::new();
        let pipeline = Pipeline::new(Box::new(StaticLines::default()));
        let result = pipeline.process_lines(&empty, ExtractionMode::Identity, None);

        let json = serde_json::to_value(&result.output).unwrap();
        assert_eq!(json["primary_number"], NOT_FOUND);
        assert_eq!(json["detected_card_type"], "Other");
    }
}
