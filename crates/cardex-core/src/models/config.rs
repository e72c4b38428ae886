//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::rules::MobilePolicy;

/// Main configuration for the cardex pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardexConfig {
    /// OCR configuration.
    pub ocr: OcrConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Generative extraction configuration.
    pub generative: GenerativeConfig,
}

/// OCR engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,

    /// Keep `[UNK]` tokens in recognized text instead of blanking them.
    pub keep_unk: bool,

    /// Rotate portrait images to landscape before recognition.
    pub rotate_portrait: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
            keep_unk: false,
            rotate_portrait: true,
        }
    }
}

impl OcrConfig {
    /// Get full path to a model file.
    pub fn model_path(&self, file_name: &str) -> PathBuf {
        self.model_dir.join(file_name)
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// How much context a mobile number needs.
    pub mobile_policy: MobilePolicy,

    /// Template phrases dropped in addition to the built-in list.
    pub extra_placeholders: Vec<String>,

    /// Mail providers treated as public in addition to the built-in list.
    pub extra_public_email_domains: Vec<String>,

    /// Locale address words such as city names.
    pub extra_address_tokens: Vec<String>,

    /// Country names that end an address block.
    pub country_tokens: Vec<String>,

    /// Number of normalized lines echoed in identity records.
    pub extracted_text_limit: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            mobile_policy: MobilePolicy::Lenient,
            extra_placeholders: Vec::new(),
            extra_public_email_domains: Vec::new(),
            extra_address_tokens: Vec::new(),
            country_tokens: vec!["india".to_string()],
            extracted_text_limit: 10,
        }
    }
}

/// Generative extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerativeConfig {
    /// Try the generative extractor before the rules, when one is attached.
    pub enabled: bool,

    /// Reject responses that lack the required keys.
    pub validate_required_keys: bool,

    /// Model name sent to the API.
    pub model: String,

    /// Environment variable holding the API key.
    pub api_key_env: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GenerativeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            validate_required_keys: true,
            model: "gemini-2.0-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            timeout_secs: 30,
        }
    }
}

impl CardexConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
