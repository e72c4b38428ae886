//! Line sources backed by files on disk.

use std::path::Path;

use tracing::debug;

use super::{InputKind, LineSource};
use crate::error::OcrError;

/// Read a text file with one OCR line per line.
pub fn read_text_lines(path: &Path) -> Result<Vec<String>, OcrError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| OcrError::Recognition(format!("{}: {}", path.display(), e)))?;
    Ok(content.lines().map(str::to_string).collect())
}

/// Parse a JSON array of strings.
pub fn parse_json_lines(content: &str) -> Result<Vec<String>, OcrError> {
    serde_json::from_str::<Vec<String>>(content)
        .map_err(|e| OcrError::UnsupportedInput(format!("expected a JSON array of strings: {}", e)))
}

/// Read a JSON file holding an array of strings.
pub fn read_json_lines(path: &Path) -> Result<Vec<String>, OcrError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| OcrError::Recognition(format!("{}: {}", path.display(), e)))?;
    parse_json_lines(&content)
}

/// Dispatches on the file extension: text and JSON files are read
/// directly, images go to the attached recognizer.
#[derive(Default)]
pub struct FileLineSource {
    recognizer: Option<Box<dyn LineSource>>,
}

impl FileLineSource {
    /// Create a source that reads text and JSON files only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an image recognizer.
    pub fn with_recognizer(mut self, recognizer: Box<dyn LineSource>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }
}

impl LineSource for FileLineSource {
    fn name(&self) -> &str {
        "file"
    }

    fn read_lines(&self, input: &Path) -> Result<Vec<String>, OcrError> {
        let kind = InputKind::from_path(input)
            .ok_or_else(|| OcrError::UnsupportedInput(input.display().to_string()))?;

        debug!("Reading {} as {:?}", input.display(), kind);

        match kind {
            InputKind::Text => read_text_lines(input),
            InputKind::Json => read_json_lines(input),
            InputKind::Image => match &self.recognizer {
                Some(recognizer) => recognizer.read_lines(input),
                None => Err(OcrError::UnsupportedInput(format!(
                    "{}: no image recognizer configured",
                    input.display()
                ))),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::StaticLines;

    #[test]
    fn test_read_text_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("card.txt");
        let json = dir.path().join("card.json");
        std::fs::write(&txt, "Jane Doe\njane@acme.com\n").unwrap();
        std::fs::write(&json, r#"["Jane Doe", "jane@acme.com"]"#).unwrap();

        let source = FileLineSource::new();
        assert_eq!(source.read_lines(&txt).unwrap(), vec!["Jane Doe", "jane@acme.com"]);
        assert_eq!(source.read_lines(&json).unwrap(), vec!["Jane Doe", "jane@acme.com"]);
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            parse_json_lines(r#"{"lines": []}"#),
            Err(OcrError::UnsupportedInput(_))
        ));
    }

    #[test]
    fn test_image_needs_recognizer() {
        let source = FileLineSource::new();
        assert!(source.read_lines(Path::new("scan.png")).is_err());

        let source = FileLineSource::new().with_recognizer(Box::new(StaticLines::new(["Jane"])));
        assert_eq!(source.read_lines(Path::new("scan.png")).unwrap(), vec!["Jane"]);
    }

    #[test]
    fn test_unknown_extension() {
        let source = FileLineSource::new();
        assert!(matches!(
            source.read_lines(Path::new("invoice.pdf")),
            Err(OcrError::UnsupportedInput(_))
        ));
    }
}
