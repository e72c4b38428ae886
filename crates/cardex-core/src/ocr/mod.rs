//! OCR line sources.
//!
//! The extraction engine never runs OCR itself: a [`LineSource`] is handed
//! in and asked for the recognized lines of one input.

mod files;
#[cfg(feature = "native")]
mod pure_engine;

pub use files::{parse_json_lines, read_json_lines, read_text_lines, FileLineSource};
#[cfg(feature = "native")]
pub use pure_engine::ImageLineSource;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// Produces recognized text lines for one input, in reading order.
pub trait LineSource: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Recognize the lines of one input.
    fn read_lines(&self, input: &Path) -> Result<Vec<String>, OcrError>;
}

/// Lines held in memory, returned for any input.
#[derive(Debug, Clone, Default)]
pub struct StaticLines {
    lines: Vec<String>,
}

impl StaticLines {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl LineSource for StaticLines {
    fn name(&self) -> &str {
        "static"
    }

    fn read_lines(&self, _input: &Path) -> Result<Vec<String>, OcrError> {
        Ok(self.lines.clone())
    }
}

/// How an input file is turned into lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Plain text, one OCR line per line.
    Text,
    /// JSON array of strings.
    Json,
    /// Raster image that needs recognition.
    Image,
}

impl InputKind {
    pub const IMAGE_EXTENSIONS: &'static [&'static str] = &["png", "jpg", "jpeg", "bmp", "tiff", "tif"];

    /// Detect the kind from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "txt" => Some(InputKind::Text),
            "json" => Some(InputKind::Json),
            e if Self::IMAGE_EXTENSIONS.contains(&e) => Some(InputKind::Image),
            _ => None,
        }
    }
}

/// A recognized text region with its quadrilateral.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBox {
    /// Corner coordinates (x1, y1, x2, y2, x3, y3, x4, y4).
    pub bbox: [f32; 8],

    /// Recognized text content.
    pub text: String,

    /// Recognition confidence (0.0 - 1.0).
    pub confidence: f32,
}

impl TextBox {
    /// Get the axis-aligned bounding rectangle.
    pub fn rect(&self) -> (f32, f32, f32, f32) {
        let xs = [self.bbox[0], self.bbox[2], self.bbox[4], self.bbox[6]];
        let ys = [self.bbox[1], self.bbox[3], self.bbox[5], self.bbox[7]];

        let min_x = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_x = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let min_y = ys.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_y = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        (min_x, min_y, max_x, max_y)
    }
}

/// Sort boxes top-to-bottom in 20px rows, then left-to-right.
pub fn sort_reading_order(boxes: &mut [TextBox]) {
    boxes.sort_by(|a, b| {
        let (ax, ay, _, _) = a.rect();
        let (bx, by, _, _) = b.rect();

        let row_a = (ay / 20.0) as i32;
        let row_b = (by / 20.0) as i32;

        if row_a != row_b {
            row_a.cmp(&row_b)
        } else {
            ax.partial_cmp(&bx).unwrap_or(std::cmp::Ordering::Equal)
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_box(x: f32, y: f32, text: &str) -> TextBox {
        TextBox {
            bbox: [x, y, x + 50.0, y, x + 50.0, y + 10.0, x, y + 10.0],
            text: text.to_string(),
            confidence: 0.9,
        }
    }

    #[test]
    fn test_reading_order() {
        let mut boxes = vec![
            text_box(10.0, 60.0, "third"),
            text_box(120.0, 5.0, "second"),
            text_box(10.0, 8.0, "first"),
        ];
        sort_reading_order(&mut boxes);

        let order: Vec<&str> = boxes.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(order, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_input_kind() {
        assert_eq!(InputKind::from_path(Path::new("card.TXT")), Some(InputKind::Text));
        assert_eq!(InputKind::from_path(Path::new("lines.json")), Some(InputKind::Json));
        assert_eq!(InputKind::from_path(Path::new("scan.jpeg")), Some(InputKind::Image));
        assert_eq!(InputKind::from_path(Path::new("scan.pdf")), None);
        assert_eq!(InputKind::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_static_lines() {
        let source = StaticLines::new(["Jane Doe", "Acme"]);
        assert_eq!(source.read_lines(Path::new("ignored")).unwrap(), vec!["Jane Doe", "Acme"]);
    }
}
