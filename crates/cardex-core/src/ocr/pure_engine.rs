//! Image recognizer using `pure-onnx-ocr`.

use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

use image::{DynamicImage, GenericImageView};
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::OcrConfig;

use super::{sort_reading_order, LineSource, TextBox};

/// Line source that runs detection and recognition on image files.
///
/// The engine is locked for the duration of one recognition.
pub struct ImageLineSource {
    engine: Mutex<pure_onnx_ocr::engine::OcrEngine>,
    config: OcrConfig,
}

impl ImageLineSource {
    /// Load the models named in the configuration.
    pub fn from_config(config: OcrConfig) -> Result<Self, OcrError> {
        let det_path = config.model_path(&config.detection_model);
        let rec_path = config.model_path(&config.recognition_model);
        let dict_path = config.model_path(&config.dictionary);

        for path in [&det_path, &rec_path, &dict_path] {
            if !path.exists() {
                return Err(OcrError::ModelLoad(format!("missing {}", path.display())));
            }
        }

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!("Loaded pure-onnx-ocr engine from {}", config.model_dir.display());

        Ok(Self {
            engine: Mutex::new(engine),
            config,
        })
    }

    /// Recognize text boxes in reading order.
    pub fn recognize(&self, image: &DynamicImage) -> Result<Vec<TextBox>, OcrError> {
        let start = Instant::now();
        let image = self.orient(image);
        let (width, height) = image.dimensions();

        debug!("Recognizing image: {}x{}", width, height);

        let engine = self
            .engine
            .lock()
            .map_err(|_| OcrError::Recognition("OCR engine lock poisoned".to_string()))?;
        let results = engine
            .run_from_image(&image)
            .map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr: {}", e)))?;

        let mut boxes: Vec<TextBox> = results
            .iter()
            .map(|r| TextBox {
                bbox: polygon_to_bbox(&r.bounding_box),
                text: if self.config.keep_unk {
                    r.text.clone()
                } else {
                    r.text.replace("[UNK]", " ")
                },
                confidence: r.confidence,
            })
            .collect();

        sort_reading_order(&mut boxes);

        info!(
            "OCR complete: {} text boxes in {}ms",
            boxes.len(),
            start.elapsed().as_millis()
        );

        Ok(boxes)
    }

    /// Portrait images are turned a quarter counter-clockwise.
    fn orient(&self, image: &DynamicImage) -> DynamicImage {
        let (width, height) = image.dimensions();
        if self.config.rotate_portrait && height > width {
            debug!("Rotating portrait image {}x{}", width, height);
            image.rotate270()
        } else {
            image.clone()
        }
    }
}

impl LineSource for ImageLineSource {
    fn name(&self) -> &str {
        "pure-onnx-ocr"
    }

    fn read_lines(&self, input: &Path) -> Result<Vec<String>, OcrError> {
        let image = image::open(input)
            .map_err(|e| OcrError::InvalidImage(format!("{}: {}", input.display(), e)))?;

        Ok(self
            .recognize(&image)?
            .into_iter()
            .map(|b| b.text.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect())
    }
}

/// Convert a `Polygon<f64>` to our `[f32; 8]` bbox format.
fn polygon_to_bbox(polygon: &pure_onnx_ocr::Polygon<f64>) -> [f32; 8] {
    let mut bbox = [0.0f32; 8];
    for (i, coord) in polygon.exterior().coords().take(4).enumerate() {
        bbox[i * 2] = coord.x as f32;
        bbox[i * 2 + 1] = coord.y as f32;
    }
    bbox
}
