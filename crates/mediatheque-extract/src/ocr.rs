//! Optical text recognition over images.
//!
//! The engine holds loaded detection and recognition models, which are
//! expensive to initialize. Construct one `TextRecognizer` per process and
//! share it via `Arc`; it is injected into the image extractor rather than
//! living in global state.

use std::path::Path;

use anyhow::Context;
use ocrs::{ImageSource, OcrEngine, OcrEngineParams};
use rten::Model;

/// OCR engine with loaded model state.
pub struct TextRecognizer {
    engine: OcrEngine,
}

impl TextRecognizer {
    /// Load both models and build the engine. Expensive; call once.
    pub fn load(detection_model: &Path, recognition_model: &Path) -> Result<Self, anyhow::Error> {
        let detection = Model::load_file(detection_model).with_context(|| {
            format!(
                "Failed to load OCR detection model {}",
                detection_model.display()
            )
        })?;
        let recognition = Model::load_file(recognition_model).with_context(|| {
            format!(
                "Failed to load OCR recognition model {}",
                recognition_model.display()
            )
        })?;

        let engine = OcrEngine::new(OcrEngineParams {
            detection_model: Some(detection),
            recognition_model: Some(recognition),
            ..Default::default()
        })
        .map_err(|e| anyhow::anyhow!("Failed to initialize OCR engine: {}", e))?;

        tracing::info!(
            detection_model = %detection_model.display(),
            recognition_model = %recognition_model.display(),
            "OCR engine initialized"
        );

        Ok(TextRecognizer { engine })
    }

    /// Recognize text in the image and concatenate the detected fragments
    /// in detection order, separated by single spaces.
    pub fn recognize(&self, image: &image::RgbImage) -> Result<String, anyhow::Error> {
        let source = ImageSource::from_bytes(image.as_raw(), image.dimensions())
            .map_err(|e| anyhow::anyhow!("Failed to build OCR input: {}", e))?;
        let input = self
            .engine
            .prepare_input(source)
            .map_err(|e| anyhow::anyhow!("Failed to prepare OCR input: {}", e))?;

        let words = self
            .engine
            .detect_words(&input)
            .map_err(|e| anyhow::anyhow!("Text detection failed: {}", e))?;
        let lines = self.engine.find_text_lines(&input, &words);
        let recognized = self
            .engine
            .recognize_text(&input, &lines)
            .map_err(|e| anyhow::anyhow!("Text recognition failed: {}", e))?;

        let mut fragments = Vec::new();
        for line in recognized.into_iter().flatten() {
            let text = line.to_string();
            let text = text.trim();
            if !text.is_empty() {
                fragments.push(text.to_string());
            }
        }

        Ok(fragments.join(" "))
    }
}
