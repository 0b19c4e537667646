//! Image OCR
//!
//! Decodes uploaded images with the `image` crate and reads their text with
//! the Tesseract command-line tool. Images are normalized to PNG first so
//! Tesseract never sees a format its build lacks a codec for (GIF, some TIFFs).

use image::{ImageFormat, ImageReader};
use postlens_utils::{OcrConfig, PostlensError, PostlensResult};
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Tesseract-backed OCR engine
pub struct OcrEngine {
    config: OcrConfig,
}

impl OcrEngine {
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }

    /// Recognize the text in an image file, trimmed of surrounding whitespace.
    pub fn extract_file(&self, path: &Path) -> PostlensResult<String> {
        let image = ImageReader::open(path)
            .map_err(ocr_error)?
            .with_guessed_format()
            .map_err(ocr_error)?
            .decode()
            .map_err(ocr_error)?;

        debug!(
            width = image.width(),
            height = image.height(),
            "Decoded image for OCR"
        );

        let normalized = tempfile::Builder::new()
            .prefix("postlens-ocr-")
            .suffix(".png")
            .tempfile()?;
        image
            .save_with_format(normalized.path(), ImageFormat::Png)
            .map_err(ocr_error)?;

        let text = self.run_tesseract(normalized.path())?;
        Ok(text.trim().to_string())
    }

    /// Run Tesseract on an image file.
    fn run_tesseract(&self, image_path: &Path) -> PostlensResult<String> {
        let output = Command::new(&self.config.tesseract_path)
            .arg(image_path)
            .arg("stdout")
            .args(["-l", &self.config.language])
            .output();

        match output {
            Ok(output) if output.status.success() => {
                Ok(String::from_utf8_lossy(&output.stdout).to_string())
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(ocr_error(format!("tesseract failed: {}", stderr.trim())))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ocr_error(format!(
                "{} not found (install tesseract-ocr)",
                self.config.tesseract_path
            ))),
            Err(e) => Err(ocr_error(e)),
        }
    }
}

impl Default for OcrEngine {
    fn default() -> Self {
        Self::new(OcrConfig::default())
    }
}

fn ocr_error(cause: impl std::fmt::Display) -> PostlensError {
    PostlensError::extraction(format!("Error extracting text from image: {}", cause))
}
