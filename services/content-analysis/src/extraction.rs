//! Document Extraction Service
//!
//! Dispatches a persisted upload to the PDF processor or the OCR engine.

use postlens_models::{ExtractionResult, FileKind};
use postlens_utils::{OcrConfig, PostlensError, PostlensResult};
use std::path::Path;
use tracing::info;

use crate::ocr::OcrEngine;
use crate::pdf_processor::PdfProcessor;

/// Below this many trimmed characters an upload is treated as textless.
pub const MIN_EXTRACTED_CHARS: usize = 10;

/// Document extractor service
pub struct DocumentExtractor {
    pdf_processor: PdfProcessor,
    ocr_engine: OcrEngine,
}

impl DocumentExtractor {
    pub fn new(ocr_config: OcrConfig) -> Self {
        Self {
            pdf_processor: PdfProcessor::new(),
            ocr_engine: OcrEngine::new(ocr_config),
        }
    }

    /// Extract text from a file on disk. Blocking; run it off the async runtime.
    pub fn extract(&self, path: &Path, kind: FileKind) -> PostlensResult<ExtractionResult> {
        let text = match kind {
            FileKind::Pdf => {
                let content = self.pdf_processor.extract_file(path)?;
                info!(pages = content.page_count(), "Extracted PDF text");
                content.text
            }
            FileKind::Image => self.ocr_engine.extract_file(path)?,
        };

        ensure_min_text(ExtractionResult::new(text))
    }
}

impl Default for DocumentExtractor {
    fn default() -> Self {
        Self::new(OcrConfig::default())
    }
}

/// Reject extractions too short to be worth analyzing.
pub fn ensure_min_text(extraction: ExtractionResult) -> PostlensResult<ExtractionResult> {
    if extraction.has_min_text(MIN_EXTRACTED_CHARS) {
        Ok(extraction)
    } else {
        Err(PostlensError::extraction(
            "No text could be extracted from the file",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_min_text_boundary() {
        let ok = ensure_min_text(ExtractionResult::new("0123456789")).unwrap();
        assert_eq!(ok.char_count, 10);

        let err = ensure_min_text(ExtractionResult::new("012345678")).unwrap_err();
        assert_eq!(err.to_string(), "No text could be extracted from the file");
        assert_eq!(err.http_status_code(), 400);
    }

    #[test]
    fn test_ensure_min_text_ignores_padding() {
        assert!(ensure_min_text(ExtractionResult::new("   \n\t  abc   \n ")).is_err());
        assert!(ensure_min_text(ExtractionResult::new("")).is_err());
    }

    #[test]
    fn test_extract_dispatches_on_kind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload.bin");
        std::fs::write(&path, b"neither a pdf nor an image").unwrap();

        let extractor = DocumentExtractor::default();

        let pdf_err = extractor.extract(&path, FileKind::Pdf).unwrap_err();
        assert!(pdf_err.to_string().contains("from PDF"));

        let image_err = extractor.extract(&path, FileKind::Image).unwrap_err();
        assert!(image_err.to_string().contains("from image"));
    }
}
