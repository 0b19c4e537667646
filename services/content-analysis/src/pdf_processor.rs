//! PDF Processor
//!
//! Extracts page text from PDF documents.

use postlens_utils::{PostlensError, PostlensResult};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;

/// PDF processing result
#[derive(Debug, Clone)]
pub struct PdfContent {
    pub text: String,
    pub pages: Vec<PageContent>,
}

/// Single page content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContent {
    pub page_number: usize,
    pub text: String,
}

impl PdfContent {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// PDF processor
pub struct PdfProcessor;

impl PdfProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Extract content from a PDF on disk
    pub fn extract_file(&self, path: &Path) -> PostlensResult<PdfContent> {
        let data = std::fs::read(path)?;
        self.extract(&data)
    }

    /// Extract content from PDF bytes, page by page in document order
    pub fn extract(&self, data: &[u8]) -> PostlensResult<PdfContent> {
        // pdf_extract can panic on malformed input
        let result = catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(data)
        }));

        let page_texts = match result {
            Ok(Ok(pages)) => pages,
            Ok(Err(e)) => return Err(pdf_error(e)),
            Err(_) => return Err(pdf_error("malformed PDF")),
        };

        let pages: Vec<PageContent> = page_texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| PageContent {
                page_number: index + 1,
                text,
            })
            .collect();

        Ok(PdfContent {
            text: join_pages(&pages),
            pages,
        })
    }
}

impl Default for PdfProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Each page followed by a newline, with the outer whitespace trimmed.
pub fn join_pages(pages: &[PageContent]) -> String {
    let mut text = String::new();
    for page in pages {
        text.push_str(&page.text);
        text.push('\n');
    }
    text.trim().to_string()
}

fn pdf_error(cause: impl std::fmt::Display) -> PostlensError {
    PostlensError::extraction(format!("Error extracting text from PDF: {}", cause))
}
