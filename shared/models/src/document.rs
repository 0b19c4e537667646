//! Uploaded document and extraction models.

use serde::{Deserialize, Serialize};

/// Extensions accepted for upload, in the order they are reported to clients.
pub const SUPPORTED_EXTENSIONS: [&str; 7] = ["pdf", "png", "jpg", "jpeg", "gif", "bmp", "tiff"];

/// How text is pulled out of an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Pdf,
    Image,
}

impl FileKind {
    /// Classify a bare extension (without the dot), ignoring case.
    pub fn from_extension(extension: &str) -> Option<Self> {
        let extension = extension.to_ascii_lowercase();
        if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
            return None;
        }

        if extension == "pdf" {
            Some(Self::Pdf)
        } else {
            Some(Self::Image)
        }
    }

    /// Classify a filename by the text after its last `.`.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, extension) = filename.rsplit_once('.')?;
        Self::from_extension(extension)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Image => "image",
        }
    }
}

/// A file received on the analyze endpoint, before it touches disk.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub kind: FileKind,
    pub data: Vec<u8>,
}

impl UploadedFile {
    /// Returns `None` when the filename carries no supported extension.
    pub fn new(filename: impl Into<String>, data: Vec<u8>) -> Option<Self> {
        let filename = filename.into();
        let kind = FileKind::from_filename(&filename)?;
        Some(Self {
            filename,
            kind,
            data,
        })
    }

    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}

/// Text pulled from a document plus the metrics reported alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub text: String,
    pub char_count: usize,
    pub word_count: usize,
}

impl ExtractionResult {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            char_count: char_count(&text),
            word_count: word_count(&text),
            text,
        }
    }

    /// True when the trimmed text holds at least `min_chars` characters.
    pub fn has_min_text(&self, min_chars: usize) -> bool {
        char_count(self.text.trim()) >= min_chars
    }

    /// The first `max_chars` characters of the text.
    pub fn preview(&self, max_chars: usize) -> String {
        truncate_chars(&self.text, max_chars).to_string()
    }
}

/// Number of whitespace-delimited tokens.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Length in characters, not bytes.
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// Cut `text` to at most `max_chars` characters without splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
