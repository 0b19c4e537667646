//! # Postlens Core Domain Models
//!
//! This module contains the domain models shared by the Postlens services.
//! All models implement serialization/deserialization with serde.
//!
//! ## Key Models
//!
//! - **UploadedFile**: A document received for analysis, tagged with its [`FileKind`]
//! - **ExtractionResult**: Plain text pulled from a document with its character and word counts
//! - **AnalysisResult**: Engagement score, suggestions, tone, strengths and weaknesses
//!
//! ## Heuristic Scoring
//!
//! [`AnalysisResult::heuristic`] is the offline scorer used when no language
//! model is configured or the model call fails. It is pure and never fails.

pub mod analysis;
pub mod document;


pub use analysis::*;
pub use document::*;
