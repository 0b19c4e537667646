//! Engagement analysis models and the offline heuristic scorer.
//!
//! `AnalysisResult` is what the analyze endpoint returns, whether it came from
//! the language model or from [`AnalysisResult::heuristic`].

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::document::{char_count, word_count};

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 10;

const BASE_SCORE: i64 = 5;
const SHORT_CONTENT_WORDS: usize = 20;

const ENTHUSIASTIC_WORDS: [&str; 4] = ["exciting", "amazing", "great", "awesome"];
const PROFESSIONAL_WORDS: [&str; 3] = ["please", "kindly", "appreciate"];

const DEFAULT_SUGGESTIONS: [&str; 3] = [
    "Consider adding more engaging hooks in the opening lines",
    "Use questions to encourage audience interaction",
    "Include relevant hashtags and mentions to increase reach",
];

pub const CLEAR_MESSAGE_STRENGTH: &str = "Clear message delivery";
pub const ENGAGEMENT_WEAKNESS: &str = "Could benefit from more engaging elements";
pub const SHORT_CONTENT_WEAKNESS: &str = "Content is too short for optimal engagement";

/// Engagement assessment of a piece of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct AnalysisResult {
    #[validate(range(min = 1, max = 10, message = "Score must be between 1 and 10"))]
    pub score: u8,
    #[validate(length(min = 1, message = "At least one suggestion is required"))]
    pub suggestions: Vec<String>,
    #[validate(length(min = 1, message = "Tone is required"))]
    pub tone: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

/// Tone labels the heuristic scorer can assign. Model replies may use others.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Enthusiastic,
    Professional,
    Neutral,
}

impl Tone {
    /// Keyword match on the lowercased text; enthusiasm is checked first.
    pub fn detect(text: &str) -> Self {
        let lowered = text.to_lowercase();

        if ENTHUSIASTIC_WORDS.iter().any(|word| lowered.contains(word)) {
            Self::Enthusiastic
        } else if PROFESSIONAL_WORDS.iter().any(|word| lowered.contains(word)) {
            Self::Professional
        } else {
            Self::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enthusiastic => "enthusiastic",
            Self::Professional => "professional",
            Self::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clamp any raw score into `MIN_SCORE..=MAX_SCORE`.
pub fn clamp_score(raw: i64) -> u8 {
    raw.clamp(MIN_SCORE as i64, MAX_SCORE as i64) as u8
}

impl AnalysisResult {
    /// Deterministic scoring used when no language model answer is available.
    ///
    /// Total over every input, including the empty string.
    pub fn heuristic(text: &str) -> Self {
        let words = word_count(text);
        let chars = char_count(text);

        let mut score = BASE_SCORE;
        if words > 50 && words < 200 {
            score += 2;
        }
        if chars > 0 {
            score += 1;
        }

        let mut weaknesses = vec![ENGAGEMENT_WEAKNESS.to_string()];
        if words < SHORT_CONTENT_WORDS {
            weaknesses.push(SHORT_CONTENT_WEAKNESS.to_string());
        }

        Self {
            score: clamp_score(score),
            suggestions: DEFAULT_SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
            tone: Tone::detect(text).to_string(),
            strengths: vec![CLEAR_MESSAGE_STRENGTH.to_string()],
            weaknesses,
        }
    }
}
