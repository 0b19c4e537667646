//! LLM Client
//!
//! Integrates with OpenAI-compatible chat completion APIs to assess the
//! engagement quality of extracted content.

use postlens_models::{clamp_score, truncate_chars, AnalysisResult};
use postlens_utils::{validate_model, LlmConfig, PostlensError, PostlensResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SERVICE_NAME: &str = "LLM";

/// Only this many characters of content are sent to the model.
pub const PROMPT_CONTENT_CHARS: usize = 2000;

/// Chat completion client for engagement analysis
pub struct LlmClient {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl LlmClient {
    /// Build a client from configuration. Returns `Ok(None)` when no API key is set.
    pub fn from_config(config: &LlmConfig) -> PostlensResult<Option<Self>> {
        let Some(api_key) = config.api_key.clone() else {
            return Ok(None);
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| PostlensError::configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Some(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Ask the model for an engagement assessment of `content`.
    pub async fn analyze_engagement(&self, content: &str) -> PostlensResult<AnalysisResult> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: build_prompt(content),
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(PostlensError::external_service(
                SERVICE_NAME,
                format!("{}: {}", status, error_text),
            ));
        }

        let result: ChatResponse = response.json().await?;

        let content = result
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| PostlensError::external_service(SERVICE_NAME, "No response content"))?;

        parse_assessment(content)
    }
}

/// Build the user prompt around the first [`PROMPT_CONTENT_CHARS`] characters.
pub fn build_prompt(content: &str) -> String {
    format!(
        r#"Analyze the following social media content and provide specific engagement improvement suggestions.

Content:
{}

Provide:
1. Overall engagement score (1-10)
2. Three specific suggestions to improve engagement
3. Tone analysis (e.g., professional, casual, enthusiastic)
4. Key strengths and weaknesses

Format your response as JSON with keys: score, suggestions (array), tone, strengths (array), weaknesses (array)"#,
        truncate_chars(content, PROMPT_CONTENT_CHARS)
    )
}

/// Parse the model's reply strictly as the JSON assessment object.
pub fn parse_assessment(content: &str) -> PostlensResult<AnalysisResult> {
    let assessment: ModelAssessment = serde_json::from_str(content.trim())?;
    let analysis = AnalysisResult::from(assessment);

    validate_model(&analysis)
        .map_err(|e| PostlensError::external_service(SERVICE_NAME, e.to_string()))?;

    Ok(analysis)
}

/// Assessment as the model writes it; scores may arrive as floats.
#[derive(Debug, Deserialize)]
struct ModelAssessment {
    score: f64,
    suggestions: Vec<String>,
    tone: String,
    strengths: Vec<String>,
    weaknesses: Vec<String>,
}

impl From<ModelAssessment> for AnalysisResult {
    fn from(assessment: ModelAssessment) -> Self {
        Self {
            score: clamp_score(assessment.score.round() as i64),
            suggestions: assessment.suggestions,
            tone: assessment.tone,
            strengths: assessment.strengths,
            weaknesses: assessment.weaknesses,
        }
    }
}

/// Chat completion request
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Chat completion response
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

const SYSTEM_PROMPT: &str =
    "You are a social media expert analyzing content for engagement optimization.";
