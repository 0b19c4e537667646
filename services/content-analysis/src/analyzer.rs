//! Engagement Analyzer
//!
//! Asks the language model for an assessment when one is configured and falls
//! back to the heuristic scorer whenever it is not, or when the call fails.

use postlens_models::AnalysisResult;
use postlens_utils::{LlmConfig, PostlensResult};
use tracing::{debug, warn};

use crate::llm_client::LlmClient;

pub struct EngagementAnalyzer {
    llm: Option<LlmClient>,
}

impl EngagementAnalyzer {
    pub fn new(llm: Option<LlmClient>) -> Self {
        Self { llm }
    }

    pub fn from_config(config: &LlmConfig) -> PostlensResult<Self> {
        Ok(Self::new(LlmClient::from_config(config)?))
    }

    /// Heuristic-only analyzer.
    pub fn offline() -> Self {
        Self::new(None)
    }

    pub fn uses_llm(&self) -> bool {
        self.llm.is_some()
    }

    /// Never fails: upstream errors are logged and answered by the heuristic.
    pub async fn analyze(&self, text: &str) -> AnalysisResult {
        let Some(client) = &self.llm else {
            debug!("No LLM API key configured, using heuristic analysis");
            return AnalysisResult::heuristic(text);
        };

        match client.analyze_engagement(text).await {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!(error = %e, model = client.model(), "LLM analysis failed, using heuristic analysis");
                AnalysisResult::heuristic(text)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::State, http::HeaderMap, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;

    #[derive(Clone)]
    struct MockLlm {
        status: StatusCode,
        reply: Value,
        seen: Arc<Mutex<Vec<(Option<String>, Value)>>>,
    }

    async fn chat_completions(
        State(mock): State<MockLlm>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        mock.seen.lock().unwrap().push((auth, body));

        (
            mock.status,
            Json(json!({
                "choices": [{"message": {"role": "assistant", "content": mock.reply}}]
            })),
        )
    }

    /// Serve a fake `/v1/chat/completions` on an ephemeral port.
    async fn spawn_mock_llm(status: StatusCode, reply: Value) -> (LlmConfig, MockLlm) {
        let mock = MockLlm {
            status,
            reply,
            seen: Arc::new(Mutex::new(Vec::new())),
        };
        let app = Router::new()
            .route("/v1/chat/completions", post(chat_completions))
            .with_state(mock.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let config = LlmConfig {
            api_url: format!("http://{}/v1", addr),
            api_key: Some("sk-test".to_string()),
            timeout_seconds: 5,
            ..LlmConfig::default()
        };
        (config, mock)
    }

    const MODEL_REPLY: &str = r#"{"score": 9, "suggestions": ["Lead with the giveaway", "Ask followers to tag a friend", "Post at peak hours"], "tone": "playful", "strengths": ["Strong hook"], "weaknesses": ["Too long"]}"#;

    #[tokio::test]
    async fn test_offline_uses_heuristic() {
        let analyzer = EngagementAnalyzer::offline();
        assert!(!analyzer.uses_llm());

        let analysis = analyzer.analyze("great job everyone, check this out!").await;
        assert_eq!(analysis, AnalysisResult::heuristic("great job everyone, check this out!"));
        assert_eq!(analysis.score, 6);
        assert_eq!(analysis.tone, "enthusiastic");
    }

    #[tokio::test]
    async fn test_llm_reply_is_used() {
        let (config, mock) = spawn_mock_llm(StatusCode::OK, json!(MODEL_REPLY)).await;
        let analyzer = EngagementAnalyzer::from_config(&config).unwrap();
        assert!(analyzer.uses_llm());

        let analysis = analyzer.analyze("Win a signed poster this weekend").await;
        assert_eq!(analysis.score, 9);
        assert_eq!(analysis.tone, "playful");
        assert_eq!(analysis.weaknesses, vec!["Too long".to_string()]);

        let seen = mock.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let (auth, body) = &seen[0];
        assert_eq!(auth.as_deref(), Some("Bearer sk-test"));
        assert_eq!(body["model"], "gpt-3.5-turbo");
        assert_eq!(body["max_tokens"], 500);
        assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert_eq!(body["messages"][0]["role"], "system");
        assert!(body["messages"][1]["content"]
            .as_str()
            .unwrap()
            .contains("Win a signed poster this weekend"));
    }

    #[tokio::test]
    async fn test_non_json_reply_falls_back() {
        let (config, _mock) =
            spawn_mock_llm(StatusCode::OK, json!("I'd rate this a 7 out of 10, nice work!")).await;
        let analyzer = EngagementAnalyzer::from_config(&config).unwrap();

        let text = "Please join our webinar next week";
        assert_eq!(analyzer.analyze(text).await, AnalysisResult::heuristic(text));
    }

    #[tokio::test]
    async fn test_null_reply_falls_back() {
        let (config, mock) = spawn_mock_llm(StatusCode::OK, Value::Null).await;
        let analyzer = EngagementAnalyzer::from_config(&config).unwrap();

        let text = "Thank you all, we appreciate every share";
        assert_eq!(analyzer.analyze(text).await, AnalysisResult::heuristic(text));
        assert_eq!(mock.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_json_null_text_reply_falls_back() {
        let (config, _mock) = spawn_mock_llm(StatusCode::OK, json!("null")).await;
        let analyzer = EngagementAnalyzer::from_config(&config).unwrap();

        let text = "Kindly RSVP by Friday";
        let analysis = analyzer.analyze(text).await;
        assert_eq!(analysis, AnalysisResult::heuristic(text));
        assert_eq!(analysis.tone, "professional");
    }

    #[tokio::test]
    async fn test_upstream_error_status_falls_back() {
        let (config, _mock) = spawn_mock_llm(StatusCode::TOO_MANY_REQUESTS, json!(MODEL_REPLY)).await;
        let analyzer = EngagementAnalyzer::from_config(&config).unwrap();

        let analysis = analyzer.analyze("Quarterly update for the team").await;
        assert_eq!(analysis.tone, "neutral");
        assert_eq!(analysis.strengths, vec!["Clear message delivery".to_string()]);
    }

    #[tokio::test]
    async fn test_unreachable_service_falls_back() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = LlmConfig {
            api_url: format!("http://{}/v1", addr),
            api_key: Some("sk-test".to_string()),
            timeout_seconds: 2,
            ..LlmConfig::default()
        };
        let analyzer = EngagementAnalyzer::from_config(&config).unwrap();

        let text = "Amazing deals all week long";
        assert_eq!(analyzer.analyze(text).await, AnalysisResult::heuristic(text));
    }
}
