//! Postlens Content Analysis Service
//!
//! Accepts an uploaded PDF or image, extracts its text and scores how well it
//! is likely to engage a social media audience.

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    response::Json,
    routing::{get, post},
    Router,
};
use postlens_utils::{init_logging, AppConfig, API_KEY_ENV_VAR, MAX_FILE_SIZE};
use serde_json::json;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

mod analyzer;
mod extraction;
mod handlers;
mod llm_client;
mod ocr;
mod pdf_processor;
mod upload;

use analyzer::EngagementAnalyzer;
use extraction::DocumentExtractor;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration ({}), using defaults", e);
        let mut config = AppConfig::default();
        config.llm.resolve_api_key(std::env::var(API_KEY_ENV_VAR).ok());
        config
    });

    init_logging(&config.logging)?;
    info!("Starting Postlens Content Analysis Service");

    tokio::fs::create_dir_all(&config.uploads.directory)
        .await
        .with_context(|| {
            format!(
                "Failed to create upload directory {}",
                config.uploads.directory.display()
            )
        })?;

    let state = AppState::from_config(&config)?;
    info!(
        llm_enabled = state.analyzer.uses_llm(),
        upload_dir = %state.upload_dir.display(),
        "Service configured"
    );

    let app = create_app(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;
    let listener = TcpListener::bind(&addr).await?;
    info!("Content Analysis Service listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Shared, read-only request state.
#[derive(Clone)]
pub struct AppState {
    pub upload_dir: Arc<PathBuf>,
    pub extractor: Arc<DocumentExtractor>,
    pub analyzer: Arc<EngagementAnalyzer>,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> postlens_utils::PostlensResult<Self> {
        Ok(Self {
            upload_dir: Arc::new(config.uploads.directory.clone()),
            extractor: Arc::new(DocumentExtractor::new(config.ocr.clone())),
            analyzer: Arc::new(EngagementAnalyzer::from_config(&config.llm)?),
        })
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/analyze", post(handlers::analyze_content))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods([Method::GET, Method::POST])
                        .allow_headers([header::CONTENT_TYPE]),
                )
                .layer(DefaultBodyLimit::max(MAX_FILE_SIZE)),
        )
        .with_state(state)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}
