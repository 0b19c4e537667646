//! Analyze Handler
//!
//! POST /api/analyze: validate the `file` field, persist it, extract its
//! text, analyze it and report. The persisted copy is removed on every path.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::{header, HeaderMap, StatusCode},
    response::Json,
};
use postlens_models::{AnalysisResult, UploadedFile};
use postlens_utils::{
    validate_file_size, validate_upload_filename, ErrorResponse, PostlensError, PostlensResult,
    MAX_FILE_SIZE,
};
use serde::Serialize;
use tracing::{error, info};

use crate::upload::TempUpload;
use crate::AppState;

/// Characters of extracted text echoed back to the client.
const PREVIEW_CHARS: usize = 1000;

const FILE_FIELD: &str = "file";

/// Analyze response
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub extracted_text: String,
    pub full_text_length: usize,
    pub word_count: usize,
    pub analysis: AnalysisResult,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

pub async fn analyze_content(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    run_analysis(&state, &headers, multipart)
        .await
        .map(Json)
        .map_err(error_reply)
}

async fn run_analysis(
    state: &AppState,
    headers: &HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> PostlensResult<AnalyzeResponse> {
    if content_length(headers).is_some_and(|len| len > MAX_FILE_SIZE) {
        return Err(PostlensError::PayloadTooLarge);
    }

    let multipart = multipart.map_err(|_| PostlensError::validation("No file provided"))?;
    let (filename, data) = read_file_field(multipart)
        .await?
        .ok_or_else(|| PostlensError::validation("No file provided"))?;

    let kind = validate_upload_filename(Some(&filename))?;
    validate_file_size(data.len(), MAX_FILE_SIZE)?;
    let upload = UploadedFile {
        filename,
        kind,
        data,
    };

    let stored = TempUpload::persist(&state.upload_dir, &upload).await?;

    let extractor = state.extractor.clone();
    let path = stored.path().to_path_buf();
    let extraction = tokio::task::spawn_blocking(move || extractor.extract(&path, kind))
        .await
        .map_err(|e| PostlensError::internal(format!("Extraction task failed: {}", e)))??;

    let analysis = state.analyzer.analyze(&extraction.text).await;
    drop(stored);

    info!(
        filename = %upload.filename,
        kind = kind.as_str(),
        chars = extraction.char_count,
        words = extraction.word_count,
        score = analysis.score,
        "Analyzed upload"
    );

    Ok(AnalyzeResponse {
        extracted_text: extraction.preview(PREVIEW_CHARS),
        full_text_length: extraction.char_count,
        word_count: extraction.word_count,
        analysis,
    })
}

/// Read the `file` part, draining the rest of the body so oversize requests
/// surface as errors. Parts without a filename are form fields, not files.
async fn read_file_field(mut multipart: Multipart) -> PostlensResult<Option<(String, Vec<u8>)>> {
    let mut file = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if file.is_some() || field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };

        let data = field.bytes().await.map_err(multipart_error)?;
        file = Some((filename, data.to_vec()));
    }

    Ok(file)
}

fn content_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

fn multipart_error(e: MultipartError) -> PostlensError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        PostlensError::PayloadTooLarge
    } else {
        PostlensError::validation(format!("Failed to read upload: {}", e.body_text()))
    }
}

fn error_reply(err: PostlensError) -> ApiError {
    let status =
        StatusCode::from_u16(err.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if status.is_server_error() {
        error!(error = %err, code = err.error_code(), "Analyze request failed");
    } else {
        info!(error = %err, code = err.error_code(), "Analyze request rejected");
    }

    (status, Json(ErrorResponse::from(err)))
}
