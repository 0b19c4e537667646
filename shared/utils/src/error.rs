use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validation::MAX_FILE_SIZE_MB;

#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum PostlensError {
    #[error("{message}")]
    Validation { message: String },

    #[error("{message}")]
    Extraction { message: String },

    #[error("File too large. Maximum size is {}MB", MAX_FILE_SIZE_MB)]
    PayloadTooLarge,

    #[error("External service error: {service} - {message}")]
    ExternalService { service: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("{message}")]
    Internal { message: String },
}

impl PostlensError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction {
            message: message.into(),
        }
    }

    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExternalService {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Extraction { .. } => "EXTRACTION_ERROR",
            Self::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            Self::ExternalService { .. } => "EXTERNAL_SERVICE_ERROR",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::Internal { .. } => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::Extraction { .. } => 400,
            Self::PayloadTooLarge => 413,
            Self::ExternalService { .. } => 502,
            Self::Configuration { .. } => 500,
            Self::Internal { .. } => 500,
        }
    }
}

pub type PostlensResult<T> = Result<T, PostlensError>;

/// Body of every non-200 response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<PostlensError> for ErrorResponse {
    fn from(error: PostlensError) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}

impl From<reqwest::Error> for PostlensError {
    fn from(error: reqwest::Error) -> Self {
        Self::external_service("HTTP Client", error.to_string())
    }
}

impl From<serde_json::Error> for PostlensError {
    fn from(error: serde_json::Error) -> Self {
        Self::external_service("JSON", error.to_string())
    }
}

impl From<std::io::Error> for PostlensError {
    fn from(error: std::io::Error) -> Self {
        Self::internal(error.to_string())
    }
}
