use std::time::Instant;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use jiff::Timestamp;
use serde::Serialize;
use thiserror::Error;

use crate::{
    format::ResponseFormat,
    language::Language,
    timing::{elapsed_ms, iso8601},
};

pub type Result<T> = std::result::Result<T, SttError>;

/// Reason an upstream call failed
#[derive(Debug, Error)]
pub enum ProviderFailure {
    /// Non-success HTTP status, with the provider's body verbatim
    #[error("{status} {body}")]
    Status { status: u16, body: String },

    /// The request never produced a response
    #[error("{0}")]
    Transport(String),

    /// The response body did not have the expected shape
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ProviderFailure {
    pub(crate) fn transport(error: &reqwest::Error) -> Self {
        Self::Transport(error.to_string())
    }

    pub(crate) fn decode(error: &reqwest::Error) -> Self {
        Self::Decode(error.to_string())
    }
}

/// Client-side problems with the uploaded form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("No file provided")]
    NoFile,

    #[error("File too large")]
    FileTooLarge,

    #[error("File type not allowed")]
    FileTypeNotAllowed,

    #[error("Unsupported language")]
    UnsupportedLanguage,
}

/// Transcription pipeline errors
#[derive(Debug, Error)]
pub enum SttError {
    /// No (or an empty) `DashScope` API key is configured
    #[error("API key not configured")]
    MissingApiKey,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// `response_format` is not one of the supported renderings
    #[error("Unsupported response_format")]
    UnsupportedFormat(String),

    /// The multipart body could not be read
    #[error("Failed to read request: {0}")]
    MalformedRequest(String),

    #[error("Upload policy request failed: {0}")]
    UploadPolicy(ProviderFailure),

    #[error("File upload failed: {0}")]
    ObjectUpload(ProviderFailure),

    #[error("ASR service call failed: {0}")]
    AsrService(ProviderFailure),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SttError {
    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::UnsupportedFormat(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the request got past validation before failing
    ///
    /// Such failures carry timing information in the response.
    fn is_pipeline_failure(&self) -> bool {
        !matches!(
            self,
            Self::MissingApiKey | Self::Validation(_) | Self::UnsupportedFormat(_)
        )
    }
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    supported_languages: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    supported_formats: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    processing_time_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,
}

/// An error bound to the moment its request started
///
/// Pipeline failures report how long the request ran before failing.
#[derive(Debug)]
pub struct Failure {
    error: SttError,
    started: Instant,
}

impl Failure {
    pub fn new(error: SttError, started: Instant) -> Self {
        Self { error, started }
    }

    pub fn error(&self) -> &SttError {
        &self.error
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let status = self.error.status_code();

        let mut body = ErrorBody {
            error: self.error.to_string(),
            supported_languages: None,
            supported_formats: None,
            processing_time_ms: None,
            timestamp: None,
        };

        match &self.error {
            SttError::Validation(ValidationError::UnsupportedLanguage) => {
                body.supported_languages = Some(Language::supported_codes());
            }
            SttError::UnsupportedFormat(requested) => {
                tracing::debug!(response_format = %requested, "unsupported response format");
                body.supported_formats = Some(ResponseFormat::supported());
            }
            error if error.is_pipeline_failure() => {
                let processing_time_ms = elapsed_ms(self.started);
                let timestamp = iso8601(Timestamp::now());

                tracing::error!(error = %error, processing_time_ms, %timestamp, "transcription request failed");

                body.processing_time_ms = Some(processing_time_ms);
                body.timestamp = Some(timestamp);
            }
            _ => {}
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(failure: Failure) -> (StatusCode, serde_json::Value) {
        let response = failure.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();

        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn validation_errors_are_bad_requests() {
        let (status, body) = body_of(Failure::new(ValidationError::FileTooLarge.into(), Instant::now())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({ "error": "File too large" }));
    }

    #[tokio::test]
    async fn unsupported_language_lists_codes() {
        let (status, body) =
            body_of(Failure::new(ValidationError::UnsupportedLanguage.into(), Instant::now())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Unsupported language");
        assert_eq!(body["supported_languages"].as_array().unwrap().len(), 18);
        assert!(body.get("processing_time_ms").is_none());
    }

    #[tokio::test]
    async fn unsupported_format_lists_formats() {
        let (status, body) =
            body_of(Failure::new(SttError::UnsupportedFormat("vtt".to_owned()), Instant::now())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            serde_json::json!({
                "error": "Unsupported response_format",
                "supported_formats": ["json", "text", "srt", "verbose_json"]
            })
        );
    }

    #[tokio::test]
    async fn missing_key_has_no_timing() {
        let (status, body) = body_of(Failure::new(SttError::MissingApiKey, Instant::now())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({ "error": "API key not configured" }));
    }

    #[tokio::test]
    async fn provider_failures_carry_status_body_and_timing() {
        let error = SttError::UploadPolicy(ProviderFailure::Status {
            status: 429,
            body: "Throttling.RateQuota".to_owned(),
        });

        let (status, body) = body_of(Failure::new(error, Instant::now())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let message = body["error"].as_str().unwrap();
        assert!(message.contains("429"));
        assert!(message.contains("Throttling.RateQuota"));
        assert!(body["processing_time_ms"].is_u64());
        assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
    }
}
