#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

mod asr;
mod error;
mod format;
mod http_client;
mod language;
mod request;
mod server;
mod timing;
mod translate;
mod types;
mod upload;
mod validation;

use std::sync::Arc;

use axum::{
    Router,
    extract::{DefaultBodyLimit, State},
    response::Response,
    routing::post,
};

pub use error::{Failure, ProviderFailure, Result, SttError, ValidationError};
pub use format::ResponseFormat;
pub use language::Language;
pub use request::ExtractTranscription;
pub use server::Server;
pub use types::{TranscriptionForm, TranscriptionResult, UploadedFile, VerboseTranscriptionResult};
pub use validation::{ALLOWED_CONTENT_TYPES, MAX_FILE_SIZE};

use server::SttServerBuilder;

/// Build the transcription server from configuration
///
/// # Errors
///
/// Returns an error if the server fails to initialize
pub fn build_server(config: &dashscribe_config::Config) -> anyhow::Result<Arc<Server>> {
    let server = Arc::new(
        SttServerBuilder::new(config)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to initialize transcription server: {e}"))?,
    );
    Ok(server)
}

/// Create the endpoint router for transcriptions
///
/// The body limit is lifted so oversized uploads reach validation and are
/// rejected as "File too large".
pub fn endpoint_router() -> Router<Arc<Server>> {
    Router::new()
        .route("/v1/audio/transcriptions", post(transcribe))
        .layer(DefaultBodyLimit::disable())
}

/// Handle transcription requests
async fn transcribe(
    State(server): State<Arc<Server>>,
    ExtractTranscription(form, started): ExtractTranscription,
) -> std::result::Result<Response, Failure> {
    server
        .transcribe(form, started)
        .await
        .map_err(|error| Failure::new(error, started))
}
