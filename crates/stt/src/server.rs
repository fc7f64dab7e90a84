use std::time::Instant;

use axum::response::Response;
use dashscribe_config::FALLBACK_MODEL;
use secrecy::{ExposeSecret, SecretString};

use crate::{
    asr::{AsrClient, AsrRequest},
    error::{Result, SttError},
    format::ResponseFormat,
    http_client::http_client,
    timing::{elapsed_ms, iso8601},
    translate::UploadInfo,
    types::TranscriptionForm,
    upload::Uploader,
    validation::{validate_file, validate_language},
};

/// Transcription server that stages audio and calls the `DashScope` ASR API
pub struct Server {
    api_key: Option<SecretString>,
    default_model: Option<String>,
    uploader: Uploader,
    asr: AsrClient,
}

impl Server {
    /// Run one transcription request through validation, upload, ASR and rendering
    pub(crate) async fn transcribe(&self, form: TranscriptionForm, started: Instant) -> Result<Response> {
        let api_key = self.api_key.as_ref().ok_or(SttError::MissingApiKey)?;

        let file = validate_file(form.file)?;
        let language = validate_language(form.language.as_deref())?;

        tracing::debug!(
            file_name = file.name.as_deref(),
            file_size = file.size,
            content_type = %file.content_type,
            model = form.model.as_deref(),
            language = language.map(crate::language::Language::code),
            response_format = form.response_format.as_deref(),
            temperature = form.temperature.as_deref(),
            "transcription request"
        );

        let model = self.resolve_model(form.model);

        let object = self.uploader.upload_file_and_get_url(api_key, &model, file).await?;

        tracing::debug!(
            object_url = %object.url,
            expire_time = %iso8601(object.expires_at),
            "file uploaded"
        );

        let response = self
            .asr
            .transcribe(
                api_key,
                AsrRequest {
                    audio_url: &object.url,
                    model: &model,
                    language,
                    enable_itn: true,
                    context: None,
                },
            )
            .await?;

        let processing_time_ms = elapsed_ms(started);
        let format = ResponseFormat::parse(form.response_format.as_deref())?;

        let upload = UploadInfo {
            object,
            model_used: model,
        };

        tracing::debug!(?format, processing_time_ms, "transcription complete");

        Ok(format.render(&response, processing_time_ms, &upload))
    }

    /// Form value, then configured default, then the fallback model
    fn resolve_model(&self, requested: Option<String>) -> String {
        requested
            .filter(|model| !model.is_empty())
            .or_else(|| self.default_model.clone().filter(|model| !model.is_empty()))
            .unwrap_or_else(|| FALLBACK_MODEL.to_owned())
    }
}

/// Builder for constructing the transcription server from configuration
pub(crate) struct SttServerBuilder<'a> {
    config: &'a dashscribe_config::Config,
}

impl<'a> SttServerBuilder<'a> {
    pub fn new(config: &'a dashscribe_config::Config) -> Self {
        Self { config }
    }

    pub fn build(self) -> Result<Server> {
        let dashscope = &self.config.dashscope;

        let timeout = dashscope
            .request_timeout()
            .map_err(|e| SttError::ConfigError(e.to_string()))?;

        let client = http_client(timeout).map_err(|e| SttError::ConfigError(format!("failed to build HTTP client: {e}")))?;

        let api_key = dashscope
            .api_key
            .clone()
            .filter(|key| !key.expose_secret().is_empty());

        if api_key.is_none() {
            tracing::warn!("DashScope API key not configured, transcription requests will fail");
        }

        let region = dashscope.region();

        tracing::debug!(
            region = region.as_str(),
            storage_url = %dashscope.storage_url,
            timeout = ?timeout,
            "transcription server initialized"
        );

        Ok(Server {
            api_key,
            default_model: dashscope.default_model.clone(),
            uploader: Uploader::new(
                client.clone(),
                dashscope.storage_url.clone(),
                dashscope.upload_validity_hours,
            ),
            asr: AsrClient::new(client, &dashscope.endpoints, region),
        })
    }
}
