mod wire;

use dashscribe_config::{AsrEndpoints, Region};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

pub use wire::AsrResponse;
use wire::{AsrEnvelope, AsrOptions, Content, Input, Message, Parameters};

use crate::{
    error::{ProviderFailure, Result, SttError},
    language::Language,
};

/// Asks `DashScope` to resolve `oss://` references from temporary storage
const OSS_RESOURCE_RESOLVE_HEADER: &str = "X-DashScope-OssResourceResolve";

/// One ASR call
#[derive(Debug)]
pub(crate) struct AsrRequest<'a> {
    /// `oss://` locator of the staged audio
    pub audio_url: &'a str,
    pub model: &'a str,
    /// Language hint, auto-detected when `None`
    pub language: Option<Language>,
    /// Inverse text normalization ("one hundred" -> "100")
    pub enable_itn: bool,
    /// Free-text context given to the model as a system message
    pub context: Option<&'a str>,
}

/// Client for the region-selected multimodal-generation endpoint
pub(crate) struct AsrClient {
    client: Client,
    region: Region,
    endpoint: Url,
}

impl AsrClient {
    pub fn new(client: Client, endpoints: &AsrEndpoints, region: Region) -> Self {
        Self {
            client,
            region,
            endpoint: endpoints.for_region(region).clone(),
        }
    }

    pub async fn transcribe(&self, api_key: &SecretString, request: AsrRequest<'_>) -> Result<AsrResponse> {
        let context = request.context.unwrap_or_default();

        let envelope = AsrEnvelope {
            model: request.model,
            input: Input {
                messages: [
                    Message {
                        content: [Content::Text { text: context }],
                        role: "system",
                    },
                    Message {
                        content: [Content::Audio {
                            audio: request.audio_url,
                        }],
                        role: "user",
                    },
                ],
            },
            parameters: Parameters {
                asr_options: AsrOptions {
                    enable_itn: request.enable_itn,
                    language: request.language,
                },
            },
        };

        tracing::debug!(
            endpoint = %self.endpoint,
            region = self.region.as_str(),
            audio_url = request.audio_url,
            language = request.language.map(Language::code),
            enable_itn = request.enable_itn,
            context_length = context.len(),
            "ASR request"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(http::header::AUTHORIZATION, format!("Bearer {}", api_key.expose_secret()))
            .header(OSS_RESOURCE_RESOLVE_HEADER, "enable")
            .json(&envelope)
            .send()
            .await
            .map_err(|e| SttError::AsrService(ProviderFailure::transport(&e)))?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            tracing::warn!(status = status.as_u16(), "ASR request rejected");

            return Err(SttError::AsrService(ProviderFailure::Status {
                status: status.as_u16(),
                body,
            }));
        }

        let result: AsrResponse = response
            .json()
            .await
            .map_err(|e| SttError::AsrService(ProviderFailure::decode(&e)))?;

        tracing::debug!(
            request_id = result.request_id.as_deref(),
            finish_reason = result.finish_reason(),
            text_length = result.transcript().len(),
            detected_language = result.detected_language(),
            "ASR response"
        );

        Ok(result)
    }
}
