use axum::{
    Json,
    response::{IntoResponse, Response},
};
use strum::{EnumString, IntoStaticStr, VariantArray};

use crate::{
    asr::AsrResponse,
    error::{Result, SttError},
    translate::{self, UploadInfo},
    types::JsonTranscriptionResponse,
};

/// Rendering requested through `response_format`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, IntoStaticStr, VariantArray)]
#[strum(serialize_all = "snake_case")]
pub enum ResponseFormat {
    /// Minimal result plus upload details and processing time
    #[default]
    Json,
    Text,
    Srt,
    VerboseJson,
}

impl ResponseFormat {
    /// Resolve the raw form value; absent and empty select `json`
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        match raw {
            None | Some("") => Ok(Self::Json),
            Some(raw) => raw
                .parse()
                .map_err(|_| SttError::UnsupportedFormat(raw.to_owned())),
        }
    }

    pub fn supported() -> Vec<&'static str> {
        Self::VARIANTS.iter().map(|format| (*format).into()).collect()
    }

    pub(crate) fn render(self, response: &AsrResponse, processing_time_ms: u64, upload: &UploadInfo) -> Response {
        match self {
            Self::Json => Json(JsonTranscriptionResponse {
                result: translate::to_minimal(response),
                upload_info: upload.to_body(),
                processing_time_ms,
            })
            .into_response(),
            Self::Text => translate::render_text(&translate::to_minimal(response)).into_response(),
            Self::Srt => translate::render_srt(&translate::to_minimal(response)).into_response(),
            Self::VerboseJson => Json(translate::to_verbose(response, processing_time_ms, Some(upload))).into_response(),
        }
    }
}
