//! Projection of ASR responses onto the `OpenAI` transcription schemas

use jiff::Timestamp;

use crate::{
    asr::AsrResponse,
    timing::iso8601,
    types::{AsrMetadata, TASK_TRANSCRIBE, TranscriptionResult, UploadInfoBody, UsageSummary, VerboseTranscriptionResult},
    upload::ObjectLocator,
};

/// Placeholder for annotation fields the provider left out
const UNKNOWN: &str = "unknown";

/// Upload details echoed back to the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadInfo {
    pub object: ObjectLocator,
    pub model_used: String,
}

impl UploadInfo {
    pub(crate) fn to_body(&self) -> UploadInfoBody {
        UploadInfoBody {
            oss_url: self.object.url.clone(),
            expire_time: iso8601(self.object.expires_at),
            model_used: self.model_used.clone(),
        }
    }
}

pub(crate) fn to_minimal(response: &AsrResponse) -> TranscriptionResult {
    TranscriptionResult {
        text: response.transcript().to_owned(),
        task: TASK_TRANSCRIBE,
        language: response.detected_language().unwrap_or(UNKNOWN).to_owned(),
        duration: response.audio_seconds(),
    }
}

/// Verbose projection, stamped with the current time
pub(crate) fn to_verbose(
    response: &AsrResponse,
    processing_time_ms: u64,
    upload: Option<&UploadInfo>,
) -> VerboseTranscriptionResult {
    VerboseTranscriptionResult {
        result: to_minimal(response),
        request_id: response.request_id.clone().unwrap_or_default(),
        timestamp: iso8601(Timestamp::now()),
        processing_time_ms,
        upload_info: upload.map(UploadInfo::to_body),
        asr_metadata: AsrMetadata {
            detected_language: response.detected_language().unwrap_or(UNKNOWN).to_owned(),
            emotion: response.emotion().unwrap_or(UNKNOWN).to_owned(),
            finish_reason: response.finish_reason().unwrap_or(UNKNOWN).to_owned(),
            usage: UsageSummary {
                input_tokens: response.input_tokens(),
                output_tokens: response.output_tokens(),
                audio_seconds: response.audio_seconds().unwrap_or_default(),
            },
        },
    }
}

pub(crate) fn render_text(result: &TranscriptionResult) -> String {
    result.text.clone()
}

/// Single cue spanning the whole clip; seconds past 99 are not wrapped into minutes
pub(crate) fn render_srt(result: &TranscriptionResult) -> String {
    // Negative durations clamp to zero rather than rendering a signed field
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let seconds = result.duration.map_or(0, |duration| duration.floor() as u64);

    format!("1\n00:00:00,000 --> 00:00:{seconds:02},000\n{}", result.text)
}
