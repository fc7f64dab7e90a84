use serde::Serialize;

/// Task tag reported on every transcription result
pub const TASK_TRANSCRIBE: &str = "transcribe";

/// File part of an inbound transcription form
#[derive(Debug, Clone, Default)]
pub struct UploadedFile {
    /// Client-supplied file name, if any
    pub name: Option<String>,
    /// Declared MIME type (empty when the part had none)
    pub content_type: String,
    /// Total size of the part in bytes
    pub size: u64,
    /// File contents; left empty once `size` exceeds the upload ceiling
    pub bytes: Vec<u8>,
}

/// Transcription request following the `OpenAI` create-transcription form
#[derive(Debug, Default)]
pub struct TranscriptionForm {
    pub file: Option<UploadedFile>,
    /// Model identifier (e.g. "qwen3-asr-flash")
    pub model: Option<String>,
    /// Optional language hint
    pub language: Option<String>,
    /// Response format (json, text, srt, `verbose_json`)
    pub response_format: Option<String>,
    /// Accepted for compatibility, never used
    pub temperature: Option<String>,
}

/// Minimal transcription response following the `OpenAI` schema
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptionResult {
    pub text: String,
    pub task: &'static str,
    pub language: String,
    /// Audio duration in seconds, omitted when the provider reports none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

/// Where the audio was staged, reported for debugging
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadInfoBody {
    pub oss_url: String,
    pub expire_time: String,
    pub model_used: String,
}

/// Default `json` response: the minimal result plus debug fields
#[derive(Debug, Serialize)]
pub struct JsonTranscriptionResponse {
    #[serde(flatten)]
    pub result: TranscriptionResult,
    pub upload_info: UploadInfoBody,
    pub processing_time_ms: u64,
}

/// `verbose_json` response
#[derive(Debug, Serialize)]
pub struct VerboseTranscriptionResult {
    #[serde(flatten)]
    pub result: TranscriptionResult,
    pub request_id: String,
    pub timestamp: String,
    pub processing_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_info: Option<UploadInfoBody>,
    pub asr_metadata: AsrMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AsrMetadata {
    pub detected_language: String,
    pub emotion: String,
    pub finish_reason: String,
    pub usage: UsageSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageSummary {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub audio_seconds: f64,
}
