//! `DashScope` multimodal-generation request and response bodies

use serde::{Deserialize, Deserializer, Serialize};

use crate::language::Language;

#[derive(Debug, Serialize)]
pub(crate) struct AsrEnvelope<'a> {
    pub model: &'a str,
    pub input: Input<'a>,
    pub parameters: Parameters,
}

#[derive(Debug, Serialize)]
pub(crate) struct Input<'a> {
    pub messages: [Message<'a>; 2],
}

#[derive(Debug, Serialize)]
pub(crate) struct Message<'a> {
    pub content: [Content<'a>; 1],
    pub role: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum Content<'a> {
    Text { text: &'a str },
    Audio { audio: &'a str },
}

#[derive(Debug, Serialize)]
pub(crate) struct Parameters {
    pub asr_options: AsrOptions,
}

#[derive(Debug, Serialize)]
pub(crate) struct AsrOptions {
    pub enable_itn: bool,
    /// Left out entirely when absent so the model auto-detects
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
}

/// ASR response; every field degrades to a default when missing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AsrResponse {
    pub request_id: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub output: Output,
    #[serde(deserialize_with = "null_as_default")]
    pub usage: Usage,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Output {
    #[serde(deserialize_with = "null_as_default")]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Choice {
    pub finish_reason: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub message: ChoiceMessage,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChoiceMessage {
    #[serde(deserialize_with = "null_as_default")]
    pub content: Vec<ContentText>,
    #[serde(deserialize_with = "null_as_default")]
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContentText {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Annotation {
    pub language: Option<String>,
    pub emotion: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Usage {
    pub input_tokens_details: Option<TokenDetails>,
    pub output_tokens_details: Option<TokenDetails>,
    pub seconds: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TokenDetails {
    #[serde(deserialize_with = "null_as_default")]
    pub text_tokens: u64,
}

/// Only the first choice and its first annotation are consulted
impl AsrResponse {
    fn first_choice(&self) -> Option<&Choice> {
        self.output.choices.first()
    }

    fn first_annotation(&self) -> Option<&Annotation> {
        self.first_choice()?.message.annotations.first()
    }

    /// Transcript text, empty when missing
    pub fn transcript(&self) -> &str {
        self.first_choice()
            .and_then(|choice| choice.message.content.first())
            .and_then(|content| content.text.as_deref())
            .unwrap_or_default()
    }

    pub fn detected_language(&self) -> Option<&str> {
        non_empty(self.first_annotation()?.language.as_deref())
    }

    pub fn emotion(&self) -> Option<&str> {
        non_empty(self.first_annotation()?.emotion.as_deref())
    }

    pub fn finish_reason(&self) -> Option<&str> {
        non_empty(self.first_choice()?.finish_reason.as_deref())
    }

    pub fn input_tokens(&self) -> u64 {
        self.usage.input_tokens_details.as_ref().map_or(0, |details| details.text_tokens)
    }

    pub fn output_tokens(&self) -> u64 {
        self.usage.output_tokens_details.as_ref().map_or(0, |details| details.text_tokens)
    }

    /// Audio length, `None` when absent or zero
    pub fn audio_seconds(&self) -> Option<f64> {
        self.usage.seconds.filter(|seconds| seconds.is_normal())
    }
}

/// Explicit `null` decodes like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}
