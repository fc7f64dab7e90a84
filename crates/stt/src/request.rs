use std::time::Instant;

use axum::extract::{
    FromRequest, Multipart, Request,
    multipart::{Field, MultipartError},
};

use crate::{
    error::{Failure, Result, SttError},
    types::{TranscriptionForm, UploadedFile},
    validation::MAX_FILE_SIZE,
};

/// Extractor for the multipart transcription form
///
/// Also records when the request arrived so failures can report timing.
pub struct ExtractTranscription(pub TranscriptionForm, pub Instant);

impl<S> FromRequest<S> for ExtractTranscription
where
    S: Send + Sync,
{
    type Rejection = Failure;

    async fn from_request(request: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let started = Instant::now();

        let multipart = Multipart::from_request(request, state)
            .await
            .map_err(|e| Failure::new(SttError::MalformedRequest(e.body_text()), started))?;

        let form = parse_form(multipart, MAX_FILE_SIZE)
            .await
            .map_err(|e| Failure::new(e, started))?;

        Ok(Self(form, started))
    }
}

/// Collect the known fields; the first occurrence of a repeated field wins
///
/// File bytes past `limit` are counted but not kept.
pub(crate) async fn parse_form(mut multipart: Multipart, limit: u64) -> Result<TranscriptionForm> {
    let mut form = TranscriptionForm::default();

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_owned();

        match name.as_str() {
            "file" if form.file.is_none() => form.file = Some(read_file(field, limit).await?),
            "model" if form.model.is_none() => form.model = Some(field.text().await.map_err(malformed)?),
            "language" if form.language.is_none() => form.language = Some(field.text().await.map_err(malformed)?),
            "response_format" if form.response_format.is_none() => {
                form.response_format = Some(field.text().await.map_err(malformed)?);
            }
            "temperature" if form.temperature.is_none() => {
                form.temperature = Some(field.text().await.map_err(malformed)?);
            }
            _ => {}
        }
    }

    Ok(form)
}

async fn read_file(mut field: Field<'_>, limit: u64) -> Result<UploadedFile> {
    let name = field.file_name().map(str::to_owned);
    let content_type = field.content_type().map(str::to_owned).unwrap_or_default();

    let mut size = 0_u64;
    let mut bytes = Vec::new();

    while let Some(chunk) = field.chunk().await.map_err(malformed)? {
        size = size.saturating_add(u64::try_from(chunk.len()).unwrap_or(u64::MAX));

        if size <= limit {
            bytes.extend_from_slice(&chunk);
        } else if !bytes.is_empty() {
            bytes = Vec::new();
        }
    }

    Ok(UploadedFile {
        name,
        content_type,
        size,
        bytes,
    })
}

fn malformed(error: MultipartError) -> SttError {
    SttError::MalformedRequest(error.body_text())
}
