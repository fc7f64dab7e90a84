use crate::{error::ValidationError, language::Language, types::UploadedFile};

/// Largest accepted upload, 100 MiB
pub const MAX_FILE_SIZE: u64 = 100 << 20;

/// Accepted MIME types
///
/// Video containers are allowed since the ASR service extracts the audio track.
pub const ALLOWED_CONTENT_TYPES: [&str; 10] = [
    "audio/mpeg",
    "audio/mp3",
    "audio/wav",
    "audio/wave",
    "audio/x-wav",
    "audio/mp4",
    "audio/x-m4a",
    "video/mp4",
    "video/mpeg",
    "video/quicktime",
];

/// Check presence, size and type of the uploaded file, in that order
pub fn validate_file(file: Option<UploadedFile>) -> Result<UploadedFile, ValidationError> {
    let file = file.ok_or(ValidationError::NoFile)?;

    if file.size > MAX_FILE_SIZE {
        return Err(ValidationError::FileTooLarge);
    }

    if !ALLOWED_CONTENT_TYPES.contains(&file.content_type.as_str()) {
        return Err(ValidationError::FileTypeNotAllowed);
    }

    Ok(file)
}

/// Resolve the optional language hint; absent and empty both mean auto-detect
pub fn validate_language(language: Option<&str>) -> Result<Option<Language>, ValidationError> {
    match language {
        None | Some("") => Ok(None),
        Some(code) => code
            .parse()
            .map(Some)
            .map_err(|_| ValidationError::UnsupportedLanguage),
    }
}
