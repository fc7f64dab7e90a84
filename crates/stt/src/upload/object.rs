use jiff::Timestamp;
use reqwest::{
    Client,
    multipart::{Form, Part},
};

use super::policy::UploadPolicy;
use crate::{
    error::{ProviderFailure, Result, SttError},
    types::UploadedFile,
};

/// Pseudo-scheme the ASR service resolves when asked to via header
pub(crate) const OSS_SCHEME: &str = "oss://";

/// POST the file to the policy's upload host and return its `oss://` locator
pub(crate) async fn upload_object(client: &Client, policy: UploadPolicy, file: UploadedFile) -> Result<String> {
    let file_name = match file.name {
        Some(name) if !name.is_empty() => name,
        _ => format!("upload_{}", Timestamp::now().as_millisecond()),
    };
    let key = format!("{}/{file_name}", policy.upload_dir);

    let file_part = Part::bytes(file.bytes)
        .file_name(file_name)
        .mime_str(&file.content_type)
        .map_err(|e| SttError::Internal(format!("invalid content type '{}': {e}", file.content_type)))?;

    // The storage service expects the file part last
    let form = Form::new()
        .text("OSSAccessKeyId", policy.oss_access_key_id)
        .text("Signature", policy.signature)
        .text("policy", policy.policy)
        .text("x-oss-object-acl", policy.x_oss_object_acl)
        .text("x-oss-forbid-overwrite", policy.x_oss_forbid_overwrite)
        .text("key", key.clone())
        .text("success_action_status", "200")
        .part("file", file_part);

    let response = client
        .post(&policy.upload_host)
        .multipart(form)
        .send()
        .await
        .map_err(|e| SttError::ObjectUpload(ProviderFailure::transport(&e)))?;

    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();

        tracing::warn!(status = status.as_u16(), "object upload rejected");

        return Err(SttError::ObjectUpload(ProviderFailure::Status {
            status: status.as_u16(),
            body,
        }));
    }

    Ok(format!("{OSS_SCHEME}{key}"))
}
