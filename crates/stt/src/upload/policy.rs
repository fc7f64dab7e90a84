use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

use crate::error::{ProviderFailure, Result, SttError};

/// Time-limited, model-scoped credentials for one object upload
#[derive(Debug, Deserialize)]
pub(crate) struct UploadPolicy {
    pub upload_dir: String,
    pub upload_host: String,
    pub oss_access_key_id: String,
    pub signature: String,
    pub policy: String,
    pub x_oss_object_acl: String,
    pub x_oss_forbid_overwrite: String,
}

#[derive(Deserialize)]
struct PolicyEnvelope {
    data: UploadPolicy,
}

/// Fetch an upload policy for `model` from the storage API
///
/// The policy endpoint is rate limited; a throttled call fails the request.
pub(crate) async fn request_upload_policy(
    client: &Client,
    storage_url: &Url,
    api_key: &SecretString,
    model: &str,
) -> Result<UploadPolicy> {
    let url = format!("{}/api/v1/uploads", storage_url.as_str().trim_end_matches('/'));

    let response = client
        .get(&url)
        .header(http::header::AUTHORIZATION, format!("Bearer {}", api_key.expose_secret()))
        .header(http::header::CONTENT_TYPE, "application/json")
        .query(&[("action", "getPolicy"), ("model", model)])
        .send()
        .await
        .map_err(|e| SttError::UploadPolicy(ProviderFailure::transport(&e)))?;

    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();

        tracing::warn!(status = status.as_u16(), "upload policy request rejected");

        return Err(SttError::UploadPolicy(ProviderFailure::Status {
            status: status.as_u16(),
            body,
        }));
    }

    let envelope: PolicyEnvelope = response
        .json()
        .await
        .map_err(|e| SttError::UploadPolicy(ProviderFailure::decode(&e)))?;

    Ok(envelope.data)
}
