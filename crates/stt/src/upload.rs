mod object;
mod policy;

use jiff::{SignedDuration, Timestamp};
use reqwest::Client;
use secrecy::SecretString;
use url::Url;

use crate::{
    error::{Result, SttError},
    types::UploadedFile,
};

/// Staged object reference handed to the ASR service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLocator {
    /// `oss://` path of the uploaded object
    pub url: String,
    /// Expiry reported to clients; the storage provider enforces the real one
    pub expires_at: Timestamp,
}

/// Stages files in `DashScope` temporary storage
pub(crate) struct Uploader {
    client: Client,
    storage_url: Url,
    validity: SignedDuration,
}

impl Uploader {
    pub fn new(client: Client, storage_url: Url, validity_hours: u32) -> Self {
        Self {
            client,
            storage_url,
            validity: SignedDuration::from_hours(i64::from(validity_hours)),
        }
    }

    /// Fetch a policy for `model`, then upload the file with it
    pub async fn upload_file_and_get_url(
        &self,
        api_key: &SecretString,
        model: &str,
        file: UploadedFile,
    ) -> Result<ObjectLocator> {
        let policy = policy::request_upload_policy(&self.client, &self.storage_url, api_key, model).await?;

        tracing::debug!(upload_dir = %policy.upload_dir, "upload policy issued");

        let url = object::upload_object(&self.client, policy, file).await?;

        let expires_at = Timestamp::now()
            .checked_add(self.validity)
            .map_err(|e| SttError::Internal(format!("upload expiry out of range: {e}")))?;

        Ok(ObjectLocator { url, expires_at })
    }
}
