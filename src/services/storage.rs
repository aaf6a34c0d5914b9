use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use sha2::{Digest, Sha256};
use std::time::Duration;

use crate::core::config::Settings;

/// S3-compatible object storage for uploaded answer files.
#[derive(Debug, Clone)]
pub(crate) struct StorageService {
    client: Client,
    bucket: String,
}

impl StorageService {
    /// Returns `None` when no S3 credentials are configured. The API then
    /// runs without answer uploads and reports answer URLs as null.
    pub(crate) async fn from_settings(settings: &Settings) -> anyhow::Result<Option<Self>> {
        if settings.s3().access_key.is_empty() || settings.s3().secret_key.is_empty() {
            return Ok(None);
        }

        let creds = Credentials::new(
            settings.s3().access_key.clone(),
            settings.s3().secret_key.clone(),
            None,
            None,
            "classhub-answers",
        );

        let config = aws_config::defaults(BehaviorVersion::latest())
            .endpoint_url(settings.s3().endpoint.clone())
            .region(aws_config::Region::new(settings.s3().region.clone()))
            .credentials_provider(creds)
            .load()
            .await;

        let client = Client::new(&config);

        Ok(Some(Self { client, bucket: settings.s3().bucket.clone() }))
    }

    pub(crate) async fn presign_get(
        &self,
        key: &str,
        expires_in: Duration,
    ) -> anyhow::Result<String> {
        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(PresigningConfig::expires_in(expires_in)?)
            .await?;

        Ok(presigned.uri().to_string())
    }

    pub(crate) async fn upload_bytes(
        &self,
        key: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> anyhow::Result<(i64, String)> {
        let size = bytes.len() as i64;
        let hash = Sha256::digest(&bytes);
        let hash_hex = hex::encode(hash);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await?;

        Ok((size, hash_hex))
    }
}
