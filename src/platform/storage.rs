//! Hosted object storage through its S3-compatible endpoint.

use crate::config::StorageSettings;
use crate::error::StorageError;
use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use axum::body::Bytes;
use std::time::Duration;

/// Private bucket; objects are only reachable through presigned URLs.
pub const FARMER_DOCUMENTS_BUCKET: &str = "farmer-documents";
pub const FARMER_IMAGES_BUCKET: &str = "farmer-images";
pub const PRODUCT_IMAGES_BUCKET: &str = "product-images";

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Writes `body` at `bucket/key`, replacing any existing object.
    async fn upload(&self, bucket: &str, key: &str, body: Bytes, content_type: &str) -> Result<(), StorageError>;
    async fn remove(&self, bucket: &str, keys: &[String]) -> Result<(), StorageError>;
    /// Keys in `bucket` starting with `prefix`.
    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StorageError>;
    fn public_url(&self, bucket: &str, key: &str) -> String;
    async fn signed_url(&self, bucket: &str, key: &str) -> Result<String, StorageError>;
}

#[derive(Clone)]
pub struct S3Storage {
    client: aws_sdk_s3::Client,
    public_url: String,
    signed_url_ttl: Duration,
}

impl S3Storage {
    pub async fn connect(settings: &StorageSettings) -> Self {
        let credentials = aws_sdk_s3::config::Credentials::new(
            settings.access_key_id.clone(),
            settings.secret_access_key.clone(),
            None,
            None,
            "tarladan-env",
        );
        let shared = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(settings.region.clone()))
            .endpoint_url(settings.s3_endpoint.clone())
            .credentials_provider(credentials)
            .load()
            .await;
        let config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(true)
            .build();
        tracing::info!(endpoint = %settings.s3_endpoint, "object storage client ready");
        S3Storage {
            client: aws_sdk_s3::Client::from_conf(config),
            public_url: settings.public_url.clone(),
            signed_url_ttl: settings.signed_url_ttl,
        }
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn upload(&self, bucket: &str, key: &str, body: Bytes, content_type: &str) -> Result<(), StorageError> {
        let size = body.len();
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| StorageError::Upload {
                bucket: bucket.to_string(),
                key: key.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;
        tracing::info!(bucket, key, size, "object stored");
        Ok(())
    }

    async fn remove(&self, bucket: &str, keys: &[String]) -> Result<(), StorageError> {
        for key in keys {
            self.client
                .delete_object()
                .bucket(bucket)
                .key(key)
                .send()
                .await
                .map_err(|e| StorageError::Remove {
                    bucket: bucket.to_string(),
                    message: DisplayErrorContext(&e).to_string(),
                })?;
            tracing::info!(bucket, key = %key, "object removed");
        }
        Ok(())
    }

    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StorageError> {
        let mut keys = Vec::new();
        let mut token: Option<String> = None;
        loop {
            let out = self
                .client
                .list_objects_v2()
                .bucket(bucket)
                .prefix(prefix)
                .set_continuation_token(token.take())
                .send()
                .await
                .map_err(|e| StorageError::List {
                    bucket: bucket.to_string(),
                    message: DisplayErrorContext(&e).to_string(),
                })?;
            keys.extend(out.contents().iter().filter_map(|o| o.key().map(str::to_string)));
            match out.next_continuation_token() {
                Some(next) if out.is_truncated().unwrap_or(false) => token = Some(next.to_string()),
                _ => break,
            }
        }
        Ok(keys)
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/{}/{}", self.public_url, bucket, key)
    }

    async fn signed_url(&self, bucket: &str, key: &str) -> Result<String, StorageError> {
        let sign_err = |message: String| StorageError::Sign {
            bucket: bucket.to_string(),
            key: key.to_string(),
            message,
        };
        let presigning = PresigningConfig::expires_in(self.signed_url_ttl).map_err(|e| sign_err(e.to_string()))?;
        let request = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| sign_err(DisplayErrorContext(&e).to_string()))?;
        Ok(request.uri().to_string())
    }
}
