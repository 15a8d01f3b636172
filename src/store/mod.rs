use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::{Builder, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use std::path::Path;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::StoreConfig;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from the object store gateway
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid locator `{url}`: {reason}")]
    InvalidLocator { url: String, reason: String },

    #[error("object not found: {0}")]
    NotFound(String),

    #[error("download failed: {0}")]
    DownloadFailed(String),

    #[error("upload failed: {0}")]
    UploadFailed(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Derive the object key from a public locator URL: the percent-decoded path
/// component with the leading separator stripped.
pub fn key_from_url(locator: &str) -> StoreResult<String> {
    let url = Url::parse(locator).map_err(|e| StoreError::InvalidLocator {
        url: locator.to_string(),
        reason: e.to_string(),
    })?;

    let decoded = urlencoding::decode(url.path()).map_err(|e| StoreError::InvalidLocator {
        url: locator.to_string(),
        reason: e.to_string(),
    })?;

    let key = decoded.trim_start_matches('/').to_string();
    if key.is_empty() {
        return Err(StoreError::InvalidLocator {
            url: locator.to_string(),
            reason: "empty object key".to_string(),
        });
    }

    Ok(key)
}

/// Destination key for a transcoded output: `<namespace>/m4a/<id>[_suffix].m4a`
pub fn destination_key(namespace: &str, id: &str, suffix: Option<&str>) -> String {
    match suffix {
        Some(suffix) => format!("{namespace}/m4a/{id}_{suffix}.m4a"),
        None => format!("{namespace}/m4a/{id}.m4a"),
    }
}

/// Public URL for an uploaded object
pub fn public_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key)
}

/// Gateway to the object store holding source and transcoded audio
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch an object and persist it to a local file
    async fn fetch_to_file(&self, key: &str, dest: &Path) -> StoreResult<()>;

    /// Upload a local file under the given key
    async fn put_file(&self, key: &str, src: &Path, content_type: &str) -> StoreResult<()>;
}

/// S3-compatible store client (Cloudflare R2 and friends)
#[derive(Clone)]
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    pub fn new(config: &StoreConfig) -> Self {
        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "aacify",
        );

        let sdk_config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(&config.endpoint)
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        Self {
            client: Client::from_conf(sdk_config),
            bucket: config.bucket.clone(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn fetch_to_file(&self, key: &str, dest: &Path) -> StoreResult<()> {
        debug!("Downloading {} to {}", key, dest.display());

        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.to_string().contains("NoSuchKey") {
                    StoreError::NotFound(key.to_string())
                } else {
                    StoreError::DownloadFailed(e.to_string())
                }
            })?;

        let bytes = response
            .body
            .collect()
            .await
            .map_err(|e| StoreError::DownloadFailed(e.to_string()))?
            .into_bytes();

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(dest, &bytes).await?;

        Ok(())
    }

    async fn put_file(&self, key: &str, src: &Path, content_type: &str) -> StoreResult<()> {
        debug!("Uploading {} to {}", src.display(), key);

        let body = ByteStream::from_path(src)
            .await
            .map_err(|e| StoreError::UploadFailed(e.to_string()))?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StoreError::UploadFailed(e.to_string()))?;

        Ok(())
    }
}
