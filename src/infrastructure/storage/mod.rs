//! Object storage for raw and processed videos.
//!
//! Raw videos are read from one bucket and processed videos written to
//! another. Objects are keyed by file name only.

pub mod local;
pub mod s3;

use crate::config::settings::{AppConfig, StorageBackend};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Storage operation timed out after {}s", .0.as_secs())]
    TimedOut(Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

#[async_trait]
pub trait VideoStorage: Send + Sync {
    /// Copy raw object `file_name` into the local file at `destination`.
    async fn download_raw(&self, file_name: &str, destination: &Path) -> StorageResult<()>;

    /// Store the local file `source` in the processed bucket under `file_name`,
    /// then grant public read access when the backend is configured to.
    async fn upload_processed(&self, source: &Path, file_name: &str) -> StorageResult<()>;

    /// Whether processed object `file_name` is world-readable.
    async fn is_public(&self, file_name: &str) -> StorageResult<bool>;

    fn backend_type(&self) -> StorageBackend;
}

pub async fn build_storage(config: &AppConfig) -> StorageResult<Arc<dyn VideoStorage>> {
    let storage: Arc<dyn VideoStorage> = match config.storage_backend {
        StorageBackend::S3 => Arc::new(s3::S3VideoStorage::new(config).await?),
        StorageBackend::Local => Arc::new(local::LocalVideoStorage::new(
            &config.local_storage_root,
            &config.raw_video_bucket,
            &config.processed_video_bucket,
            config.processed_public_read,
        )?),
    };

    Ok(storage)
}

pub(crate) fn content_type_for(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first_or_octet_stream()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_follows_extension() {
        assert_eq!(content_type_for("clip.mp4"), "video/mp4");
        assert_eq!(content_type_for("no-extension"), "application/octet-stream");
    }

    #[test]
    fn timeout_message_reports_seconds() {
        let err = StorageError::TimedOut(Duration::from_secs(30));
        assert_eq!(err.to_string(), "Storage operation timed out after 30s");
    }
}
