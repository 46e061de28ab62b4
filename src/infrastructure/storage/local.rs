use super::{StorageError, StorageResult, VideoStorage};
use crate::config::settings::StorageBackend;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;

const PUBLIC_MARKERS_DIR: &str = ".public";

/// Filesystem backend: each bucket is a directory under `root`. Public-read
/// grants are recorded as empty marker files next to the processed bucket.
#[derive(Clone, Debug)]
pub struct LocalVideoStorage {
    raw_root: PathBuf,
    processed_root: PathBuf,
    public_root: PathBuf,
    public_read: bool,
}

impl LocalVideoStorage {
    pub fn new(
        root: &Path,
        raw_bucket: &str,
        processed_bucket: &str,
        public_read: bool,
    ) -> StorageResult<Self> {
        let raw_root = root.join(raw_bucket);
        let processed_root = root.join(processed_bucket);
        let public_root = root.join(PUBLIC_MARKERS_DIR).join(processed_bucket);

        for dir in [&raw_root, &processed_root, &public_root] {
            std::fs::create_dir_all(dir)?;
        }

        info!("✅ Local object store at {}", root.display());

        Ok(Self {
            raw_root,
            processed_root,
            public_root,
            public_read,
        })
    }

    pub fn raw_object_path(&self, file_name: &str) -> PathBuf {
        self.raw_root.join(file_name)
    }

    pub fn processed_object_path(&self, file_name: &str) -> PathBuf {
        self.processed_root.join(file_name)
    }
}

#[async_trait]
impl VideoStorage for LocalVideoStorage {
    async fn download_raw(&self, file_name: &str, destination: &Path) -> StorageResult<()> {
        let source = self.raw_object_path(file_name);

        match tokio::fs::copy(&source, destination).await {
            Ok(bytes) => {
                info!(
                    "⬇️ {} downloaded to {} ({} bytes)",
                    source.display(),
                    destination.display(),
                    bytes
                );
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound && !source.exists() => {
                Err(StorageError::NotFound(source.display().to_string()))
            }
            Err(e) => Err(StorageError::DownloadFailed(e.to_string())),
        }
    }

    async fn upload_processed(&self, source: &Path, file_name: &str) -> StorageResult<()> {
        let target = self.processed_object_path(file_name);

        tokio::fs::copy(source, &target)
            .await
            .map_err(|e| StorageError::UploadFailed(format!("{}: {}", source.display(), e)))?;
        info!("⬆️ {} uploaded to {}", source.display(), target.display());

        if self.public_read {
            tokio::fs::write(self.public_root.join(file_name), b"")
                .await
                .map_err(|e| {
                    StorageError::UploadFailed(format!("could not make object public: {}", e))
                })?;
        }

        Ok(())
    }

    async fn is_public(&self, file_name: &str) -> StorageResult<bool> {
        Ok(tokio::fs::try_exists(self.public_root.join(file_name)).await?)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
