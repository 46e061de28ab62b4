use super::artifacts::LocalArtifacts;
use super::error::ProcessingError;
use super::lock::NameLocks;
use crate::config::settings::AppConfig;
use crate::infrastructure::media::{TranscodeError, Transcoder};
use crate::infrastructure::storage::{StorageError, VideoStorage};
use crate::infrastructure::workdir::WorkDirs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{error, info};

pub const SUCCESS_MESSAGE: &str = "Processing finished successfully.";

const PROCESSED_PREFIX: &str = "processed-";

pub fn processed_file_name(file_name: &str) -> String {
    format!("{}{}", PROCESSED_PREFIX, file_name)
}

/// Deadlines for each step of a run.
#[derive(Clone, Copy, Debug)]
pub struct StepTimeouts {
    /// Applies to the download and to the upload separately.
    pub storage: Duration,
    pub transcode: Duration,
}

impl StepTimeouts {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            storage: config.storage_timeout(),
            transcode: config.transcode_timeout(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedVideo {
    pub file_name: String,
    pub processed_file_name: String,
}

/// Runs download → transcode → upload → cleanup for one file name.
#[derive(Clone)]
pub struct VideoService {
    storage: Arc<dyn VideoStorage>,
    transcoder: Arc<dyn Transcoder>,
    dirs: WorkDirs,
    locks: NameLocks,
    timeouts: StepTimeouts,
}

impl VideoService {
    pub fn new(
        storage: Arc<dyn VideoStorage>,
        transcoder: Arc<dyn Transcoder>,
        dirs: WorkDirs,
        timeouts: StepTimeouts,
    ) -> Self {
        Self {
            storage,
            transcoder,
            dirs,
            locks: NameLocks::new(),
            timeouts,
        }
    }

    /// Process raw object `file_name` into `processed-<file_name>`.
    ///
    /// Runs for the same name are serialized. Both local files are removed
    /// before this returns, whatever the outcome.
    pub async fn process(&self, file_name: &str) -> Result<ProcessedVideo, ProcessingError> {
        let _name_guard = self.locks.acquire(file_name).await;

        let processed_name = processed_file_name(file_name);
        let raw_path = self.dirs.raw_path(file_name);
        let processed_path = self.dirs.processed_path(&processed_name);
        let artifacts = LocalArtifacts::new([raw_path.clone(), processed_path.clone()]);

        let result = self
            .run(file_name, &processed_name, &raw_path, &processed_path)
            .await;
        artifacts.cleanup().await;

        match result {
            Ok(()) => {
                info!(file_name, processed = %processed_name, "✅ {}", SUCCESS_MESSAGE);
                Ok(ProcessedVideo {
                    file_name: file_name.to_string(),
                    processed_file_name: processed_name,
                })
            }
            Err(e) => {
                error!(file_name, "❌ Processing failed: {}", e);
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        file_name: &str,
        processed_name: &str,
        raw_path: &Path,
        processed_path: &Path,
    ) -> Result<(), ProcessingError> {
        info!(file_name, "⬇️ Downloading raw video");
        timeout(
            self.timeouts.storage,
            self.storage.download_raw(file_name, raw_path),
        )
        .await
        .unwrap_or(Err(StorageError::TimedOut(self.timeouts.storage)))
        .map_err(ProcessingError::RemoteFetch)?;

        info!(file_name, "🎥 Transcoding");
        // On timeout the convert future is dropped, which kills the child process.
        timeout(
            self.timeouts.transcode,
            self.transcoder.convert(raw_path, processed_path),
        )
        .await
        .unwrap_or(Err(TranscodeError::TimedOut(self.timeouts.transcode)))?;

        info!(file_name, processed = processed_name, "⬆️ Uploading processed video");
        timeout(
            self.timeouts.storage,
            self.storage.upload_processed(processed_path, processed_name),
        )
        .await
        .unwrap_or(Err(StorageError::TimedOut(self.timeouts.storage)))
        .map_err(ProcessingError::RemoteUpload)?;

        Ok(())
    }
}
