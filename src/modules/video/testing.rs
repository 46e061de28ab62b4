//! Fakes and fixtures shared by the video module tests.

use super::service::{StepTimeouts, VideoService};
use crate::config::settings::StorageBackend;
use crate::infrastructure::media::{TranscodeError, Transcoder};
use crate::infrastructure::storage::local::LocalVideoStorage;
use crate::infrastructure::storage::{StorageError, StorageResult, VideoStorage};
use crate::infrastructure::workdir::WorkDirs;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// What the fake transcoder does when asked to convert.
#[derive(Clone, Debug)]
pub enum Script {
    /// Writes `360p:` followed by the input bytes.
    Copy,
    CopySlowly(Duration),
    /// Writes a partial output file, then fails with the given message.
    WriteThenFail(&'static str),
    Hang,
}

impl Script {
    pub fn slow(self, delay: Duration) -> Self {
        match self {
            Script::Copy => Script::CopySlowly(delay),
            other => other,
        }
    }
}

pub struct FakeTranscoder {
    script: Script,
    calls: AtomicUsize,
    active: Arc<AtomicUsize>,
    max_active: AtomicUsize,
}

struct ActiveGuard(Arc<AtomicUsize>);

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl FakeTranscoder {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
            active: Arc::new(AtomicUsize::new(0)),
            max_active: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transcoder for FakeTranscoder {
    async fn convert(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);
        let _active = ActiveGuard(self.active.clone());

        match &self.script {
            Script::Copy => fake_scale(input, output).await,
            Script::CopySlowly(delay) => {
                tokio::time::sleep(*delay).await;
                fake_scale(input, output).await
            }
            Script::WriteThenFail(message) => {
                tokio::fs::write(output, b"partial")
                    .await
                    .map_err(|e| TranscodeError::Failed(e.to_string()))?;
                Err(TranscodeError::Failed(message.to_string()))
            }
            Script::Hang => {
                tokio::fs::write(output, b"partial")
                    .await
                    .map_err(|e| TranscodeError::Failed(e.to_string()))?;
                std::future::pending::<()>().await;
                Ok(())
            }
        }
    }
}

async fn fake_scale(input: &Path, output: &Path) -> Result<(), TranscodeError> {
    let raw = tokio::fs::read(input)
        .await
        .map_err(|e| TranscodeError::Failed(e.to_string()))?;
    let mut out = b"360p:".to_vec();
    out.extend_from_slice(&raw);
    tokio::fs::write(output, out)
        .await
        .map_err(|e| TranscodeError::Failed(e.to_string()))
}

/// Downloads normally but refuses every upload.
struct RejectingUploads(Arc<LocalVideoStorage>);

#[async_trait]
impl VideoStorage for RejectingUploads {
    async fn download_raw(&self, file_name: &str, destination: &Path) -> StorageResult<()> {
        self.0.download_raw(file_name, destination).await
    }

    async fn upload_processed(&self, _source: &Path, file_name: &str) -> StorageResult<()> {
        Err(StorageError::UploadFailed(format!("access denied for {}", file_name)))
    }

    async fn is_public(&self, file_name: &str) -> StorageResult<bool> {
        self.0.is_public(file_name).await
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

pub struct Fixture {
    pub tmp: TempDir,
    pub store: Arc<LocalVideoStorage>,
    pub transcoder: Arc<FakeTranscoder>,
    pub service: VideoService,
}

impl Fixture {
    pub fn new(script: Script) -> Self {
        Self::build(script, default_timeouts(), false)
    }

    pub fn with_timeouts(script: Script, timeouts: StepTimeouts) -> Self {
        Self::build(script, timeouts, false)
    }

    pub fn with_failing_upload(script: Script) -> Self {
        Self::build(script, default_timeouts(), true)
    }

    fn build(script: Script, timeouts: StepTimeouts, reject_uploads: bool) -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let store = Arc::new(
            LocalVideoStorage::new(&tmp.path().join("buckets"), "raw", "processed", true).unwrap(),
        );
        let dirs = WorkDirs::new(tmp.path().join("raw-videos"), tmp.path().join("processed-videos"));
        dirs.ensure().unwrap();

        let transcoder = Arc::new(FakeTranscoder::new(script));
        let storage: Arc<dyn VideoStorage> = if reject_uploads {
            Arc::new(RejectingUploads(store.clone()))
        } else {
            store.clone()
        };
        let service = VideoService::new(storage, transcoder.clone(), dirs, timeouts);

        Self {
            tmp,
            store,
            transcoder,
            service,
        }
    }

    pub fn put_raw(&self, file_name: &str, bytes: &[u8]) {
        std::fs::write(self.store.raw_object_path(file_name), bytes).unwrap();
    }

    pub fn processed_object(&self, file_name: &str) -> Option<Vec<u8>> {
        std::fs::read(self.store.processed_object_path(file_name)).ok()
    }

    /// Everything left in either working directory.
    pub fn local_files(&self) -> Vec<PathBuf> {
        ["raw-videos", "processed-videos"]
            .iter()
            .flat_map(|dir| std::fs::read_dir(self.tmp.path().join(dir)).unwrap())
            .map(|entry| entry.unwrap().path())
            .collect()
    }
}

fn default_timeouts() -> StepTimeouts {
    StepTimeouts {
        storage: Duration::from_secs(5),
        transcode: Duration::from_secs(5),
    }
}
