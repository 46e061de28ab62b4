use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Local files produced while processing one video.
///
/// `cleanup` removes them once the job is over. If the job is abandoned
/// before that (the request future is dropped), `Drop` removes them instead.
/// Each removal is independent and failures are only logged.
pub struct LocalArtifacts {
    paths: Vec<PathBuf>,
}

impl LocalArtifacts {
    pub fn new(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            paths: paths.into_iter().collect(),
        }
    }

    pub async fn cleanup(mut self) {
        for path in std::mem::take(&mut self.paths) {
            let result = tokio::fs::remove_file(&path).await;
            log_removal(&path, result);
        }
    }
}

impl Drop for LocalArtifacts {
    fn drop(&mut self) {
        for path in self.paths.drain(..) {
            let result = std::fs::remove_file(&path);
            log_removal(&path, result);
        }
    }
}

fn log_removal(path: &Path, result: std::io::Result<()>) {
    match result {
        Ok(()) => info!("🗑️ File deleted at {}", path.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("File not found at {}, skipping deletion", path.display())
        }
        Err(e) => warn!("Failed to delete file at {}: {}", path.display(), e),
    }
}
