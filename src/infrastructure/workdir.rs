use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Local scratch space shared by every job: one directory for downloaded raw
/// videos and one for transcoder output.
#[derive(Clone, Debug)]
pub struct WorkDirs {
    raw: PathBuf,
    processed: PathBuf,
}

impl WorkDirs {
    pub fn new(raw: impl Into<PathBuf>, processed: impl Into<PathBuf>) -> Self {
        Self {
            raw: raw.into(),
            processed: processed.into(),
        }
    }

    pub fn ensure(&self) -> io::Result<()> {
        ensure_dir(&self.raw)?;
        ensure_dir(&self.processed)
    }

    pub fn raw_path(&self, file_name: &str) -> PathBuf {
        self.raw.join(file_name)
    }

    pub fn processed_path(&self, file_name: &str) -> PathBuf {
        self.processed.join(file_name)
    }
}

/// Creates `path` and any missing parents. Existing directories are left alone.
pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if path.is_dir() {
        debug!(path = %path.display(), "Directory already present");
        return Ok(());
    }

    std::fs::create_dir_all(path)?;
    info!("📁 Directory created at {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_creates_nested_directories_and_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = WorkDirs::new(tmp.path().join("a/raw"), tmp.path().join("b/c/processed"));

        dirs.ensure().unwrap();
        dirs.ensure().unwrap();

        assert!(tmp.path().join("a/raw").is_dir());
        assert!(tmp.path().join("b/c/processed").is_dir());
    }

    #[test]
    fn paths_join_the_file_name_unchanged() {
        let dirs = WorkDirs::new("/work/raw", "/work/processed");
        assert_eq!(dirs.raw_path("clip.mp4"), PathBuf::from("/work/raw/clip.mp4"));
        assert_eq!(
            dirs.processed_path("processed-clip.mp4"),
            PathBuf::from("/work/processed/processed-clip.mp4")
        );
    }
}
