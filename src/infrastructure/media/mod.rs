pub mod ffmpeg;

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Output height for every processed video. Width follows the source aspect ratio.
pub const TARGET_HEIGHT: u32 = 360;

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("Failed to start {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Failed(String),

    #[error("Transcoding timed out after {}s", .0.as_secs())]
    TimedOut(std::time::Duration),
}

#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Transcode `input` into `output`, resolving once the tool has exited.
    ///
    /// Dropping the returned future must stop the underlying work.
    async fn convert(&self, input: &Path, output: &Path) -> Result<(), TranscodeError>;
}
