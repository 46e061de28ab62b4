use crate::infrastructure::media::TranscodeError;
use crate::infrastructure::storage::StorageError;
use thiserror::Error;

/// Failure of one processing run. The response does not say which step
/// failed beyond this message; the logs do.
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("Failed to download raw video: {0}")]
    RemoteFetch(#[source] StorageError),

    #[error("{0}")]
    Transcode(#[from] TranscodeError),

    #[error("Failed to upload processed video: {0}")]
    RemoteUpload(#[source] StorageError),
}
