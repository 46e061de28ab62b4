use crate::config::env::{self, EnvKey, EnvSource};
use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    S3,
    Local,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s3" => Ok(StorageBackend::S3),
            "local" => Ok(StorageBackend::Local),
            other => Err(anyhow!("Unknown storage backend '{}' (expected 's3' or 'local')", other)),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub server_port: u16,
    pub storage_backend: StorageBackend,
    pub s3_endpoint: Option<String>,
    pub s3_region: String,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub raw_video_bucket: String,
    pub processed_video_bucket: String,
    pub local_storage_root: PathBuf,
    pub raw_video_dir: PathBuf,
    pub processed_video_dir: PathBuf,
    pub processed_public_read: bool,
    pub ffmpeg_path: String,
    pub transcode_timeout_secs: u64,
    pub storage_timeout_secs: u64,
    pub amqp_url: Option<String>,
    pub video_queue_name: String,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        Self::from_source(&env::ProcessEnv)
    }

    pub fn from_source(source: &impl EnvSource) -> Result<Self> {
        Ok(Self {
            server_port: env::get_parsed(source, EnvKey::ServerPort, 3000),
            storage_backend: env::get_or(source, EnvKey::StorageBackend, "s3").parse()?,
            s3_endpoint: env::get_opt(source, EnvKey::S3Endpoint),
            s3_region: env::get_or(source, EnvKey::S3Region, "us-east-1"),
            access_key: env::get_opt(source, EnvKey::AccessKey),
            secret_key: env::get_opt(source, EnvKey::SecretKey),
            raw_video_bucket: env::get_or(source, EnvKey::RawVideoBucket, "ehvs-storage-raw-videos"),
            processed_video_bucket: env::get_or(
                source,
                EnvKey::ProcessedVideoBucket,
                "ehvs-storage-processed-videos",
            ),
            local_storage_root: env::get_or(source, EnvKey::LocalStorageRoot, "./object-store").into(),
            raw_video_dir: env::get_or(source, EnvKey::RawVideoDir, "./raw-videos").into(),
            processed_video_dir: env::get_or(source, EnvKey::ProcessedVideoDir, "./processed-videos")
                .into(),
            processed_public_read: env::get_flag(source, EnvKey::ProcessedPublicRead, true)
                .map_err(|e| anyhow!(e))?,
            ffmpeg_path: env::get_or(source, EnvKey::FfmpegPath, "ffmpeg"),
            transcode_timeout_secs: env::get_parsed(source, EnvKey::TranscodeTimeoutSecs, 1800),
            storage_timeout_secs: env::get_parsed(source, EnvKey::StorageTimeoutSecs, 300),
            amqp_url: env::get_opt(source, EnvKey::AmqpUrl),
            video_queue_name: env::get_or(source, EnvKey::VideoQueueName, "video-processing"),
        })
    }

    pub fn transcode_timeout(&self) -> Duration {
        Duration::from_secs(self.transcode_timeout_secs)
    }

    pub fn storage_timeout(&self) -> Duration {
        Duration::from_secs(self.storage_timeout_secs)
    }
}
