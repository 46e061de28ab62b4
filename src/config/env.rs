use std::collections::HashMap;
use std::env;
use std::str::FromStr;

pub enum EnvKey {
    ServerPort,
    StorageBackend,
    S3Endpoint,
    S3Region,
    AccessKey,
    SecretKey,
    RawVideoBucket,
    ProcessedVideoBucket,
    LocalStorageRoot,
    RawVideoDir,
    ProcessedVideoDir,
    ProcessedPublicRead,
    FfmpegPath,
    TranscodeTimeoutSecs,
    StorageTimeoutSecs,
    AmqpUrl,
    VideoQueueName,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerPort => "PORT",
            EnvKey::StorageBackend => "STORAGE_BACKEND",
            EnvKey::S3Endpoint => "S3_ENDPOINT",
            EnvKey::S3Region => "S3_REGION",
            EnvKey::AccessKey => "AWS_ACCESS_KEY_ID",
            EnvKey::SecretKey => "AWS_SECRET_ACCESS_KEY",
            EnvKey::RawVideoBucket => "RAW_VIDEO_BUCKET",
            EnvKey::ProcessedVideoBucket => "PROCESSED_VIDEO_BUCKET",
            EnvKey::LocalStorageRoot => "LOCAL_STORAGE_ROOT",
            EnvKey::RawVideoDir => "RAW_VIDEO_DIR",
            EnvKey::ProcessedVideoDir => "PROCESSED_VIDEO_DIR",
            EnvKey::ProcessedPublicRead => "PROCESSED_PUBLIC_READ",
            EnvKey::FfmpegPath => "FFMPEG_PATH",
            EnvKey::TranscodeTimeoutSecs => "TRANSCODE_TIMEOUT_SECS",
            EnvKey::StorageTimeoutSecs => "STORAGE_TIMEOUT_SECS",
            EnvKey::AmqpUrl => "AMQP_URL",
            EnvKey::VideoQueueName => "VIDEO_QUEUE_NAME",
        }
    }
}

/// Where configuration values come from. The service reads the process
/// environment; tests supply a map.
pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;
}

pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

impl EnvSource for HashMap<&str, &str> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).map(|v| v.to_string())
    }
}

/// Unset and blank values are both treated as absent.
pub fn get_opt(source: &impl EnvSource, key: EnvKey) -> Option<String> {
    source.var(key.as_str()).filter(|v| !v.trim().is_empty())
}

pub fn get_or(source: &impl EnvSource, key: EnvKey, default: &str) -> String {
    get_opt(source, key).unwrap_or_else(|| default.to_string())
}

pub fn get_parsed<T: FromStr>(source: &impl EnvSource, key: EnvKey, default: T) -> T {
    match get_opt(source, key) {
        Some(val) => val.trim().parse::<T>().unwrap_or(default),
        None => default,
    }
}

/// Boolean switch. Unset means `default`; any value that is not a
/// recognised spelling is an error rather than a silent fallback.
pub fn get_flag(source: &impl EnvSource, key: EnvKey, default: bool) -> Result<bool, String> {
    let name = key.as_str();
    match get_opt(source, key) {
        None => Ok(default),
        Some(val) => parse_flag(&val)
            .ok_or_else(|| format!("{} must be one of true/false/1/0/yes/no/on/off, got '{}'", name, val)),
    }
}

pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
