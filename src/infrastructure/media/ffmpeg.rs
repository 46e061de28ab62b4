use super::{TranscodeError, Transcoder, TARGET_HEIGHT};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, error, info};

/// How many trailing stderr lines are kept as the failure message.
const STDERR_TAIL_LINES: usize = 5;

#[derive(Clone, Debug)]
pub struct FfmpegTranscoder {
    binary: PathBuf,
    target_height: u32,
}

impl FfmpegTranscoder {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            target_height: TARGET_HEIGHT,
        }
    }

    /// `scale=-1:H` lets ffmpeg pick the width from the source aspect ratio.
    pub fn scale_filter(&self) -> String {
        format!("scale=-1:{}", self.target_height)
    }

    fn args(&self, input: &Path, output: &Path) -> Vec<OsString> {
        vec![
            "-hide_banner".into(),
            "-y".into(),
            "-i".into(),
            input.as_os_str().to_owned(),
            "-vf".into(),
            self.scale_filter().into(),
            output.as_os_str().to_owned(),
        ]
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn convert(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
        let args = self.args(input, output);
        debug!(binary = %self.binary.display(), ?args, "Spawning ffmpeg");

        // kill_on_drop ties the child's lifetime to this future, so a caller
        // timeout or a dropped request terminates the process.
        let result = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| TranscodeError::Spawn {
                binary: self.binary.display().to_string(),
                source,
            })?;

        if result.status.success() {
            info!("🎬 Transcoded {} -> {}", input.display(), output.display());
            return Ok(());
        }

        let code = result
            .status
            .code()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "signal".to_string());
        let tail = stderr_tail(&result.stderr, STDERR_TAIL_LINES);
        let message = if tail.is_empty() {
            format!("ffmpeg exited with code {}", code)
        } else {
            format!("ffmpeg exited with code {}: {}", code, tail)
        };

        error!("❌ An error has occurred: {}", message);
        Err(TranscodeError::Failed(message))
    }
}

fn stderr_tail(stderr: &[u8], lines: usize) -> String {
    let text = String::from_utf8_lossy(stderr);
    let kept: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let start = kept.len().saturating_sub(lines);
    kept[start..].join("\n")
}
