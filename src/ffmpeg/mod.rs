use async_trait::async_trait;
use std::env;
use std::path::Path;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Errors from invoking the external transcoder
#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("failed to launch ffmpeg: {0}")]
    Launch(#[from] std::io::Error),

    #[error("ffmpeg failed ({status}): {stderr}")]
    Failed {
        status: std::process::ExitStatus,
        stderr: String,
    },
}

/// Target audio parameters for the migration
#[derive(Debug, Clone)]
pub struct AudioSettings {
    pub codec: String,
    pub bitrate: String,
    /// Drop any embedded video/image stream (cover art) from the output
    pub strip_video: bool,
}

impl AudioSettings {
    /// Load settings from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            codec: env::var("FFMPEG_AUDIO_CODEC").unwrap_or_else(|_| "aac".to_string()),
            bitrate: env::var("FFMPEG_AUDIO_BITRATE").unwrap_or_else(|_| "128k".to_string()),
            strip_video: true,
        }
    }
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            codec: "aac".to_string(),
            bitrate: "128k".to_string(),
            strip_video: true,
        }
    }
}

/// A transcoder that turns a local input file into a local output file
#[async_trait]
pub trait Transcoder: Send + Sync {
    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), TranscodeError>;
}

/// FFmpeg wrapper for audio extraction
pub struct FfmpegTranscoder {
    settings: AudioSettings,
}

impl FfmpegTranscoder {
    pub fn new(settings: AudioSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
        let mut cmd = Command::new("ffmpeg");
        cmd.arg("-y");
        cmd.arg("-i").arg(input);
        if self.settings.strip_video {
            cmd.arg("-vn");
        }
        cmd.args(["-c:a", &self.settings.codec, "-b:a", &self.settings.bitrate]);
        cmd.arg(output);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        debug!("Executing FFmpeg command: {:?}", cmd);

        let result = cmd.output().await?;
        if !result.status.success() {
            return Err(TranscodeError::Failed {
                status: result.status,
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}
