use std::{path::{Path, PathBuf}, process::Stdio, time::Duration};

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use tokio::process::Command;

/// Derives a single preview frame for a stored video.
#[async_trait]
pub trait ThumbnailGenerator: Send + Sync {
    async fn generate(&self, source: &Path, target: &Path) -> Result<()>;
}

/// Grabs the frame at the one-second mark with `ffmpeg`.
#[derive(Debug, Clone)]
pub struct FfmpegThumbnailer {
    ffmpeg: PathBuf,
    timeout: Duration,
}

impl FfmpegThumbnailer {
    pub fn new(ffmpeg: impl Into<PathBuf>, timeout: Duration) -> Self {
        FfmpegThumbnailer { ffmpeg: ffmpeg.into(), timeout }
    }
}

#[async_trait]
impl ThumbnailGenerator for FfmpegThumbnailer {
    async fn generate(&self, source: &Path, target: &Path) -> Result<()> {
        let child = Command::new(&self.ffmpeg)
            .args(["-y", "-v", "error", "-ss", "00:00:01", "-i"])
            .arg(source)
            .args(["-frames:v", "1"])
            .arg(target)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {}", self.ffmpeg.display()))?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| anyhow!("ffmpeg timed out after {:?}", self.timeout))??;

        if !output.status.success() {
            bail!(
                "ffmpeg exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        // Seeking past the end of a short clip exits 0 without writing a frame.
        if !tokio::fs::try_exists(target).await.unwrap_or(false) {
            bail!("ffmpeg wrote no frame to {}", target.display());
        }
        Ok(())
    }
}
