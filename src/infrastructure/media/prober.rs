use std::{path::{Path, PathBuf}, process::Stdio, sync::Arc, time::Duration};

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use mime_guess::Mime;
use tokio::process::Command;

use crate::entities::{asset::MediaKind, dimensions::Dimensions};

/// Narrow seam over the external tools that read media headers.
///
/// Implementations may fail freely; [`DimensionProber`] turns every failure into
/// [`Dimensions::UNKNOWN`].
#[async_trait]
pub trait MediaProbe: Send + Sync {
    async fn probe_video(&self, path: &Path) -> Result<Dimensions>;

    async fn probe_image(&self, path: &Path) -> Result<Dimensions>;
}

/// `ffprobe` for video streams, `imagesize` for image headers.
#[derive(Debug, Clone)]
pub struct ExternalMediaProbe {
    ffprobe: PathBuf,
    timeout: Duration,
}

impl ExternalMediaProbe {
    pub fn new(ffprobe: impl Into<PathBuf>, timeout: Duration) -> Self {
        ExternalMediaProbe { ffprobe: ffprobe.into(), timeout }
    }
}

#[async_trait]
impl MediaProbe for ExternalMediaProbe {
    async fn probe_video(&self, path: &Path) -> Result<Dimensions> {
        let child = Command::new(&self.ffprobe)
            .args(["-v", "error", "-select_streams", "v:0"])
            .args(["-show_entries", "stream=width,height"])
            .args(["-of", "csv=s=x:p=0"])
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {}", self.ffprobe.display()))?;

        // Dropping the future on timeout drops the child, which kills it.
        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| anyhow!("ffprobe timed out after {:?}", self.timeout))??;

        if !output.status.success() {
            bail!(
                "ffprobe exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Dimensions::parse_wxh(&stdout)
            .ok_or_else(|| anyhow!("unparseable ffprobe output: {:?}", stdout.trim()))
    }

    async fn probe_image(&self, path: &Path) -> Result<Dimensions> {
        let path = path.to_path_buf();
        let size = tokio::time::timeout(
            self.timeout,
            tokio::task::spawn_blocking(move || imagesize::size(&path)),
        )
        .await
        .map_err(|_| anyhow!("image header read timed out after {:?}", self.timeout))??
        .map_err(|e| anyhow!("image header read failed: {e}"))?;

        Ok(Dimensions::new(
            u32::try_from(size.width).context("image width out of range")?,
            u32::try_from(size.height).context("image height out of range")?,
        ))
    }
}

/// Category dispatch in front of a [`MediaProbe`]. Never fails.
#[derive(Clone)]
pub struct DimensionProber {
    probe: Arc<dyn MediaProbe>,
}

impl DimensionProber {
    pub fn new(probe: Arc<dyn MediaProbe>) -> Self {
        DimensionProber { probe }
    }

    pub async fn probe(&self, path: &Path, mime: &Mime) -> Dimensions {
        let result = match MediaKind::from_mime(mime) {
            MediaKind::Video => self.probe.probe_video(path).await,
            MediaKind::Image => self.probe.probe_image(path).await,
            _ => return Dimensions::UNKNOWN,
        };

        match result {
            Ok(dimensions) => dimensions,
            Err(e) => {
                tracing::warn!(path = %path.display(), %mime, "Probe failed, using 0x0: {:#}", e);
                Dimensions::UNKNOWN
            }
        }
    }
}
