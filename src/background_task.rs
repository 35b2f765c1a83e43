use std::{path::PathBuf, sync::Arc};

use tokio::task::JoinHandle;

use crate::media::thumbnail::ThumbnailGenerator;

/// Derives a video preview frame on a detached task. Failures are logged and dropped.
pub fn spawn_thumbnail_task(
    generator: Arc<dyn ThumbnailGenerator>,
    source: PathBuf,
    target: PathBuf,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        match generator.generate(&source, &target).await {
            Ok(()) => tracing::info!("Thumbnail written to {}", target.display()),
            Err(e) => tracing::error!("Thumbnail for {} failed: {:#}", source.display(), e),
        }
    })
}
