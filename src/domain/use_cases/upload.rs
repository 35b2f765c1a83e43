use std::{path::{Path, PathBuf}, sync::Arc};

use actix_web::web::Bytes;
use chrono::{Local, NaiveDate};
use futures_util::{Stream, StreamExt};
use tokio::{fs, io::AsyncWriteExt, task::JoinHandle};

use crate::{
    background_task::spawn_thumbnail_task,
    entities::asset::{AssetPath, MediaKind},
    errors::{AppError, IngestError},
    media::thumbnail::ThumbnailGenerator,
};

/// Result of a completed byte copy.
#[derive(Debug, Clone)]
pub struct StoredUpload {
    pub asset: AssetPath,
    /// Public viewer URL handed back to the uploader.
    pub locator: String,
    pub bytes_written: u64,
}

pub struct UploadHandler {
    pub upload_dir: PathBuf,
    pub public_host: String,
    pub thumbnailer: Arc<dyn ThumbnailGenerator>,
}

impl UploadHandler {
    pub fn new(
        upload_dir: impl Into<PathBuf>,
        public_host: impl Into<String>,
        thumbnailer: Arc<dyn ThumbnailGenerator>,
    ) -> Self {
        UploadHandler {
            upload_dir: upload_dir.into(),
            public_host: public_host.into(),
            thumbnailer,
        }
    }

    /// Stores the stream under today's bucket in the server's local calendar.
    pub async fn store<S>(&self, file_name: &str, stream: S) -> Result<StoredUpload, AppError>
    where
        S: Stream<Item = Result<Bytes, IngestError>> + Unpin,
    {
        self.store_in_bucket(Local::now().date_naive(), file_name, stream).await
    }

    /// Copies the stream chunk by chunk to `{upload_dir}/{bucket}/{file_name}`.
    ///
    /// Each chunk is written before the next one is pulled, so a slow disk slows
    /// the upload instead of growing memory. An existing file with the same name
    /// is overwritten. A stream refused for size is removed again; any other
    /// failure leaves the partial file in place.
    pub async fn store_in_bucket<S>(
        &self,
        bucket: NaiveDate,
        file_name: &str,
        mut stream: S,
    ) -> Result<StoredUpload, AppError>
    where
        S: Stream<Item = Result<Bytes, IngestError>> + Unpin,
    {
        let asset = AssetPath::new(bucket, file_name)
            .ok_or_else(|| AppError::ValidationError("Invalid file name".to_string()))?;

        let target = asset.resolve(&self.upload_dir);
        let bucket_dir = self.upload_dir.join(asset.bucket());

        fs::create_dir_all(&bucket_dir).await.map_err(|e| {
            tracing::error!("Failed to create {}: {}", bucket_dir.display(), e);
            AppError::StorageFailure
        })?;

        let mut file = fs::File::create(&target).await.map_err(|e| {
            tracing::error!("Failed to create {}: {}", target.display(), e);
            AppError::StorageFailure
        })?;

        let mut bytes_written = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(IngestError::TooLarge(limit)) => {
                    drop(file);
                    discard(&target).await;
                    tracing::warn!(asset = %asset, limit, "Upload refused: over the size limit");
                    return Err(AppError::PayloadTooLarge(limit));
                }
                Err(e) => {
                    tracing::warn!(asset = %asset, bytes_written, "Upload aborted by source: {}", e);
                    return Err(AppError::from(e));
                }
            };

            file.write_all(&chunk).await.map_err(|e| {
                tracing::error!("Write to {} failed after {} bytes: {}", target.display(), bytes_written, e);
                AppError::StorageFailure
            })?;
            bytes_written += chunk.len() as u64;
        }

        file.flush().await.map_err(|e| {
            tracing::error!("Flush of {} failed: {}", target.display(), e);
            AppError::StorageFailure
        })?;

        tracing::info!(asset = %asset, bytes_written, "Stored upload");

        Ok(StoredUpload {
            locator: format!("{}/s/{}", self.public_host, asset.url_path()),
            asset,
            bytes_written,
        })
    }

    /// Starts post-processing for a stored upload and returns without waiting.
    ///
    /// Only videos get work: a preview frame written next to the asset. The handle
    /// is a completion signal; dropping it leaves the task running.
    pub fn start_post_processing(&self, upload: &StoredUpload) -> Option<JoinHandle<()>> {
        if upload.asset.kind() != MediaKind::Video {
            return None;
        }

        let source = upload.asset.resolve(&self.upload_dir);
        let target = upload.asset.thumbnail().resolve(&self.upload_dir);
        Some(spawn_thumbnail_task(self.thumbnailer.clone(), source, target))
    }
}

/// Removes a refused upload so it is never served.
async fn discard(target: &Path) {
    if let Err(e) = fs::remove_file(target).await {
        tracing::error!("Failed to remove refused upload {}: {}", target.display(), e);
    }
}
