use std::sync::Arc;

use rand::{distributions::Alphanumeric, Rng};
use validator::Validate;

use crate::{
    entities::short_link::{ShortLink, ShortenRequest, ShortenResponse},
    errors::AppError,
    repositories::short_link::ShortLinkRepository,
};

const SHORT_ID_LEN: usize = 8;
const MAX_ID_ATTEMPTS: usize = 5;

pub struct ShortenHandler {
    pub link_repo: Arc<dyn ShortLinkRepository>,
    pub public_host: String,
}

impl ShortenHandler {
    pub fn new(link_repo: Arc<dyn ShortLinkRepository>, public_host: impl Into<String>) -> Self {
        ShortenHandler { link_repo, public_host: public_host.into() }
    }

    /// Stores `request.url` under a fresh random id.
    pub async fn shorten(&self, request: ShortenRequest) -> Result<ShortenResponse, AppError> {
        request.validate()?;
        let target_url = request
            .url
            .ok_or_else(|| AppError::ValidationError("url is required".to_string()))?;

        for _ in 0..MAX_ID_ATTEMPTS {
            let link = ShortLink { short_id: generate_short_id(), target_url: target_url.clone() };
            if self.link_repo.insert_link(&link).await? {
                tracing::info!(short_id = %link.short_id, "Created short link");
                return Ok(ShortenResponse {
                    url: format!("{}/l/{}", self.public_host, link.short_id),
                });
            }
            tracing::debug!(short_id = %link.short_id, "Short id collision, retrying");
        }

        Err(AppError::InternalError("could not allocate a short id".to_string()))
    }

    pub async fn resolve(&self, short_id: &str) -> Result<String, AppError> {
        if short_id.is_empty() || !short_id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(AppError::NotFound);
        }

        self.link_repo
            .get_link(short_id)
            .await?
            .map(|link| link.target_url)
            .ok_or(AppError::NotFound)
    }
}

fn generate_short_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SHORT_ID_LEN)
        .map(char::from)
        .collect()
}
