use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod background_task;
pub mod shared_repos;
pub mod server;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, repositories, routes};
pub use infrastructure::{db, media, utils};

use media::{
    prober::{DimensionProber, ExternalMediaProbe, MediaProbe},
    thumbnail::{FfmpegThumbnailer, ThumbnailGenerator},
};
use repositories::{dimensions::DimensionCache, short_link::ShortLinkRepository};
use shared_repos::SharedRepositories;
use use_cases::{render::RenderHandler, shorten::ShortenHandler, upload::UploadHandler};
use utils::template::PageTemplate;

/// Swappable collaborators behind the use cases.
#[derive(Clone)]
pub struct AppComponents {
    pub dimension_cache: Arc<dyn DimensionCache>,
    pub link_repo: Arc<dyn ShortLinkRepository>,
    pub media_probe: Arc<dyn MediaProbe>,
    pub thumbnailer: Arc<dyn ThumbnailGenerator>,
}

impl AppComponents {
    /// SQLite repositories plus the external ffprobe/ffmpeg tools.
    pub fn production(config: &settings::AppConfig, repos: SharedRepositories) -> Self {
        let timeout = config.probe_timeout();

        AppComponents {
            dimension_cache: Arc::new(repos.dimension_repo),
            link_repo: Arc::new(repos.short_link_repo),
            media_probe: Arc::new(ExternalMediaProbe::new(&config.ffprobe_path, timeout)),
            // Seeking plus one frame encode takes longer than a header read.
            thumbnailer: Arc::new(FfmpegThumbnailer::new(&config.ffmpeg_path, timeout * 3)),
        }
    }
}

pub struct AppState {
    pub api_key: String,
    pub max_upload_bytes: u64,
    pub dimension_cache: Arc<dyn DimensionCache>,
    pub upload_handler: UploadHandler,
    pub render_handler: RenderHandler,
    pub shorten_handler: ShortenHandler,
}

impl AppState {
    pub fn new(config: &settings::AppConfig, components: AppComponents) -> Self {
        let upload_handler = UploadHandler::new(
            config.upload_dir.clone(),
            config.host.clone(),
            components.thumbnailer,
        );

        let render_handler = RenderHandler {
            upload_dir: config.upload_dir.clone(),
            public_host: config.host.clone(),
            site_name: config.site_name.clone(),
            text_preview_limit: config.text_preview_limit,
            cache: components.dimension_cache.clone(),
            prober: DimensionProber::new(components.media_probe),
            template: PageTemplate::default(),
        };

        let shorten_handler = ShortenHandler::new(components.link_repo, config.host.clone());

        AppState {
            api_key: config.api_key.clone(),
            max_upload_bytes: config.max_upload_bytes(),
            dimension_cache: components.dimension_cache,
            upload_handler,
            render_handler,
            shorten_handler,
        }
    }
}
