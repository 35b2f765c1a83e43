use std::{path::{Path, PathBuf}, sync::Arc};

use mime_guess::Mime;
use tokio::{fs, io::AsyncReadExt};

use crate::{
    constants::AUDIO_FALLBACK_ICON,
    entities::{asset::{AssetPath, MediaKind}, dimensions::Dimensions},
    errors::AppError,
    media::prober::DimensionProber,
    repositories::dimensions::DimensionCache,
    utils::{
        crawler::is_crawler,
        html::{escape_html, truncate_utf8},
        template::{Markup, PageTemplate, ViewModel},
    },
};

/// Outcome of a viewer request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Page(String),
    /// Absolute URL of the raw file.
    Redirect(String),
}

pub struct RenderHandler {
    pub upload_dir: PathBuf,
    pub public_host: String,
    pub site_name: String,
    pub text_preview_limit: usize,
    pub cache: Arc<dyn DimensionCache>,
    pub prober: DimensionProber,
    pub template: PageTemplate,
}

/// URLs derived from one asset path.
struct AssetUrls {
    /// Site-relative raw file URL used inside the page.
    raw: String,
    raw_absolute: String,
    page_absolute: String,
}

impl RenderHandler {
    pub async fn render(
        &self,
        date: &str,
        file_name: &str,
        user_agent: Option<&str>,
    ) -> Result<Rendered, AppError> {
        let asset = AssetPath::parse(date, file_name).ok_or_else(|| {
            tracing::debug!(date, file_name, "Rejected viewer path");
            AppError::NotFound
        })?;

        let file_path = asset.resolve(&self.upload_dir);
        if !is_file(&file_path).await {
            return Err(AppError::NotFound);
        }

        let mime = asset.mime();
        let kind = MediaKind::from_mime(&mime);
        let urls = self.urls(&asset);

        if kind == MediaKind::Image && is_crawler(user_agent) {
            return Ok(Rendered::Redirect(urls.raw_absolute));
        }

        let dimensions = if kind.has_dimensions() {
            self.dimensions(&asset, &file_path, &mime).await
        } else {
            Dimensions::UNKNOWN
        };

        let poster = if kind == MediaKind::Video {
            let thumbnail = asset.thumbnail();
            is_file(&thumbnail.resolve(&self.upload_dir))
                .await
                .then(|| format!("{}/f/{}", self.public_host, thumbnail.url_path()))
        } else {
            None
        };

        let file_content = match kind {
            MediaKind::Text => self.text_markup(&file_path, &urls).await?,
            _ => embed_markup(kind, &asset, &urls, dimensions, poster.as_deref()),
        };

        let view = ViewModel {
            file_content,
            og_tags: self.og_tags(kind, &asset, &mime, &urls, dimensions, poster.as_deref()),
            filename: asset.file_name().to_string(),
            joined_path: asset.url_path(),
            site_name: self.site_name.clone(),
        };

        Ok(Rendered::Page(self.template.render(&view)))
    }

    /// Read-through lookup: cache first, then probe and remember the result.
    ///
    /// Cache failures only cost a redundant probe; they never fail the page.
    async fn dimensions(&self, asset: &AssetPath, file_path: &Path, mime: &Mime) -> Dimensions {
        let key = asset.joined();

        match self.cache.get(&key).await {
            Ok(Some(record)) => return record.dimensions(),
            Ok(None) => {}
            Err(e) => tracing::warn!(path = %key, "Dimension cache read failed: {}", e),
        }

        let dimensions = self.prober.probe(file_path, mime).await;
        if let Err(e) = self.cache.put(&key, dimensions).await {
            tracing::warn!(path = %key, "Dimension cache write failed: {}", e);
        }
        dimensions
    }

    fn urls(&self, asset: &AssetPath) -> AssetUrls {
        let url_path = asset.url_path();
        AssetUrls {
            raw: format!("/f/{}", url_path),
            raw_absolute: format!("{}/f/{}", self.public_host, url_path),
            page_absolute: format!("{}/s/{}", self.public_host, url_path),
        }
    }

    async fn text_markup(&self, file_path: &Path, urls: &AssetUrls) -> Result<Markup, AppError> {
        let file = fs::File::open(file_path).await.map_err(|e| {
            tracing::error!("Failed to open {}: {}", file_path.display(), e);
            AppError::InternalError("text preview unavailable".to_string())
        })?;

        let limit = self.text_preview_limit;
        let mut buffer = Vec::with_capacity(limit.min(64 * 1024));
        // One byte past the limit tells us whether anything was cut.
        file.take((limit as u64).saturating_add(1))
            .read_to_end(&mut buffer)
            .await
            .map_err(|e| {
                tracing::error!("Failed to read {}: {}", file_path.display(), e);
                AppError::InternalError("text preview unavailable".to_string())
            })?;

        let truncated = buffer.len() > limit;
        let text = String::from_utf8_lossy(&buffer);
        let shown: &str = if truncated { truncate_utf8(&text, limit) } else { &text };

        let mut markup = Markup::trusted(format!("<pre>{}</pre>", escape_html(shown)));
        if truncated {
            markup.push(&format!(
                "\n<p class=\"notice\">Preview truncated at {} bytes. <a href=\"{}\" download>Download the full file</a>.</p>",
                limit,
                escape_html(&urls.raw)
            ));
        }
        Ok(markup)
    }

    fn og_tags(
        &self,
        kind: MediaKind,
        asset: &AssetPath,
        mime: &Mime,
        urls: &AssetUrls,
        dimensions: Dimensions,
        poster: Option<&str>,
    ) -> Markup {
        let mut tags = Markup::new();
        let mime = mime.essence_str();

        meta(&mut tags, "property", "og:title", asset.file_name());
        meta(&mut tags, "property", "og:url", &urls.page_absolute);
        meta(&mut tags, "property", "og:site_name", &self.site_name);
        meta(&mut tags, "name", "twitter:title", asset.file_name());

        match kind {
            MediaKind::Image => {
                meta(&mut tags, "property", "og:type", "website");
                meta(&mut tags, "property", "og:image", &urls.raw_absolute);
                meta(&mut tags, "property", "og:image:type", mime);
                size_tags(&mut tags, "og:image", dimensions);
                meta(&mut tags, "name", "twitter:card", "summary_large_image");
                meta(&mut tags, "name", "twitter:image", &urls.raw_absolute);
            }
            MediaKind::Video => {
                meta(&mut tags, "property", "og:type", "video.other");
                meta(&mut tags, "property", "og:video", &urls.raw_absolute);
                meta(&mut tags, "property", "og:video:url", &urls.raw_absolute);
                if urls.raw_absolute.starts_with("https://") {
                    meta(&mut tags, "property", "og:video:secure_url", &urls.raw_absolute);
                }
                meta(&mut tags, "property", "og:video:type", mime);
                size_tags(&mut tags, "og:video", dimensions);
                if let Some(poster) = poster {
                    meta(&mut tags, "property", "og:image", poster);
                    meta(&mut tags, "name", "twitter:image", poster);
                }
                meta(&mut tags, "name", "twitter:card", "summary_large_image");
            }
            MediaKind::Audio => {
                let icon = format!("{}{}", self.public_host, AUDIO_FALLBACK_ICON);
                meta(&mut tags, "property", "og:type", "music.song");
                meta(&mut tags, "property", "og:audio", &urls.raw_absolute);
                meta(&mut tags, "property", "og:audio:type", mime);
                meta(&mut tags, "property", "og:image", &icon);
                meta(&mut tags, "name", "twitter:card", "summary");
            }
            MediaKind::Text | MediaKind::Other => {
                meta(&mut tags, "property", "og:type", "website");
                meta(&mut tags, "name", "twitter:card", "summary");
            }
        }

        tags
    }
}

fn embed_markup(
    kind: MediaKind,
    asset: &AssetPath,
    urls: &AssetUrls,
    dimensions: Dimensions,
    poster: Option<&str>,
) -> Markup {
    let src = escape_html(&urls.raw);
    let name = escape_html(asset.file_name());
    let size = if dimensions.is_known() {
        format!(" width=\"{}\" height=\"{}\"", dimensions.width, dimensions.height)
    } else {
        String::new()
    };

    let html = match kind {
        MediaKind::Image => format!("<img src=\"{src}\" alt=\"{name}\"{size}>"),
        MediaKind::Video => {
            let poster = poster
                .map(|p| format!(" poster=\"{}\"", escape_html(p)))
                .unwrap_or_default();
            format!("<video src=\"{src}\" controls preload=\"metadata\"{poster}{size}></video>")
        }
        MediaKind::Audio => format!("<audio src=\"{src}\" controls preload=\"metadata\"></audio>"),
        MediaKind::Text | MediaKind::Other => {
            format!("<a href=\"{src}\" download>Download {name}</a>")
        }
    };
    Markup::trusted(html)
}

fn meta(tags: &mut Markup, attribute: &str, key: &str, content: &str) {
    tags.push(&format!(
        "<meta {}=\"{}\" content=\"{}\">\n",
        attribute,
        key,
        escape_html(content)
    ));
}

fn size_tags(tags: &mut Markup, prefix: &str, dimensions: Dimensions) {
    if dimensions.is_known() {
        meta(tags, "property", &format!("{prefix}:width"), &dimensions.width.to_string());
        meta(tags, "property", &format!("{prefix}:height"), &dimensions.height.to_string());
    }
}

async fn is_file(path: &Path) -> bool {
    fs::metadata(path).await.map(|m| m.is_file()).unwrap_or(false)
}
