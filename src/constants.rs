use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

pub const BYTES_PER_GIB: u64 = 1024 * 1024 * 1024;

/// Appended to a video's file name to form its preview frame.
pub const THUMBNAIL_SUFFIX: &str = ".thumb.jpg";

/// Date bucket directory format.
pub const DATE_BUCKET_FORMAT: &str = "%Y-%m-%d";

/// Static preview image used for audio embeds.
pub const AUDIO_FALLBACK_ICON: &str = "/assets/audio.svg";
