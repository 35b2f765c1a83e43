use std::{fmt, path::{Path, PathBuf}};

use chrono::NaiveDate;
use mime_guess::{mime, Mime};

use crate::constants::{DATE_BUCKET_FORMAT, THUMBNAIL_SUFFIX};

/// Relative location of a stored asset: `{YYYY-MM-DD}/{file_name}`.
///
/// Both segments arrive from clients, so construction rejects anything that
/// could resolve outside the upload root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPath {
    bucket: NaiveDate,
    file_name: String,
}

impl AssetPath {
    pub fn new(bucket: NaiveDate, file_name: &str) -> Option<Self> {
        if !is_safe_file_name(file_name) {
            return None;
        }
        Some(AssetPath { bucket, file_name: file_name.to_string() })
    }

    /// Parses the two URL segments of a viewer path.
    pub fn parse(date: &str, file_name: &str) -> Option<Self> {
        // Zero padding is part of the bucket contract, so round-trip the date.
        let bucket = NaiveDate::parse_from_str(date, DATE_BUCKET_FORMAT).ok()?;
        if bucket.format(DATE_BUCKET_FORMAT).to_string() != date {
            return None;
        }
        Self::new(bucket, file_name)
    }

    pub fn bucket(&self) -> String {
        self.bucket.format(DATE_BUCKET_FORMAT).to_string()
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Cache key and URL suffix.
    pub fn joined(&self) -> String {
        format!("{}/{}", self.bucket(), self.file_name)
    }

    /// Same as [`joined`](Self::joined) with the file name percent-encoded for use in URLs.
    pub fn url_path(&self) -> String {
        format!("{}/{}", self.bucket(), urlencoding::encode(&self.file_name))
    }

    pub fn resolve(&self, root: &Path) -> PathBuf {
        root.join(self.bucket()).join(&self.file_name)
    }

    pub fn thumbnail_name(&self) -> String {
        format!("{}{}", self.file_name, THUMBNAIL_SUFFIX)
    }

    pub fn thumbnail(&self) -> AssetPath {
        AssetPath { bucket: self.bucket, file_name: self.thumbnail_name() }
    }

    pub fn mime(&self) -> Mime {
        mime_guess::from_path(&self.file_name).first_or_octet_stream()
    }

    pub fn kind(&self) -> MediaKind {
        MediaKind::from_mime(&self.mime())
    }
}

impl fmt::Display for AssetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}

/// A single path segment that names a file directly inside a bucket.
pub fn is_safe_file_name(name: &str) -> bool {
    !name.trim().is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

/// Content category driving probing and embed markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Audio,
    Text,
    Other,
}

impl MediaKind {
    pub fn from_mime(mime: &Mime) -> Self {
        let top = mime.type_();
        if top == mime::IMAGE {
            MediaKind::Image
        } else if top == mime::VIDEO {
            MediaKind::Video
        } else if top == mime::AUDIO {
            MediaKind::Audio
        } else if top == mime::TEXT {
            MediaKind::Text
        } else {
            MediaKind::Other
        }
    }

    pub fn has_dimensions(self) -> bool {
        matches!(self, MediaKind::Image | MediaKind::Video)
    }
}
