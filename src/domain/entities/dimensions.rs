use serde::{Deserialize, Serialize};

/// Intrinsic pixel size of an image or video. `{0, 0}` means "unknown".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const UNKNOWN: Dimensions = Dimensions { width: 0, height: 0 };

    pub fn new(width: u32, height: u32) -> Self {
        Dimensions { width, height }
    }

    pub fn is_known(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Parses the `WIDTHxHEIGHT` line printed by the video probe.
    pub fn parse_wxh(raw: &str) -> Option<Self> {
        let line = raw.lines().map(str::trim).find(|line| !line.is_empty())?;
        let (width, height) = line.split_once('x')?;
        Some(Dimensions {
            width: width.trim().parse().ok()?,
            height: height.trim().trim_end_matches('x').parse().ok()?,
        })
    }
}

/// Cached dimensions of one stored asset, keyed by its `{date}/{file}` path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct DimensionRecord {
    pub path: String,
    pub width: i64,
    pub height: i64,
}

impl DimensionRecord {
    pub fn new(path: impl Into<String>, dimensions: Dimensions) -> Self {
        DimensionRecord {
            path: path.into(),
            width: i64::from(dimensions.width),
            height: i64::from(dimensions.height),
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: u32::try_from(self.width).unwrap_or(0),
            height: u32::try_from(self.height).unwrap_or(0),
        }
    }
}
