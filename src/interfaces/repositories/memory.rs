use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};

use crate::{
    entities::{dimensions::{DimensionRecord, Dimensions}, short_link::ShortLink},
    errors::AppError,
    repositories::{dimensions::DimensionCache, short_link::ShortLinkRepository},
};

/// Process-local dimension cache with the same first-write-wins rule as the SQLite one.
#[derive(Debug, Default)]
pub struct InMemoryDimensionCache {
    records: DashMap<String, Dimensions>,
}

impl InMemoryDimensionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl DimensionCache for InMemoryDimensionCache {
    async fn get(&self, path: &str) -> Result<Option<DimensionRecord>, AppError> {
        Ok(self
            .records
            .get(path)
            .map(|entry| DimensionRecord::new(path, *entry.value())))
    }

    async fn put(&self, path: &str, dimensions: Dimensions) -> Result<(), AppError> {
        self.records.entry(path.to_string()).or_insert(dimensions);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryShortLinkRepo {
    links: DashMap<String, String>,
}

impl InMemoryShortLinkRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ShortLinkRepository for InMemoryShortLinkRepo {
    async fn insert_link(&self, link: &ShortLink) -> Result<bool, AppError> {
        match self.links.entry(link.short_id.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(link.target_url.clone());
                Ok(true)
            }
        }
    }

    async fn get_link(&self, short_id: &str) -> Result<Option<ShortLink>, AppError> {
        Ok(self.links.get(short_id).map(|target| ShortLink {
            short_id: short_id.to_string(),
            target_url: target.value().clone(),
        }))
    }
}
