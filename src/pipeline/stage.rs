use std::fs;

use crate::atlas::{write_tsx, AtlasCache, ImageRecord};
use crate::error::{Result, TiledError};

use super::Layout;

/// One image a stage wrote, ready to be registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Produced {
    /// Cache key.
    pub id: String,
    /// File name inside the stage's image directory.
    pub file: String,
    pub width: u32,
    pub height: u32,
}

/// Counts for one finished stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageReport {
    pub name: String,
    /// Images (re)written this run.
    pub written: usize,
    /// Ids registered for the first time.
    pub added: usize,
    /// Records that were logged and skipped.
    pub skipped: usize,
    /// Ids in the cache after the run.
    pub total: usize,
}

/// Output identity of a stage.
pub struct Stage {
    pub name: String,
    pub title: String,
    pub properties: Vec<(&'static str, String)>,
    /// Directory under `.images/`; defaults to the stage name.
    pub image_dir: String,
}

impl Stage {
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            image_dir: name.clone(),
            name,
            title: title.into(),
            properties: Vec::new(),
        }
    }

    pub fn with_image_dir(mut self, dir: impl Into<String>) -> Self {
        self.image_dir = dir.into();
        self
    }

    pub fn with_property(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.properties.push((key, value.into()));
        self
    }

    /// Load the stage's cache and make sure its image directory exists.
    pub fn open(&self, layout: &Layout) -> Result<AtlasCache> {
        let dir = layout.image_dir(&self.image_dir);
        fs::create_dir_all(&dir).map_err(|e| TiledError::io(&dir, e))?;
        AtlasCache::load(&layout.cache_path(&self.name))
    }

    /// Register `produced` in order, then persist the cache and tileset.
    pub fn commit(
        &self,
        layout: &Layout,
        mut cache: AtlasCache,
        produced: Vec<Produced>,
        skipped: usize,
    ) -> Result<StageReport> {
        let written = produced.len();
        let mut added = 0;
        for item in produced {
            let image = ImageRecord::new(&self.image_dir, &item.file, item.width, item.height);
            if cache.insert(item.id, image) {
                added += 1;
            }
        }

        cache.save(&layout.cache_path(&self.name))?;
        let properties: Vec<(&str, &str)> = self
            .properties
            .iter()
            .map(|(k, v)| (*k, v.as_str()))
            .collect();
        write_tsx(&cache, &self.title, &layout.tsx_path(&self.name), &properties)?;

        tracing::info!(stage = %self.name, written, added, skipped, total = cache.len(), "stage finished");
        Ok(StageReport {
            name: self.name.clone(),
            written,
            added,
            skipped,
            total: cache.len(),
        })
    }
}
