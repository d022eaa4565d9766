//! Memoized access to RSI metadata and decoded sprite sheets.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::RgbaImage;

use crate::error::{Result, TiledError};
use crate::rsi::{RsiMeta, META_FILENAME};

use super::png::load_rgba;

/// Lookup table for one run of the entity stage.
///
/// Each RSI directory and sheet is read at most once; later requests share
/// the decoded value.
#[derive(Debug)]
pub struct SpriteStore {
    textures: PathBuf,
    metas: HashMap<PathBuf, Arc<RsiMeta>>,
    sheets: HashMap<PathBuf, Arc<RgbaImage>>,
}

impl SpriteStore {
    /// Create a store rooted at a `Resources/Textures` directory.
    pub fn new(textures: impl Into<PathBuf>) -> Self {
        Self {
            textures: textures.into(),
            metas: HashMap::new(),
            sheets: HashMap::new(),
        }
    }

    /// Map a sprite path as written in a prototype (`/Textures/Foo.rsi` or
    /// `Foo.rsi`) to its directory on disk.
    pub fn rsi_dir(&self, sprite: &str) -> PathBuf {
        let relative = sprite.strip_prefix("/Textures/").unwrap_or(sprite);
        self.textures.join(relative.trim_start_matches('/'))
    }

    /// Metadata for the RSI at `sprite`.
    pub fn meta(&mut self, sprite: &str) -> Result<Arc<RsiMeta>> {
        let dir = self.rsi_dir(sprite);
        if let Some(meta) = self.metas.get(&dir) {
            return Ok(Arc::clone(meta));
        }

        if !dir.join(META_FILENAME).is_file() {
            return Err(TiledError::build(format!("missing RSI '{}'", sprite)));
        }
        let meta = Arc::new(RsiMeta::load(&dir)?);
        self.metas.insert(dir, Arc::clone(&meta));
        Ok(meta)
    }

    /// Decoded sheet for `state` of the RSI at `sprite`.
    pub fn sheet(&mut self, sprite: &str, state: &str) -> Result<Arc<RgbaImage>> {
        let path = self.rsi_dir(sprite).join(format!("{}.png", state));
        if let Some(sheet) = self.sheets.get(&path) {
            return Ok(Arc::clone(sheet));
        }

        let sheet = Arc::new(load_rgba(&path)?);
        self.sheets.insert(path, Arc::clone(&sheet));
        Ok(sheet)
    }

    /// Number of distinct RSIs read so far.
    pub fn rsi_count(&self) -> usize {
        self.metas.len()
    }
}
