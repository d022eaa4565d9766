//! The per-stage id/image cache persisted under `.data/`.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TiledError};

/// One image registered in a tileset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Path relative to the output directory, e.g. `./.images/tiles/floor.png`.
    pub source: String,
    #[serde(with = "dimension")]
    pub width: u32,
    #[serde(with = "dimension")]
    pub height: u32,
}

impl ImageRecord {
    pub fn new(dir: &str, file: &str, width: u32, height: u32) -> Self {
        Self {
            source: format!("./.images/{}/{}", dir, file),
            width,
            height,
        }
    }
}

/// Ordered, append-only list of registered ids with their images.
///
/// `ids[i]` belongs to `images[i]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtlasCache {
    ids: Vec<String>,
    images: Vec<ImageRecord>,
    /// Every entry of `ids`, for constant-time membership.
    #[serde(skip)]
    index: HashSet<String>,
}

impl AtlasCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the cache at `path`, or an empty one if it does not exist yet.
    ///
    /// The parent directory is created so a later [`save`](Self::save) succeeds.
    pub fn load(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| TiledError::io(parent, e))?;
        }
        if !path.exists() {
            return Ok(Self::new());
        }

        let text = fs::read_to_string(path).map_err(|e| TiledError::io(path, e))?;
        let mut cache: AtlasCache = serde_json::from_str(&text).map_err(|e| TiledError::Io {
            path: path.to_path_buf(),
            message: format!("Corrupt cache: {}", e),
        })?;
        if cache.ids.len() != cache.images.len() {
            return Err(TiledError::Io {
                path: path.to_path_buf(),
                message: format!(
                    "Corrupt cache: {} ids but {} images",
                    cache.ids.len(),
                    cache.images.len()
                ),
            });
        }
        cache.index = cache.ids.iter().cloned().collect();
        Ok(cache)
    }

    /// Registered ids, in registration order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn images(&self) -> &[ImageRecord] {
        &self.images
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains(id)
    }

    /// Register `id` unless it is already present. Returns true if added.
    pub fn insert(&mut self, id: impl Into<String>, image: ImageRecord) -> bool {
        let id = id.into();
        if self.contains(&id) {
            return false;
        }
        self.index.insert(id.clone());
        self.ids.push(id);
        self.images.push(image);
        true
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Write the cache as JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| TiledError::Build {
            message: format!("Failed to serialize cache: {}", e),
            help: None,
        })?;
        fs::write(path, json).map_err(|e| TiledError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to write cache: {}", e),
        })
    }
}

/// Dimensions are written as strings and read from strings or numbers.
mod dimension {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(n),
            Raw::Text(s) => s.trim().parse().map_err(de::Error::custom),
        }
    }
}
