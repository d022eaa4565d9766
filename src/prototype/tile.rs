//! Flat (non-inheriting) prototypes: floor tiles and decals.

use serde::Deserialize;
use serde_yaml::Value;

use crate::error::{Result, TiledError};

use super::loader::scalar_string;

/// A floor tile prototype.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TilePrototype {
    pub id: String,
    /// Sheet path relative to `Resources/`; tiles without one (space) are skipped.
    #[serde(default)]
    pub sprite: Option<String>,
    /// Number of variants packed side by side on the sheet.
    #[serde(default = "one")]
    pub variants: u32,
}

fn one() -> u32 {
    1
}

impl TilePrototype {
    pub fn from_value(value: Value) -> Result<Self> {
        serde_yaml::from_value(value).map_err(|e| TiledError::Parse {
            message: format!("Invalid tile prototype: {}", e),
            help: None,
        })
    }

    /// Width of one variant on a sheet of `sheet_width` pixels.
    pub fn variant_width(&self, sheet_width: u32) -> u32 {
        sheet_width / self.variants.max(1)
    }
}

/// A decal prototype, pointing at one state of an RSI.
#[derive(Debug, Clone, PartialEq)]
pub struct DecalPrototype {
    pub id: String,
    /// RSI directory path as written (`/Textures/...`).
    pub rsi: String,
    pub state: String,
}

#[derive(Deserialize)]
struct RawDecal {
    id: Value,
    sprite: RawDecalSprite,
}

#[derive(Deserialize)]
struct RawDecalSprite {
    sprite: String,
    state: Value,
}

impl DecalPrototype {
    pub fn from_value(value: Value) -> Result<Self> {
        let raw: RawDecal = serde_yaml::from_value(value).map_err(|e| TiledError::Parse {
            message: format!("Invalid decal prototype: {}", e),
            help: None,
        })?;

        let id = scalar_string(&raw.id).ok_or_else(|| TiledError::Parse {
            message: "Decal id must be a scalar".to_string(),
            help: None,
        })?;
        let state = scalar_string(&raw.sprite.state).ok_or_else(|| TiledError::Parse {
            message: format!("Decal '{}' has a non-scalar state", id),
            help: None,
        })?;

        Ok(Self {
            id,
            rsi: raw.sprite.sprite,
            state,
        })
    }
}
