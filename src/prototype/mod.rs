//! Prototype loading and inheritance resolution.
//!
//! Prototypes are YAML records tagged by a `type` discriminator. Entities
//! form an inheritance graph through their `parent` field and are resolved
//! into fully merged records; tiles, decals and palettes are flat.
//!
//! # Example
//!
//! ```ignore
//! use ss14_tiled::prototype::{load_entities, resolve_entities, filter_entities};
//!
//! let records = load_entities(&root.join("Resources/Prototypes"));
//! let entities = filter_entities(resolve_entities(records)?);
//! ```

mod entity;
mod filter;
mod graph;
pub mod loader;
mod resolver;
mod tile;

use std::fmt;
use std::path::Path;

pub use entity::{Component, ComponentMap, EntityPrototype, ResolvedEntity};
pub use filter::{exclusion_reason, filter_entities, is_mappable};
pub use graph::{Blocker, ParentGraph};
pub use loader::{load_records, parse_document, scan_prototype_files};
pub use resolver::{resolve_entities, EntityMap};
pub use tile::{DecalPrototype, TilePrototype};

use crate::error::Result;
use crate::types::Palette;

/// The `type` discriminator of a prototype record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrototypeKind {
    Entity,
    Tile,
    Decal,
    Palette,
}

impl PrototypeKind {
    /// The tag used in prototype files.
    pub fn tag(&self) -> &'static str {
        match self {
            PrototypeKind::Entity => "entity",
            PrototypeKind::Tile => "tile",
            PrototypeKind::Decal => "decal",
            PrototypeKind::Palette => "palette",
        }
    }
}

impl fmt::Display for PrototypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Load every record of `kind` under `dir` and convert it, logging and
/// skipping records that do not convert.
fn load_typed<T>(dir: &Path, kind: PrototypeKind, convert: impl Fn(serde_yaml::Value) -> Result<T>) -> Vec<T> {
    load_records(dir, kind)
        .into_iter()
        .filter_map(|value| match convert(value) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(kind = %kind, "skipping prototype: {}", e);
                None
            }
        })
        .collect()
}

/// Load all entity prototypes under `dir`.
pub fn load_entities(dir: &Path) -> Vec<EntityPrototype> {
    load_typed(dir, PrototypeKind::Entity, EntityPrototype::from_value)
}

/// Load all tile prototypes under `dir`.
pub fn load_tiles(dir: &Path) -> Vec<TilePrototype> {
    load_typed(dir, PrototypeKind::Tile, TilePrototype::from_value)
}

/// Load all decal prototypes under `dir`.
pub fn load_decals(dir: &Path) -> Vec<DecalPrototype> {
    load_typed(dir, PrototypeKind::Decal, DecalPrototype::from_value)
}

/// Load all palette prototypes under `dir`.
pub fn load_palettes(dir: &Path) -> Vec<Palette> {
    load_typed(dir, PrototypeKind::Palette, Palette::from_value)
}
