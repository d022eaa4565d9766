//! ss14-tiled - Tiled tileset generator for Space Station 14
//!
//! Reads the prototype and texture trees of a game repository and writes
//! Tiled tilesets for decals (untinted and per palette colour), entities
//! (grouped by kind, one image per facing direction) and floor tiles.
//! Each tileset is backed by an append-only id cache, so tile ids stay
//! stable across runs and existing maps keep working.

pub mod atlas;
pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod prototype;
pub mod render;
pub mod rsi;
pub mod types;

pub use atlas::{AtlasCache, ImageRecord};
pub use classify::{classify, group_entities, Group};
pub use config::{Config, CONFIG_FILENAME};
pub use error::{Result, TiledError};
pub use pipeline::{generate, generate_with, GenerateOptions, GenerateReport, StageReport};
pub use prototype::{resolve_entities, EntityPrototype, ResolvedEntity};
pub use render::{Direction, EntityRenderer, SpriteStore};
pub use rsi::{RsiMeta, StateRef};
pub use types::{Colour, Palette};
