//! Raster work for every stage.
//!
//! Sheets are loaded as RGBA, entity sprites are composited from their RSI
//! layers, and decals are tinted per palette colour.

pub mod compose;
mod entity;
mod png;
mod recolor;
mod sprites;

pub use entity::{direction_key, sprite_layers, Direction, EntityRenderer, SpriteLayer};
pub use png::{load_rgba, write_png};
pub use recolor::recolor;
pub use sprites::SpriteStore;
