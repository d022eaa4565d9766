//! Core value types shared across the pipeline:
//! - `Colour` - RGBA colour values parsed from hex literals
//! - `Palette` - Named colour collections used for decal variants

mod colour;
mod palette;

pub use colour::Colour;
pub use palette::Palette;
