//! Tileset bookkeeping: the JSON id/image cache and the Tiled `.tsx` files
//! generated from it.

mod cache;
mod tsx;

pub use cache::{AtlasCache, ImageRecord};
pub use tsx::{render_tsx, write_tsx};
