//! Floor tiles: the first variant of each tile sheet.

use image::imageops;
use rayon::prelude::*;
use rayon::ThreadPool;

use crate::error::{Result, TiledError};
use crate::prototype::{load_tiles, TilePrototype};
use crate::render::{load_rgba, write_png};

use super::stage::{Produced, Stage};
use super::Layout;

pub const STAGE: &str = "tiles";

pub fn run(layout: &Layout, pool: &ThreadPool) -> Result<super::StageReport> {
    let stage = Stage::new(STAGE, "Tiles");
    let cache = stage.open(layout)?;

    let tiles: Vec<TilePrototype> = load_tiles(&layout.prototypes.join("Tiles"))
        .into_iter()
        .filter(|t| t.sprite.is_some())
        .collect();
    tracing::info!(count = tiles.len(), "rendering tiles");

    let results: Vec<Result<Produced>> =
        pool.install(|| tiles.par_iter().map(|tile| crop_tile(layout, tile)).collect());

    let mut produced = Vec::with_capacity(results.len());
    let mut skipped = 0;
    for (tile, result) in tiles.iter().zip(results) {
        match result {
            Ok(item) => produced.push(item),
            Err(e) => {
                tracing::warn!(tile = %tile.id, "skipping tile: {}", e);
                skipped += 1;
            }
        }
    }
    produced.sort_by(|a, b| a.id.cmp(&b.id));

    stage.commit(layout, cache, produced, skipped)
}

fn crop_tile(layout: &Layout, tile: &TilePrototype) -> Result<Produced> {
    let sprite = tile
        .sprite
        .as_deref()
        .ok_or_else(|| TiledError::build(format!("tile '{}' has no sprite", tile.id)))?;
    let sheet = load_rgba(&layout.resources.join(sprite.trim_start_matches('/')))?;

    let width = tile.variant_width(sheet.width());
    if width == 0 {
        return Err(TiledError::build(format!(
            "sheet is {}px wide, too narrow for {} variants",
            sheet.width(),
            tile.variants
        )));
    }
    let img = imageops::crop_imm(&sheet, 0, 0, width, sheet.height()).to_image();

    let file = format!("{}.png", tile.id);
    write_png(&img, &layout.image_dir(STAGE).join(&file))?;
    tracing::debug!(tile = %tile.id, width, height = img.height(), "tile written");

    Ok(Produced {
        id: tile.id.clone(),
        file,
        width,
        height: img.height(),
    })
}
