//! Decals, once untinted and once per palette colour.

use image::RgbaImage;
use rayon::prelude::*;
use rayon::ThreadPool;

use crate::error::Result;
use crate::prototype::{load_decals, load_palettes, DecalPrototype};
use crate::render::{load_rgba, recolor, write_png};
use crate::types::{Colour, Palette};

use super::stage::{Produced, Stage, StageReport};
use super::Layout;

pub const STAGE: &str = "decals";

/// One tinted copy of the decal set.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    /// `<palette>_<colour>`, empty for the untinted set.
    pub name: String,
    pub hex: String,
    pub colour: Colour,
}

impl Variant {
    fn identity() -> Self {
        Self {
            name: String::new(),
            hex: "#FFFFFF".to_string(),
            colour: Colour::WHITE,
        }
    }

    fn stage(&self) -> Stage {
        let (name, title) = if self.name.is_empty() {
            (STAGE.to_string(), "Decals".to_string())
        } else {
            (format!("{}_{}", STAGE, self.name), format!("Decals - {}", self.name))
        };
        Stage::new(name, title)
            .with_property("color_name", self.name.clone())
            .with_property("color_value", self.hex.clone())
    }
}

/// The identity variant followed by every parsable palette colour.
pub fn decal_variants(palettes: &[Palette]) -> Vec<Variant> {
    let mut out = vec![Variant::identity()];
    for palette in palettes {
        for (name, hex) in palette.variants() {
            match Colour::from_hex(hex) {
                Ok(colour) => out.push(Variant {
                    name,
                    hex: hex.to_string(),
                    colour,
                }),
                Err(e) => tracing::warn!(variant = %name, "skipping colour: {}", e),
            }
        }
    }
    out
}

pub fn run(layout: &Layout, pool: &ThreadPool) -> Result<Vec<StageReport>> {
    let decals = load_decals(&layout.prototypes.join("Decals"));
    let palettes = load_palettes(&layout.prototypes.join("Palettes"));
    let variants = decal_variants(&palettes);
    tracing::info!(decals = decals.len(), variants = variants.len(), "rendering decals");

    // Each source is decoded once and held until the last variant is
    // written. Memory grows with the decal count, not the variant count.
    let sources: Vec<Option<RgbaImage>> = pool.install(|| {
        decals
            .par_iter()
            .map(|decal| match load_rgba(&source_path(layout, decal)) {
                Ok(img) => Some(img),
                Err(e) => {
                    tracing::warn!(decal = %decal.id, "skipping decal: {}", e);
                    None
                }
            })
            .collect()
    });
    let loaded: Vec<(&DecalPrototype, &RgbaImage)> = decals
        .iter()
        .zip(&sources)
        .filter_map(|(decal, img)| img.as_ref().map(|img| (decal, img)))
        .collect();
    let unreadable = decals.len() - loaded.len();

    variants
        .iter()
        .map(|variant| render_variant(layout, pool, variant, &loaded, unreadable))
        .collect()
}

fn render_variant(
    layout: &Layout,
    pool: &ThreadPool,
    variant: &Variant,
    decals: &[(&DecalPrototype, &RgbaImage)],
    unreadable: usize,
) -> Result<StageReport> {
    let stage = variant.stage();
    let cache = stage.open(layout)?;
    let dir = layout.image_dir(&stage.name);

    let results: Vec<Option<Produced>> = pool.install(|| {
        decals
            .par_iter()
            .map(|(decal, source)| {
                let img = recolor(source, variant.colour);
                let file = format!("{}.png", decal.id);
                match write_png(&img, &dir.join(&file)) {
                    Ok(()) => Some(Produced {
                        id: decal.id.clone(),
                        file,
                        width: img.width(),
                        height: img.height(),
                    }),
                    Err(e) => {
                        tracing::warn!(decal = %decal.id, "skipping decal: {}", e);
                        None
                    }
                }
            })
            .collect()
    });

    let failed = results.iter().filter(|r| r.is_none()).count();
    let mut produced: Vec<Produced> = results.into_iter().flatten().collect();
    produced.sort_by(|a, b| a.id.cmp(&b.id));

    stage.commit(layout, cache, produced, unreadable + failed)
}

/// `Resources/Textures/<rsi>/<state>.png`
fn source_path(layout: &Layout, decal: &DecalPrototype) -> std::path::PathBuf {
    let rsi = decal.rsi.strip_prefix("/Textures/").unwrap_or(&decal.rsi);
    layout
        .textures
        .join(rsi.trim_start_matches('/'))
        .join(format!("{}.png", decal.state))
}
