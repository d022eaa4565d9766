//! Raster operations for sprite compositing: frame cropping, centred
//! padding, alpha-over blending and quarter-turn rotation.

use image::{imageops, Rgba, RgbaImage};

use crate::error::{Result, TiledError};
use crate::rsi::RsiMeta;

use super::Direction;

/// Cut frame `index` out of a sheet laid out by `meta`.
pub fn crop_frame(sheet: &RgbaImage, meta: &RsiMeta, index: u32) -> Result<RgbaImage> {
    let (w, h) = (meta.size.x, meta.size.y);
    let (x, y) = meta.frame_origin(index, sheet.width()).ok_or_else(|| {
        TiledError::build(format!(
            "frame {} of {}x{} does not fit a sheet {}px wide",
            index,
            w,
            h,
            sheet.width()
        ))
    })?;

    let fits = |origin: u32, extent: u32, limit: u32| {
        origin.checked_add(extent).is_some_and(|end| end <= limit)
    };
    if h == 0 || !fits(x, w, sheet.width()) || !fits(y, h, sheet.height()) {
        return Err(TiledError::build(format!(
            "frame {} at ({}, {}) lies outside the {}x{} sheet",
            index,
            x,
            y,
            sheet.width(),
            sheet.height()
        )));
    }

    Ok(imageops::crop_imm(sheet, x, y, w, h).to_image())
}

/// Centre `img` on a transparent canvas of `width` x `height`.
///
/// Odd leftover padding goes to the right and bottom.
pub fn pad_centered(img: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if img.dimensions() == (width, height) {
        return img.clone();
    }
    let left = width.saturating_sub(img.width()) / 2;
    let top = height.saturating_sub(img.height()) / 2;

    let mut canvas = RgbaImage::new(width, height);
    imageops::replace(&mut canvas, img, i64::from(left), i64::from(top));
    canvas
}

/// Straight-alpha "over": `top` drawn onto `bottom`.
pub fn over(bottom: Rgba<u8>, top: Rgba<u8>) -> Rgba<u8> {
    let ta = f32::from(top[3]) / 255.0;
    let ba = f32::from(bottom[3]) / 255.0;
    let out_a = ta + ba * (1.0 - ta);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |i: usize| {
        let v = (f32::from(top[i]) * ta + f32::from(bottom[i]) * ba * (1.0 - ta)) / out_a;
        v.round().clamp(0.0, 255.0) as u8
    };
    Rgba([
        channel(0),
        channel(1),
        channel(2),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}

/// Blend `top` over `bottom`, first centring both on a canvas large enough
/// for either.
pub fn blend_over(bottom: &RgbaImage, top: &RgbaImage) -> RgbaImage {
    let width = bottom.width().max(top.width());
    let height = bottom.height().max(top.height());

    let mut out = pad_centered(bottom, width, height);
    let top = pad_centered(top, width, height);
    for (dst, src) in out.pixels_mut().zip(top.pixels()) {
        *dst = over(*dst, *src);
    }
    out
}

/// Stack layers back to front. `None` if there were no layers.
pub fn composite<I>(layers: I) -> Option<RgbaImage>
where
    I: IntoIterator<Item = RgbaImage>,
{
    layers.into_iter().fold(None, |acc, layer| match acc {
        None => Some(layer),
        Some(base) => Some(blend_over(&base, &layer)),
    })
}

/// Derive a facing from the south-facing sprite of a diagonal entity.
pub fn rotate_from_south(south: &RgbaImage, direction: Direction) -> RgbaImage {
    match direction {
        Direction::North => imageops::rotate180(south),
        Direction::East => imageops::rotate270(south),
        Direction::West => imageops::rotate90(south),
        _ => south.clone(),
    }
}
