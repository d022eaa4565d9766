use image::RgbaImage;

use crate::types::Colour;

/// Tint an image by scaling every channel, alpha included, by `colour / 255`.
pub fn recolor(img: &RgbaImage, colour: Colour) -> RgbaImage {
    if colour == Colour::WHITE {
        return img.clone();
    }
    let factors = colour.scale_factors();
    let mut out = img.clone();
    for pixel in out.pixels_mut() {
        for (channel, factor) in pixel.0.iter_mut().zip(factors) {
            *channel = (f32::from(*channel) * factor).round() as u8;
        }
    }
    out
}
