//! PNG input and output.
//!
//! Sheets are always decoded to 8-bit RGBA, whatever their on-disk colour
//! type, and written back without colour profile chunks.

use std::path::Path;

use image::RgbaImage;

use crate::error::{Result, TiledError};

/// Decode a PNG (or any supported image) into RGBA.
pub fn load_rgba(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path).map_err(|e| TiledError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to read image: {}", e),
    })?;
    Ok(img.to_rgba8())
}

/// Write an RGBA image as PNG.
pub fn write_png(img: &RgbaImage, path: &Path) -> Result<()> {
    img.save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| TiledError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to write PNG: {}", e),
        })
}
