//! Field-to-raster renderers and PNG import/export.

use std::path::Path;

use relief_grid::{DistanceField, GridMask, HeightField, INFINITE_DISTANCE};

use super::image::FieldImage;

/// Errors from PNG import/export.
#[derive(Debug, thiserror::Error)]
pub enum VizError {
    /// The raster's pixel buffer does not match its declared dimensions.
    #[error("raster buffer does not match {width}x{height}")]
    BadDimensions {
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
    },
    /// PNG encode/decode failure.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Map a distance value to an RGB color.
///
/// Protected cells (distance 0) render white, unreachable cells black, and
/// everything between sweeps blue (near) to red (far), scaled by the field's
/// maximum finite distance.
pub fn distance_to_color(distance: i32, max_finite: i32) -> (u8, u8, u8) {
    if distance == 0 {
        return (255, 255, 255);
    }
    if distance == INFINITE_DISTANCE {
        return (0, 0, 0);
    }
    let t = if max_finite > 0 {
        (distance as f32 / max_finite as f32).clamp(0.0, 1.0)
    } else {
        0.0
    };
    ((t * 255.0) as u8, 40, ((1.0 - t) * 255.0) as u8)
}

/// Map a normalized height `[0, 1]` to a grayscale RGB color.
pub fn height_to_color(normalized: f32) -> (u8, u8, u8) {
    let v = (normalized.clamp(0.0, 1.0) * 255.0) as u8;
    (v, v, v)
}

/// Render a distance field to a color-coded raster.
pub fn render_distance_field(field: &DistanceField) -> FieldImage {
    let mut image = FieldImage::new(field.width() as u32, field.height() as u32);
    let max_finite = field.max_finite().unwrap_or(0);
    for y in 0..field.height() {
        for x in 0..field.width() {
            let (r, g, b) = distance_to_color(field.at(x, y), max_finite);
            image.set_pixel(x as u32, y as u32, r, g, b);
        }
    }
    image
}

/// Render a height field to a grayscale raster, normalized by the field's
/// own min/max. A perfectly flat field renders mid-gray.
pub fn render_height_field(field: &HeightField) -> FieldImage {
    let mut lo = f32::MAX;
    let mut hi = f32::MIN;
    for &h in field.data() {
        lo = lo.min(h);
        hi = hi.max(h);
    }
    let range = hi - lo;

    let mut image = FieldImage::new(field.width() as u32, field.height() as u32);
    for y in 0..field.height() {
        for x in 0..field.width() {
            let normalized = if range > 0.0 {
                (field.at(x, y) - lo) / range
            } else {
                0.5
            };
            let (r, g, b) = height_to_color(normalized);
            image.set_pixel(x as u32, y as u32, r, g, b);
        }
    }
    image
}

/// Write a raster as a PNG file.
pub fn save_png(image: &FieldImage, path: &Path) -> Result<(), VizError> {
    let buffer = image::RgbaImage::from_raw(image.width, image.height, image.pixels.clone())
        .ok_or(VizError::BadDimensions {
            width: image.width,
            height: image.height,
        })?;
    buffer.save(path)?;
    log::info!("wrote {path:?}");
    Ok(())
}

/// Load a protection mask from a PNG: pixels darker than mid-gray are
/// protected, everything else is free.
pub fn load_mask_png(path: &Path) -> Result<GridMask, VizError> {
    let luma = image::open(path)?.to_luma8();
    let (width, height) = luma.dimensions();
    let mask = GridMask::from_fn(width as usize, height as usize, |x, y| {
        luma.get_pixel(x as u32, y as u32).0[0] >= 128
    });
    log::info!(
        "loaded mask {path:?}: {}x{}, {} protected cells",
        width,
        height,
        mask.protected_count()
    );
    Ok(mask)
}
