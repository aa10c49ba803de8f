use std::sync::Arc;

use anyhow::Context;

use crate::foundation::core::Size;
use crate::foundation::error::{CardError, CardResult};
use crate::render::raster::RasterBuffer;

/// Decode encoded image bytes (PNG, JPEG, WebP, ...) into straight RGBA8.
pub fn decode_image(bytes: &[u8]) -> CardResult<image::RgbaImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    Ok(dyn_img.to_rgba8())
}

/// Resize with "cover" semantics: scale to fill `size`, then crop the overflow around the centre.
pub fn cover_resize(img: &image::RgbaImage, size: Size) -> CardResult<RasterBuffer> {
    if size.is_empty() {
        return Err(CardError::render("cover target size must be non-zero"));
    }
    let filled = image::DynamicImage::ImageRgba8(img.clone()).resize_to_fill(
        size.width,
        size.height,
        image::imageops::FilterType::Lanczos3,
    );
    let rgba = filled.to_rgba8();
    let (width, height) = rgba.dimensions();
    RasterBuffer::from_straight_rgba8(width, height, rgba.into_raw())
}

/// Scale to `width`, keeping the aspect ratio. Height rounds to the nearest pixel, minimum 1.
pub fn fit_width(img: &image::RgbaImage, width: u32) -> CardResult<RasterBuffer> {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 || width == 0 {
        return Err(CardError::render("cannot scale an empty image"));
    }
    let height = scaled_height(w, h, width);
    let resized =
        image::imageops::resize(img, width, height, image::imageops::FilterType::Lanczos3);
    RasterBuffer::from_straight_rgba8(width, height, resized.into_raw())
}

pub(crate) fn scaled_height(src_w: u32, src_h: u32, dst_w: u32) -> u32 {
    ((f64::from(src_h) * f64::from(dst_w) / f64::from(src_w)).round() as u32).max(1)
}

/// Parse SVG bytes into a `usvg` tree.
pub fn parse_svg(bytes: &[u8]) -> CardResult<Arc<usvg::Tree>> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
    Ok(Arc::new(tree))
}

/// Rasterize an SVG at `width`, keeping its intrinsic aspect ratio.
pub fn rasterize_svg_to_width(tree: &usvg::Tree, width: u32) -> CardResult<RasterBuffer> {
    let size = tree.size();
    if !size.width().is_finite() || size.width() <= 0.0 || size.height() <= 0.0 {
        return Err(CardError::render("svg has invalid width/height"));
    }
    let height = ((size.height() * width as f32 / size.width()).round() as u32).max(1);

    // Avoid pathological allocations from a hostile viewBox.
    const MAX_DIM: u32 = 16_384;
    if width > MAX_DIM || height > MAX_DIM {
        return Err(CardError::render(format!(
            "svg raster size too large: {width}x{height} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| CardError::render("failed to allocate svg pixmap"))?;
    let sx = (width as f32) / size.width();
    let sy = (height as f32) / size.height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);
    resvg::render(tree, xform, &mut pixmap.as_mut());

    // tiny-skia pixmaps are already premultiplied.
    RasterBuffer::from_premul_rgba8(width, height, pixmap.data().to_vec())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
