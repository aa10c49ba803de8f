use std::path::Path;

use anyhow::Context;

use crate::assets::decode::{decode_image, fit_width, parse_svg, rasterize_svg_to_width};
use crate::foundation::error::{CardError, CardResult};
use crate::render::raster::RasterBuffer;

/// Load the logo at `path` and scale it to `width`, keeping its aspect ratio.
///
/// `.svg` files are rasterized at the target width; anything else goes through the image decoder.
#[tracing::instrument(level = "debug")]
pub fn load_logo(path: &Path, width: u32) -> CardResult<RasterBuffer> {
    if width == 0 {
        return Err(CardError::config("logo width must be > 0"));
    }
    let bytes = std::fs::read(path).with_context(|| format!("read logo {}", path.display()))?;
    logo_from_bytes(&bytes, is_svg(path), width)
}

/// Like [`load_logo`] for bytes already in memory.
pub fn logo_from_bytes(bytes: &[u8], svg: bool, width: u32) -> CardResult<RasterBuffer> {
    if svg {
        let tree = parse_svg(bytes)?;
        rasterize_svg_to_width(&tree, width)
    } else {
        fit_width(&decode_image(bytes)?, width)
    }
}

fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/logo.rs"]
mod tests;
