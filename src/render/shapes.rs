use kurbo::Shape as _;
use serde::{Deserialize, Serialize};

use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{CardError, CardResult};
use crate::render::raster::{RasterBuffer, pixmap_dims};

/// Per-corner radii in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CornerRadii {
    /// Top-left.
    pub tl: f64,
    /// Top-right.
    pub tr: f64,
    /// Bottom-right.
    pub br: f64,
    /// Bottom-left.
    pub bl: f64,
}

impl CornerRadii {
    /// Same radius on every corner.
    pub const fn uniform(r: f64) -> Self {
        Self {
            tl: r,
            tr: r,
            br: r,
            bl: r,
        }
    }

    /// Shrink every corner by `by`, flooring each at zero.
    pub fn inset(self, by: f64) -> Self {
        let f = |r: f64| (r - by).max(0.0);
        Self {
            tl: f(self.tl),
            tr: f(self.tr),
            br: f(self.br),
            bl: f(self.bl),
        }
    }

    /// Return `true` when every corner is square.
    pub fn is_square(self) -> bool {
        self.tl <= 0.0 && self.tr <= 0.0 && self.br <= 0.0 && self.bl <= 0.0
    }
}

/// Rounded rectangle filled with `color`, transparent outside the corners.
///
/// Doubles as a `DestIn` mask: its alpha is the rounded shape.
pub fn rounded_rect(
    width: u32,
    height: u32,
    radii: CornerRadii,
    color: Rgba8Premul,
) -> CardResult<RasterBuffer> {
    if width == 0 || height == 0 {
        return Err(CardError::render("rounded rect must be non-empty"));
    }
    if radii.is_square() {
        return Ok(RasterBuffer::filled(
            width,
            height,
            crate::render::raster::Channels::Rgba,
            color,
        ));
    }

    let (w16, h16) = pixmap_dims(width, height)?;
    let mut ctx = vello_cpu::RenderContext::new(w16, h16);
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    // Paint colours are straight alpha; the pixmap comes back premultiplied.
    let [r, g, b, a] = unpremul(color);
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));

    let rr = kurbo::RoundedRect::new(
        0.0,
        0.0,
        f64::from(width),
        f64::from(height),
        kurbo::RoundedRectRadii::new(radii.tl, radii.tr, radii.br, radii.bl),
    );
    let mut p = vello_cpu::kurbo::BezPath::new();
    for el in rr.path_elements(0.1) {
        p.push(el);
    }
    ctx.fill_path(&p);

    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
    ctx.render_to_pixmap(&mut pixmap);
    RasterBuffer::from_pixmap(&pixmap)
}

/// Solid `color` at `opacity` over the whole rectangle.
///
/// Used as a `DestIn` mask it scales the destination's alpha uniformly by `opacity`.
pub fn color_overlay(
    width: u32,
    height: u32,
    color: Rgba8Premul,
    opacity: f32,
) -> CardResult<RasterBuffer> {
    if width == 0 || height == 0 {
        return Err(CardError::render("overlay must be non-empty"));
    }
    Ok(RasterBuffer::filled(
        width,
        height,
        crate::render::raster::Channels::Rgba,
        color.with_opacity(opacity),
    ))
}

fn unpremul(c: Rgba8Premul) -> [u8; 4] {
    let mut px = c.to_array();
    crate::render::raster::unpremultiply_rgba8_in_place(&mut px);
    px
}

#[cfg(test)]
#[path = "../../tests/unit/render/shapes.rs"]
mod tests;
