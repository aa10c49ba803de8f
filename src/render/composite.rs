use serde::{Deserialize, Serialize};

use crate::foundation::core::{PixelRect, Rgba8Premul, Size};
use crate::foundation::error::{CardError, CardResult};
use crate::foundation::math::{add_sat_u8, mul_div255_u8};
use crate::render::raster::{Channels, RasterBuffer};

/// One premultiplied RGBA8 pixel as stored in [`RasterBuffer::data`].
pub type PremulRgba8 = [u8; 4];

/// How a layer combines with what is already on the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    /// Premultiplied source-over.
    #[default]
    Over,
    /// Porter-Duff destination-in: keep the destination only where the source has alpha.
    DestIn,
}

/// A buffer placed at an offset on its parent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PositionedLayer {
    /// Pixels to paint.
    pub buffer: RasterBuffer,
    /// Left edge on the parent.
    pub x: i32,
    /// Top edge on the parent.
    pub y: i32,
    /// Blend rule.
    pub blend: BlendMode,
}

impl PositionedLayer {
    /// `Over` layer at `(x, y)`.
    pub fn over(buffer: RasterBuffer, x: i32, y: i32) -> Self {
        Self {
            buffer,
            x,
            y,
            blend: BlendMode::Over,
        }
    }

    /// `DestIn` mask at `(x, y)`.
    pub fn dest_in(buffer: RasterBuffer, x: i32, y: i32) -> Self {
        Self {
            buffer,
            x,
            y,
            blend: BlendMode::DestIn,
        }
    }

    /// Target rectangle on the parent.
    pub fn rect(&self) -> PixelRect {
        PixelRect::new(self.x, self.y, self.buffer.width, self.buffer.height)
    }
}

/// Canvas a composite starts from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSpec {
    /// Canvas size.
    pub size: Size,
    /// Emitted channel depth. `Rgb` canvases are flattened onto `background` after painting.
    pub channels: Channels,
    /// Initial fill.
    pub background: Rgba8Premul,
}

impl CanvasSpec {
    /// Transparent RGBA canvas, the default for sub-composites.
    pub fn transparent(size: Size) -> Self {
        Self {
            size,
            channels: Channels::Rgba,
            background: Rgba8Premul::transparent(),
        }
    }
}

/// Paint `layers` in order onto a fresh canvas.
///
/// Layers are clipped at the canvas edges. A `DestIn` layer multiplies every canvas pixel by the
/// layer's alpha at that point and clears pixels it does not cover.
pub fn composite(canvas: CanvasSpec, layers: &[PositionedLayer]) -> CardResult<RasterBuffer> {
    if canvas.size.is_empty() {
        return Err(CardError::render("canvas must be non-empty"));
    }
    let mut out = RasterBuffer::filled(
        canvas.size.width,
        canvas.size.height,
        Channels::Rgba,
        canvas.background,
    );
    for layer in layers {
        match layer.blend {
            BlendMode::Over => over_layer_in_place(&mut out, layer),
            BlendMode::DestIn => dest_in_layer_in_place(&mut out, layer),
        }
    }
    if canvas.channels == Channels::Rgb {
        flatten_in_place(&mut out, canvas.background);
        out.channels = Channels::Rgb;
    }
    Ok(out)
}

pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    let sa = src[3];
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }
    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255_u8(u16::from(dst[3]), inv));
    for i in 0..3 {
        out[i] = add_sat_u8(src[i], mul_div255_u8(u16::from(dst[i]), inv));
    }
    out
}

pub fn dest_in(dst: PremulRgba8, mask_alpha: u8) -> PremulRgba8 {
    let w16 = u16::from(mask_alpha);
    [
        mul_div255_u8(u16::from(dst[0]), w16),
        mul_div255_u8(u16::from(dst[1]), w16),
        mul_div255_u8(u16::from(dst[2]), w16),
        mul_div255_u8(u16::from(dst[3]), w16),
    ]
}

/// Overlap of `layer` with a `w × h` canvas, as `(dst_x0, dst_y0, src_x0, src_y0, cols, rows)`.
fn clip(layer: &PixelRect, w: u32, h: u32) -> Option<(usize, usize, usize, usize, usize, usize)> {
    let x0 = i64::from(layer.x).max(0);
    let y0 = i64::from(layer.y).max(0);
    let x1 = layer.right().min(i64::from(w));
    let y1 = layer.bottom().min(i64::from(h));
    if x0 >= x1 || y0 >= y1 {
        return None;
    }
    Some((
        x0 as usize,
        y0 as usize,
        (x0 - i64::from(layer.x)) as usize,
        (y0 - i64::from(layer.y)) as usize,
        (x1 - x0) as usize,
        (y1 - y0) as usize,
    ))
}

fn over_layer_in_place(dst: &mut RasterBuffer, layer: &PositionedLayer) {
    let Some((dx0, dy0, sx0, sy0, cols, rows)) = clip(&layer.rect(), dst.width, dst.height)
    else {
        return;
    };
    let dst_w = dst.width as usize;
    let src_w = layer.buffer.width as usize;
    for row in 0..rows {
        let d_start = ((dy0 + row) * dst_w + dx0) * 4;
        let s_start = ((sy0 + row) * src_w + sx0) * 4;
        let d_row = &mut dst.data[d_start..d_start + cols * 4];
        let s_row = &layer.buffer.data[s_start..s_start + cols * 4];
        for (d, s) in d_row.chunks_exact_mut(4).zip(s_row.chunks_exact(4)) {
            let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
            d.copy_from_slice(&out);
        }
    }
}

fn dest_in_layer_in_place(dst: &mut RasterBuffer, layer: &PositionedLayer) {
    let (w, h) = (dst.width as usize, dst.height as usize);
    let rect = layer.rect();
    let src_w = layer.buffer.width as usize;
    for y in 0..h {
        for x in 0..w {
            let idx = (y * w + x) * 4;
            let lx = x as i64 - i64::from(rect.x);
            let ly = y as i64 - i64::from(rect.y);
            let inside = lx >= 0
                && ly >= 0
                && lx < i64::from(rect.width)
                && ly < i64::from(rect.height);
            let mask_a = if inside {
                layer.buffer.data[((ly as usize) * src_w + lx as usize) * 4 + 3]
            } else {
                0
            };
            let d = [
                dst.data[idx],
                dst.data[idx + 1],
                dst.data[idx + 2],
                dst.data[idx + 3],
            ];
            dst.data[idx..idx + 4].copy_from_slice(&dest_in(d, mask_a));
        }
    }
}

/// Composite every pixel over an opaque background so alpha becomes 255 everywhere.
fn flatten_in_place(buf: &mut RasterBuffer, background: Rgba8Premul) {
    let bg = Rgba8Premul {
        a: 255,
        ..background
    }
    .to_array();
    for px in buf.data.chunks_exact_mut(4) {
        let out = over(bg, [px[0], px[1], px[2], px[3]]);
        px.copy_from_slice(&out);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
