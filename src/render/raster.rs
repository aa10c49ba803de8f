use crate::foundation::core::{Rgba8Premul, Size};
use crate::foundation::error::{CardError, CardResult};

/// Channel depth a buffer is emitted with.
///
/// Pixels are always held as premultiplied RGBA8 in memory; `Rgb` marks an opaque buffer whose
/// alpha is dropped at encode time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channels {
    /// Three channels, no alpha.
    Rgb,
    /// Four channels with alpha.
    Rgba,
}

impl Channels {
    /// Number of channels in the encoded output.
    pub fn count(self) -> u8 {
        match self {
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }
}

/// Owned 2-D pixel buffer in premultiplied RGBA8, row-major, tightly packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterBuffer {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Depth the buffer is emitted with.
    pub channels: Channels,
    /// Premultiplied RGBA8 bytes, `width * height * 4` long.
    pub data: Vec<u8>,
}

impl RasterBuffer {
    /// Allocate a buffer filled with `fill`.
    pub fn filled(width: u32, height: u32, channels: Channels, fill: Rgba8Premul) -> Self {
        let px = fill.to_array();
        Self {
            width,
            height,
            channels,
            data: px.repeat(pixel_count(width, height)),
        }
    }

    /// Wrap existing premultiplied RGBA8 bytes, checking their length.
    pub fn from_premul_rgba8(width: u32, height: u32, data: Vec<u8>) -> CardResult<Self> {
        if data.len() != pixel_count(width, height) * 4 {
            return Err(CardError::render(format!(
                "raster byte len {} does not match {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channels: Channels::Rgba,
            data,
        })
    }

    /// Wrap straight-alpha RGBA8 bytes, premultiplying them in place.
    pub fn from_straight_rgba8(width: u32, height: u32, mut data: Vec<u8>) -> CardResult<Self> {
        premultiply_rgba8_in_place(&mut data);
        Self::from_premul_rgba8(width, height, data)
    }

    /// Buffer dimensions.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Read one premultiplied pixel; `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Some([
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ])
    }

    /// Convert to straight-alpha RGBA8 bytes for encoders.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        unpremultiply_rgba8_in_place(&mut out);
        out
    }

    /// Convert to RGB8, dropping alpha. Callers flatten onto an opaque background first.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(pixel_count(self.width, self.height) * 3);
        for px in self.data.chunks_exact(4) {
            out.extend_from_slice(&px[..3]);
        }
        out
    }

    /// Take the pixels out of a rendered `vello_cpu` pixmap.
    pub(crate) fn from_pixmap(pixmap: &vello_cpu::Pixmap) -> CardResult<Self> {
        Self::from_premul_rgba8(
            u32::from(pixmap.width()),
            u32::from(pixmap.height()),
            pixmap.data_as_u8_slice().to_vec(),
        )
    }
}

fn pixel_count(width: u32, height: u32) -> usize {
    (width as usize).saturating_mul(height as usize)
}

/// Pixmap dimensions are `u16` in `vello_cpu`.
pub(crate) fn pixmap_dims(width: u32, height: u32) -> CardResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| CardError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| CardError::render("pixmap height exceeds u16"))?;
    Ok((w, h))
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
