//! Final byte encoding of a composited canvas.

use std::io::Cursor;

use anyhow::Context;
use image::{ExtendedColorType, ImageEncoder};
use serde::{Deserialize, Serialize};

use crate::foundation::error::{CardError, CardResult};
use crate::render::raster::{Channels, RasterBuffer};

/// Container format of an [`EncodedImage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossless PNG.
    Png,
    /// WebP, lossy below quality 100.
    Webp,
}

impl OutputFormat {
    /// MIME type for responses.
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Webp => "image/webp",
        }
    }

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }
}

/// Encoded card bytes plus their format.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedImage {
    /// Container format.
    pub format: OutputFormat,
    /// Encoded bytes.
    pub bytes: Vec<u8>,
}

impl EncodedImage {
    /// MIME type of [`EncodedImage::bytes`].
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }
}

/// Encode `buffer` with its own channel depth.
///
/// `quality` only affects WebP: below 100 the colour channels are quantised before the lossless
/// encoder runs, which keeps the output pure Rust while trading detail for size.
#[tracing::instrument(level = "debug", skip(buffer), fields(w = buffer.width, h = buffer.height))]
pub fn encode(
    buffer: &RasterBuffer,
    format: OutputFormat,
    quality: u8,
) -> CardResult<EncodedImage> {
    if buffer.width == 0 || buffer.height == 0 {
        return Err(CardError::render("cannot encode an empty buffer"));
    }
    let (mut pixels, color) = match buffer.channels {
        Channels::Rgb => (buffer.to_rgb8(), ExtendedColorType::Rgb8),
        Channels::Rgba => (buffer.to_straight_rgba8(), ExtendedColorType::Rgba8),
    };

    let mut bytes = Vec::new();
    match format {
        OutputFormat::Png => {
            let encoder = image::codecs::png::PngEncoder::new(Cursor::new(&mut bytes));
            encoder
                .write_image(&pixels, buffer.width, buffer.height, color)
                .context("encode png")?;
        }
        OutputFormat::Webp => {
            let quality = quality.clamp(1, 100);
            if quality < 100 {
                quantize_colour(&mut pixels, usize::from(buffer.channels.count()), quality);
            }
            let encoder =
                image::codecs::webp::WebPEncoder::new_lossless(Cursor::new(&mut bytes));
            encoder
                .encode(&pixels, buffer.width, buffer.height, color)
                .context("encode webp")?;
        }
    }
    Ok(EncodedImage { format, bytes })
}

/// Snap the colour channels of each `stride`-byte pixel to a palette sized by `quality`.
/// Alpha, when present, is left alone.
fn quantize_colour(data: &mut [u8], stride: usize, quality: u8) {
    let levels = levels_for_quality(quality);
    let step = 255.0 / (f32::from(levels) - 1.0);
    for px in data.chunks_exact_mut(stride) {
        for c in px.iter_mut().take(3) {
            let bucket = (f32::from(*c) / step).round();
            *c = (bucket * step).round().clamp(0.0, 255.0) as u8;
        }
    }
}

fn levels_for_quality(quality: u8) -> u16 {
    if quality >= 100 {
        return 256;
    }
    let q = f32::from(quality).clamp(1.0, 100.0) / 100.0;
    (2.0 + q * q * 254.0).round().clamp(2.0, 256.0) as u16
}

#[cfg(test)]
#[path = "../../tests/unit/render/encode.rs"]
mod tests;
