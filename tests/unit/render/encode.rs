use super::*;
use crate::foundation::core::Rgba8Premul;

fn gradient(channels: Channels) -> RasterBuffer {
    let mut data = Vec::new();
    for y in 0..8u8 {
        for x in 0..8u8 {
            data.extend_from_slice(&[x * 30, y * 30, 77, 255]);
        }
    }
    let mut buf = RasterBuffer::from_premul_rgba8(8, 8, data).unwrap();
    buf.channels = channels;
    buf
}

#[test]
fn png_rgba_roundtrips_alpha() {
    let buf = RasterBuffer::filled(3, 2, Channels::Rgba, Rgba8Premul::transparent());
    let out = encode(&buf, OutputFormat::Png, 100).unwrap();
    assert_eq!(out.content_type(), "image/png");
    let decoded = image::load_from_memory(&out.bytes).unwrap();
    assert_eq!(decoded.color(), image::ColorType::Rgba8);
    assert_eq!(decoded.to_rgba8().get_pixel(0, 0).0[3], 0);
}

#[test]
fn rgb_buffers_encode_without_alpha() {
    let out = encode(&gradient(Channels::Rgb), OutputFormat::Png, 100).unwrap();
    let decoded = image::load_from_memory(&out.bytes).unwrap();
    assert_eq!(decoded.color(), image::ColorType::Rgb8);
    assert_eq!(decoded.to_rgb8().get_pixel(2, 1).0, [60, 30, 77]);
}

#[test]
fn webp_quality_100_is_lossless() {
    let buf = gradient(Channels::Rgb);
    let out = encode(&buf, OutputFormat::Webp, 100).unwrap();
    assert_eq!(out.content_type(), "image/webp");
    let decoded = image::load_from_memory(&out.bytes).unwrap().to_rgb8();
    assert_eq!(decoded.as_raw(), &buf.to_rgb8());
}

#[test]
fn webp_low_quality_quantises_colour() {
    let buf = gradient(Channels::Rgb);
    let out = encode(&buf, OutputFormat::Webp, 20).unwrap();
    let decoded = image::load_from_memory(&out.bytes).unwrap().to_rgb8();
    assert_ne!(decoded.as_raw(), &buf.to_rgb8());
}

#[test]
fn quantize_leaves_alpha() {
    let mut px = [13, 200, 91, 17];
    quantize_colour(&mut px, 4, 1);
    assert_eq!(px[3], 17);
    assert!(px[..3].iter().all(|c| *c == 0 || *c == 255));
}

#[test]
fn levels_scale_with_quality() {
    assert_eq!(levels_for_quality(100), 256);
    assert_eq!(levels_for_quality(1), 2);
    assert!(levels_for_quality(50) < levels_for_quality(90));
}
