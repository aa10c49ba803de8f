use super::*;
use crate::assets::fetch::StaticFetcher;
use crate::cache::store::NoCache;
use crate::render::badge::BadgeStyle;
use crate::render::raster::Channels;
use crate::render::shapes::CornerRadii;
use crate::render::text::BoxTextRenderer;

fn png(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut out = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}

fn small(variant: Variant) -> LayoutConstants {
    let base = LayoutConstants::for_variant(variant);
    LayoutConstants {
        canvas: Size::new(200, 300),
        padding: 10,
        poster_width: 60,
        poster_aspect: 0.5,
        poster_radius: CornerRadii::uniform(0.0),
        title_max_height: 40,
        title_gap: 5,
        credits_max_height: 20,
        credits_gap: 3,
        badge: base.badge.as_ref().map(|b| BadgeStyle {
            text_box: Size::new(20, 10),
            padding: 2,
            border_width: 1,
            radius: CornerRadii::uniform(0.0),
            ..b.clone()
        }),
        badge_top_margin: 2,
        badge_right_margin: 2,
        ..base
    }
}

fn builder() -> CardBuilder<StaticFetcher, BoxTextRenderer, NoCache> {
    CardBuilder::new(StaticFetcher::new(), BoxTextRenderer::default(), NoCache)
        .with_constants(Variant::Rated, small(Variant::Rated))
        .with_constants(Variant::Plain, small(Variant::Plain))
}

fn request(rating: Option<f64>) -> CardRequest {
    CardRequest::new("Dune", None, "https://img/poster.png", None, rating).unwrap()
}

const RED: [u8; 4] = [255, 0, 0, 255];

#[test]
fn rated_canvas_is_opaque_rgb_with_centred_poster() {
    let b = builder();
    let out = b
        .render(Variant::Rated, &request(None), &png(30, 60, RED), None)
        .unwrap();
    assert_eq!(out.channels, Channels::Rgb);
    assert_eq!(out.size(), Size::new(200, 300));
    // Group 80x145 at (60, 77); poster at group x 10.
    assert_eq!(out.pixel(100, 137), Some(RED));
    assert_eq!(out.pixel(69, 137), Some([0, 0, 0, 255]));
    assert_eq!(out.pixel(70, 77), Some(RED));
    assert_eq!(out.pixel(0, 0), Some([0, 0, 0, 255]));
}

#[test]
fn plain_canvas_is_transparent() {
    let out = builder()
        .render(Variant::Plain, &request(None), &png(30, 60, RED), None)
        .unwrap();
    assert_eq!(out.channels, Channels::Rgba);
    assert_eq!(out.pixel(0, 0), Some([0, 0, 0, 0]));
    assert_eq!(out.pixel(100, 137), Some(RED));
}

#[test]
fn badge_sits_on_poster_only_for_rated_with_rating() {
    let b = builder();
    let accent = b.constants(Variant::Rated).theme.accent.to_rgba8_premul();
    // Badge 24x14 at group (44, 2) → canvas (104, 79).
    let rated = b
        .render(Variant::Rated, &request(Some(8.0)), &png(30, 60, RED), None)
        .unwrap();
    let px = rated.pixel(104, 79).unwrap();
    assert_eq!(&px[..3], &accent.to_array()[..3]);

    let unrated = b
        .render(Variant::Rated, &request(None), &png(30, 60, RED), None)
        .unwrap();
    assert_eq!(unrated.pixel(104, 79), Some(RED));

    let plain = b
        .render(Variant::Plain, &request(Some(8.0)), &png(30, 60, RED), None)
        .unwrap();
    assert_eq!(plain.pixel(104, 79), Some(RED));
}

#[test]
fn background_is_dimmed_under_the_group() {
    let out = builder()
        .render(
            Variant::Rated,
            &request(None),
            &png(30, 60, RED),
            Some(png(4, 4, [255, 255, 255, 255]).as_slice()),
        )
        .unwrap();
    assert_eq!(out.pixel(0, 0), Some([128, 128, 128, 255]));
    assert_eq!(out.pixel(100, 137), Some(RED));
}

#[test]
fn undecodable_background_matches_no_background() {
    let b = builder();
    let with_bad = b
        .render(Variant::Plain, &request(None), &png(30, 60, RED), Some(&b"not an image"[..]))
        .unwrap();
    let without = b
        .render(Variant::Plain, &request(None), &png(30, 60, RED), None)
        .unwrap();
    assert_eq!(with_bad, without);
}

#[test]
fn undecodable_poster_is_a_server_error() {
    let err = builder()
        .render(Variant::Rated, &request(None), b"not an image", None)
        .unwrap_err();
    assert_eq!(err.status_code(), 500);
}

#[test]
fn logo_is_bottom_centred() {
    let blue = [0, 0, 255, 255];
    let logo = RasterBuffer::from_premul_rgba8(20, 10, blue.repeat(200)).unwrap();
    let out = builder()
        .with_logo(logo)
        .render(Variant::Plain, &request(None), &png(30, 60, RED), None)
        .unwrap();
    // y = 300 - 10 - 10, x = (200 - 20) / 2.
    assert_eq!(out.pixel(90, 280), Some(blue));
    assert_eq!(out.pixel(109, 289), Some(blue));
    assert_eq!(out.pixel(89, 280), Some([0, 0, 0, 0]));
}

#[test]
fn rounded_poster_corners_show_canvas() {
    let mut c = small(Variant::Plain);
    c.poster_radius = CornerRadii::uniform(10.0);
    let out = builder()
        .with_constants(Variant::Plain, c)
        .render(Variant::Plain, &request(None), &png(30, 60, RED), None)
        .unwrap();
    assert_eq!(out.pixel(70, 77).unwrap()[3], 0);
    assert_eq!(out.pixel(100, 137), Some(RED));
}

#[test]
fn webp_quality_is_clamped() {
    assert_eq!(builder().with_webp_quality(0).webp_quality, 1);
    assert_eq!(builder().with_webp_quality(200).webp_quality, 100);
}
