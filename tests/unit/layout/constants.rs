use super::*;

#[test]
fn rated_is_opaque_webp_with_badge() {
    let c = LayoutConstants::for_variant(Variant::Rated);
    assert_eq!(c.channels, Channels::Rgb);
    assert_eq!(c.background, Rgba8Premul::black());
    assert_eq!(c.output, OutputFormat::Webp);
    assert!(c.badge.is_some());
}

#[test]
fn plain_is_transparent_png_with_smaller_padding() {
    let a = LayoutConstants::for_variant(Variant::Rated);
    let b = LayoutConstants::for_variant(Variant::Plain);
    assert_eq!(b.channels, Channels::Rgba);
    assert_eq!(b.background.a, 0);
    assert_eq!(b.output, OutputFormat::Png);
    assert!(b.badge.is_none());
    assert!(b.padding < a.padding);
}

#[test]
fn poster_height_floors() {
    let mut c = LayoutConstants::for_variant(Variant::Plain);
    assert_eq!(c.poster_size(), Size::new(600, 900));
    c.poster_width = 101;
    c.poster_aspect = 2.0;
    assert_eq!(c.poster_size(), Size::new(101, 50));
}

#[test]
fn text_width_excludes_padding() {
    let c = LayoutConstants::for_variant(Variant::Rated);
    assert_eq!(c.text_max_width(), 1080 - 160);
}

#[test]
fn theme_reaches_badge() {
    let theme = Theme {
        accent: ColorDef::white(),
        ..Theme::default()
    };
    let c = LayoutConstants::for_variant(Variant::Rated).with_theme(theme.clone());
    assert_eq!(c.badge.unwrap().accent, ColorDef::white());
    assert_eq!(c.theme, theme);
}
