use super::*;

fn block(text: &str, max_width: u32, max_height: u32) -> TextBlock {
    TextBlock {
        text: text.to_owned(),
        font: FontRole::Title,
        size_px: 48.0,
        color: ColorDef::white(),
        max_width,
        max_height,
    }
}

#[test]
fn visible_lines_keep_at_least_one() {
    assert_eq!(visible_line_count(&[30.0, 30.0, 30.0], 100.0), 3);
    assert_eq!(visible_line_count(&[30.0, 30.0, 30.0], 60.0), 2);
    assert_eq!(visible_line_count(&[30.0, 30.0, 30.0], 59.0), 1);
    assert_eq!(visible_line_count(&[80.0], 10.0), 1);
}

#[test]
fn line_centering_never_goes_negative() {
    assert_eq!(line_center_dx(100.0, 40.0), 30.0);
    assert_eq!(line_center_dx(100.0, 140.0), 0.0);
}

#[test]
fn box_renderer_reports_wrapped_extents() {
    let r = BoxTextRenderer::default();
    let out = r.render(&block("abcd", 200, 100)).unwrap();
    assert_eq!((out.width, out.height), (40, 20));

    // 25 chars, 10 per line -> 3 lines.
    let out = r.render(&block(&"x".repeat(25), 100, 100)).unwrap();
    assert_eq!((out.width, out.height), (100, 60));

    // Clipped to two lines by max height.
    let out = r.render(&block(&"x".repeat(25), 100, 45)).unwrap();
    assert_eq!(out.height, 40);

    assert!(r.render(&block("   ", 100, 100)).is_err());
}

fn fixture_renderer() -> ParleyTextRenderer {
    let bytes = std::fs::read("tests/data/fonts/Tuffy.ttf").unwrap();
    let font = LoadedFont::from_bytes(bytes).unwrap();
    ParleyTextRenderer::new(FontSet::single(font))
}

/// Column range `[min, max]` of pixels with alpha in rows `rows`, if any.
fn ink_columns(buf: &RasterBuffer, rows: std::ops::Range<u32>) -> Option<(u32, u32)> {
    let mut range: Option<(u32, u32)> = None;
    for y in rows {
        for x in 0..buf.width {
            let i = ((y * buf.width + x) * 4 + 3) as usize;
            if buf.data[i] > 0 {
                range = Some(match range {
                    Some((lo, hi)) => (lo.min(x), hi.max(x)),
                    None => (x, x),
                });
            }
        }
    }
    range
}

#[test]
fn parley_glyphs_land_inside_the_buffer() {
    let r = fixture_renderer();
    let out = r.render(&block("Hello", 800, 200)).unwrap();
    assert!(out.width <= 800 && out.height <= 200);
    assert!(out.width < 800, "short text should not fill the max box");

    let ink = out.data.chunks_exact(4).filter(|px| px[3] > 0).count();
    assert!(ink > 500, "expected glyph coverage, got {ink} inked pixels");

    // Ink spans most of the laid-out width and sits in the lower half too.
    let (lo, hi) = ink_columns(&out, 0..out.height).unwrap();
    assert!(hi - lo > out.width / 2, "ink x-range {lo}..{hi} of {}", out.width);
    assert!(ink_columns(&out, out.height / 2..out.height).is_some());

    let tall = r
        .render(&block("many words that will wrap a lot", 120, 60))
        .unwrap();
    assert!(tall.height <= 60);
}

#[test]
fn parley_short_line_is_centred_over_longer_line() {
    let r = fixture_renderer();
    let out = r
        .render(&block("short\na much much longer line", 800, 400))
        .unwrap();

    let half = out.height / 2;
    let (top_lo, top_hi) = ink_columns(&out, 0..half).unwrap();
    let (bottom_lo, bottom_hi) = ink_columns(&out, half..out.height).unwrap();
    assert!(top_hi - top_lo < bottom_hi - bottom_lo);

    let centre = (top_lo + top_hi) as f32 / 2.0;
    let mid = out.width as f32 / 2.0;
    assert!(
        (centre - mid).abs() < out.width as f32 * 0.1,
        "short line ink {top_lo}..{top_hi} not centred in {}",
        out.width
    );
    assert!(top_lo > out.width / 5);
}
