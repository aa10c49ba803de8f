use super::*;
use crate::render::text::BoxTextRenderer;

fn square_style() -> BadgeStyle {
    BadgeStyle {
        text_box: Size::new(40, 20),
        padding: 10,
        border_width: 4,
        radius: CornerRadii::uniform(0.0),
        font_size: 20.0,
        accent: ColorDef::rgba(1.0, 0.0, 0.0, 1.0),
        background: ColorDef::black(),
    }
}

#[test]
fn ratings_below_ten_keep_one_decimal() {
    assert_eq!(format_rating(9.5), "9.5");
    assert_eq!(format_rating(7.0), "7.0");
    assert_eq!(format_rating(0.0), "0.0");
}

#[test]
fn ten_formats_without_decimal() {
    assert_eq!(format_rating(10.0), "10");
}

#[test]
fn badge_is_box_sized_with_border_and_fill() {
    let style = square_style();
    let text = BoxTextRenderer::default();
    let badge = rating_badge(9.5, &style, &text).unwrap();
    assert_eq!(badge.size(), Size::new(60, 40));

    // Border ring in accent.
    assert_eq!(badge.pixel(0, 0), Some([255, 0, 0, 255]));
    assert_eq!(badge.pixel(3, 20), Some([255, 0, 0, 255]));
    // Inside the border, outside the label: background.
    assert_eq!(badge.pixel(4, 4), Some([0, 0, 0, 255]));
}

#[test]
fn label_is_centred_with_floor_division() {
    let style = square_style();
    let text = BoxTextRenderer::default();
    // "9.5" = 3 chars → 30x20 box, centred at ((60-30)/2, (40-20)/2) = (15, 10).
    let badge = rating_badge(9.5, &style, &text).unwrap();
    assert_eq!(badge.pixel(14, 10), Some([0, 0, 0, 255]));
    assert_eq!(badge.pixel(15, 10), Some([255, 0, 0, 255]));
    assert_eq!(badge.pixel(44, 29), Some([255, 0, 0, 255]));
    assert_eq!(badge.pixel(45, 29), Some([0, 0, 0, 255]));
    assert_eq!(badge.pixel(44, 30), Some([0, 0, 0, 255]));
}

#[test]
fn rounded_badge_has_transparent_corners() {
    let style = BadgeStyle {
        radius: CornerRadii::uniform(12.0),
        ..square_style()
    };
    let badge = rating_badge(10.0, &style, &BoxTextRenderer::default()).unwrap();
    assert_eq!(badge.pixel(0, 0).unwrap()[3], 0);
    assert_eq!(badge.pixel(30, 0).unwrap()[3], 255);
}

#[test]
fn radius_smaller_than_border_floors_inner_radius_at_zero() {
    let style = BadgeStyle {
        radius: CornerRadii::uniform(2.0),
        ..square_style()
    };
    assert_eq!(style.radius.inset(4.0), CornerRadii::uniform(0.0));
    let badge = rating_badge(5.0, &style, &BoxTextRenderer::default()).unwrap();
    // Inner square corner sits on the border inset.
    assert_eq!(badge.pixel(4, 4), Some([0, 0, 0, 255]));
}

#[test]
fn oversized_border_is_a_render_error() {
    let style = BadgeStyle {
        border_width: 40,
        ..square_style()
    };
    let err = rating_badge(5.0, &style, &BoxTextRenderer::default()).unwrap_err();
    assert!(matches!(err, CardError::Render(_)));
}
