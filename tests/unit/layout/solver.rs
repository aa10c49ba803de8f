use super::*;
use crate::card::request::Variant;

fn constants() -> LayoutConstants {
    LayoutConstants::for_variant(Variant::Rated)
}

fn measured(title: Size) -> MeasuredParts {
    MeasuredParts {
        title,
        ..MeasuredParts::default()
    }
}

#[test]
fn group_height_without_credits() {
    let c = constants();
    let l = resolve(&measured(Size::new(300, 70)), &c);
    assert_eq!(l.group.height, 900 + c.title_gap + 70);
    assert_eq!(l.credits, None);
}

#[test]
fn group_height_with_credits() {
    let c = constants();
    let m = MeasuredParts {
        credits: Some(Size::new(200, 40)),
        ..measured(Size::new(300, 70))
    };
    let l = resolve(&m, &c);
    assert_eq!(
        l.group.height,
        900 + c.title_gap + 70 + c.credits_gap + 40
    );
    let credits = l.credits.unwrap();
    assert_eq!(credits.y as u32, 900 + c.title_gap + 70 + c.credits_gap);
}

#[test]
fn group_width_tracks_widest_part() {
    let c = constants();
    let cases = [
        (300, None, 600),
        (800, None, 800),
        (300, Some(700), 700),
        (900, Some(700), 900),
    ];
    for (t, cr, widest) in cases {
        let m = MeasuredParts {
            credits: cr.map(|w| Size::new(w, 30)),
            ..measured(Size::new(t, 60))
        };
        let l = resolve(&m, &c);
        assert_eq!(l.group.width, widest + 2 * c.padding, "title {t} credits {cr:?}");
    }
}

#[test]
fn parts_centre_in_group_and_group_centres_on_canvas() {
    let c = constants();
    let l = resolve(&measured(Size::new(301, 70)), &c);
    // 600 + 160 = 760 wide group.
    assert_eq!(l.poster, PixelRect::new(80, 0, 600, 900));
    assert_eq!(l.title.x, (760 - 301) / 2);
    assert_eq!(l.title.y as u32, 900 + c.title_gap);
    assert_eq!(l.group.x, (1080 - 760) / 2);
    assert_eq!(l.group.y, (1920 - l.group.height as i32) / 2);
}

#[test]
fn badge_anchors_to_poster_top_right() {
    let c = constants();
    let m = MeasuredParts {
        badge: Some(Size::new(144, 84)),
        ..measured(Size::new(300, 70))
    };
    let l = resolve(&m, &c);
    let b = l.badge.unwrap();
    assert_eq!(b.x, 80 + 600 - 144 - c.badge_right_margin as i32);
    assert_eq!(b.y, c.badge_top_margin as i32);
}

#[test]
fn background_and_logo_placement() {
    let c = constants();
    let m = MeasuredParts {
        logo: Some(Size::new(240, 60)),
        background: true,
        ..measured(Size::new(300, 70))
    };
    let l = resolve(&m, &c);
    assert_eq!(l.background, Some(PixelRect::new(0, 0, 1080, 1920)));
    assert_eq!(
        l.logo,
        Some(PixelRect::new(420, (1920 - 60 - c.padding) as i32, 240, 60))
    );

    let bare = resolve(&measured(Size::new(300, 70)), &c);
    assert_eq!(bare.background, None);
    assert_eq!(bare.logo, None);
}

#[test]
fn oversized_group_gets_negative_offset() {
    let mut c = constants();
    c.canvas = Size::new(500, 500);
    let l = resolve(&measured(Size::new(300, 70)), &c);
    assert!(l.group.x < 0);
    assert!(l.group.y < 0);
}
