use super::*;

fn white() -> Rgba8Premul {
    Rgba8Premul::from_straight_rgba(255, 255, 255, 255)
}

#[test]
fn zero_radius_is_a_fully_opaque_rect() {
    let rr = rounded_rect(16, 9, CornerRadii::uniform(0.0), white()).unwrap();
    assert_eq!((rr.width, rr.height), (16, 9));
    assert!(rr.data.chunks_exact(4).all(|px| px == [255, 255, 255, 255]));
}

#[test]
fn rounded_corners_are_transparent_and_center_is_opaque() {
    let rr = rounded_rect(40, 40, CornerRadii::uniform(12.0), white()).unwrap();
    assert_eq!(rr.pixel(0, 0).unwrap()[3], 0);
    assert_eq!(rr.pixel(39, 0).unwrap()[3], 0);
    assert_eq!(rr.pixel(39, 39).unwrap()[3], 0);
    assert_eq!(rr.pixel(0, 39).unwrap()[3], 0);
    assert_eq!(rr.pixel(20, 20).unwrap(), [255, 255, 255, 255]);
    // Straight edges between the corners stay solid.
    assert_eq!(rr.pixel(20, 0).unwrap()[3], 255);
}

#[test]
fn per_corner_radii_only_round_selected_corners() {
    let radii = CornerRadii {
        tl: 10.0,
        ..CornerRadii::default()
    };
    let rr = rounded_rect(30, 30, radii, white()).unwrap();
    assert_eq!(rr.pixel(0, 0).unwrap()[3], 0);
    assert_eq!(rr.pixel(29, 0).unwrap()[3], 255);
    assert_eq!(rr.pixel(29, 29).unwrap()[3], 255);
    assert_eq!(rr.pixel(0, 29).unwrap()[3], 255);
}

#[test]
fn inset_floors_at_zero() {
    let r = CornerRadii {
        tl: 10.0,
        tr: 3.0,
        br: 0.0,
        bl: 4.0,
    }
    .inset(4.0);
    assert_eq!(
        r,
        CornerRadii {
            tl: 6.0,
            tr: 0.0,
            br: 0.0,
            bl: 0.0
        }
    );
    assert!(CornerRadii::uniform(3.0).inset(4.0).is_square());
}

#[test]
fn overlay_alpha_matches_opacity() {
    let o = color_overlay(4, 4, Rgba8Premul::black(), 0.5).unwrap();
    assert!(o.data.chunks_exact(4).all(|px| px == [0, 0, 0, 128]));
    assert!(color_overlay(0, 4, Rgba8Premul::black(), 0.5).is_err());
}
