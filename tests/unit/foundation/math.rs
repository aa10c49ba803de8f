use super::*;

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn center_offset_floors_and_goes_negative() {
    assert_eq!(center_offset(100, 40), 30);
    assert_eq!(center_offset(101, 40), 30);
    assert_eq!(center_offset(40, 100), -30);
    assert_eq!(center_offset(40, 101), -31);
}
