pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

pub(crate) fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

/// Offset that centres an extent of `inner` inside `outer`, flooring like integer division.
///
/// Negative when `inner` is wider than `outer`.
pub(crate) fn center_offset(outer: u32, inner: u32) -> i32 {
    ((i64::from(outer) - i64::from(inner)).div_euclid(2)) as i32
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
