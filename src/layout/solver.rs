//! Geometry resolution: rendered part sizes in, every layer rectangle out.

use crate::foundation::core::{PixelRect, Size};
use crate::foundation::math::center_offset;
use crate::layout::constants::LayoutConstants;

/// Sizes reported by the renderers for one card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MeasuredParts {
    /// Rendered title.
    pub title: Size,
    /// Rendered credits, when present.
    pub credits: Option<Size>,
    /// Rendered badge, when present.
    pub badge: Option<Size>,
    /// Scaled logo, when configured.
    pub logo: Option<Size>,
    /// Whether a background photo survived fetching and decoding.
    pub background: bool,
}

/// Every layer rectangle of one card.
///
/// `poster`, `title`, `credits` and `badge` are relative to the group; the rest are canvas
/// coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    /// Canvas size.
    pub canvas: Size,
    /// Full-canvas background, painted first.
    pub background: Option<PixelRect>,
    /// Group placement on the canvas.
    pub group: PixelRect,
    /// Poster box in the group.
    pub poster: PixelRect,
    /// Title in the group.
    pub title: PixelRect,
    /// Credits in the group.
    pub credits: Option<PixelRect>,
    /// Badge in the group, over the poster's top-right corner.
    pub badge: Option<PixelRect>,
    /// Bottom-anchored logo.
    pub logo: Option<PixelRect>,
}

/// Resolve all positions for a card. Never fails; absent parts yield `None` rectangles.
pub fn resolve(measured: &MeasuredParts, constants: &LayoutConstants) -> Layout {
    let canvas = constants.canvas;
    let poster = constants.poster_size();

    let title_y = poster.height + constants.title_gap;
    let mut group_h = title_y + measured.title.height;
    let credits_y = measured.credits.map(|_| group_h + constants.credits_gap);
    if let Some(c) = measured.credits {
        group_h += constants.credits_gap + c.height;
    }

    let widest = poster
        .width
        .max(measured.title.width)
        .max(measured.credits.map_or(0, |c| c.width));
    let group_w = widest + 2 * constants.padding;

    let centred = |s: Size, y: u32| {
        PixelRect::new(center_offset(group_w, s.width), y as i32, s.width, s.height)
    };
    let poster_rect = centred(poster, 0);
    let title_rect = centred(measured.title, title_y);
    let credits_rect = measured
        .credits
        .zip(credits_y)
        .map(|(s, y)| centred(s, y));

    let badge_rect = measured.badge.map(|b| {
        let x = i64::from(poster_rect.x) + i64::from(poster.width)
            - i64::from(b.width)
            - i64::from(constants.badge_right_margin);
        PixelRect::new(
            x as i32,
            constants.badge_top_margin as i32,
            b.width,
            b.height,
        )
    });

    let group = PixelRect::new(
        center_offset(canvas.width, group_w),
        center_offset(canvas.height, group_h),
        group_w,
        group_h,
    );

    let logo = measured.logo.map(|l| {
        let y = i64::from(canvas.height) - i64::from(l.height) - i64::from(constants.padding);
        PixelRect::new(
            center_offset(canvas.width, l.width),
            y as i32,
            l.width,
            l.height,
        )
    });

    Layout {
        canvas,
        background: measured.background.then(|| PixelRect::from_size(canvas)),
        group,
        poster: poster_rect,
        title: title_rect,
        credits: credits_rect,
        badge: badge_rect,
        logo,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/solver.rs"]
mod tests;
