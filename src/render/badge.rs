//! Rating badge: a bordered rounded box with the rating centred inside.

use serde::{Deserialize, Serialize};

use crate::assets::color::ColorDef;
use crate::assets::fonts::FontRole;
use crate::foundation::core::Size;
use crate::foundation::error::{CardError, CardResult};
use crate::foundation::math::center_offset;
use crate::render::composite::{CanvasSpec, PositionedLayer, composite};
use crate::render::raster::RasterBuffer;
use crate::render::shapes::{CornerRadii, rounded_rect};
use crate::render::text::{TextBlock, TextRenderer};

/// Badge geometry and colours.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BadgeStyle {
    /// Max box the rating text is rendered into.
    pub text_box: Size,
    /// Space between the text box and the border on every side.
    pub padding: u32,
    /// Border thickness.
    pub border_width: u32,
    /// Outer corner radii.
    pub radius: CornerRadii,
    /// Text size in pixels.
    pub font_size: f32,
    /// Border and text colour.
    pub accent: ColorDef,
    /// Fill inside the border.
    pub background: ColorDef,
}

impl Default for BadgeStyle {
    fn default() -> Self {
        Self {
            text_box: Size::new(120, 60),
            padding: 12,
            border_width: 4,
            radius: CornerRadii::uniform(16.0),
            font_size: 44.0,
            accent: ColorDef::rgba(0.961, 0.773, 0.094, 1.0),
            background: ColorDef::black(),
        }
    }
}

impl BadgeStyle {
    /// Outer box size: text box plus padding on both sides.
    pub fn box_size(&self) -> Size {
        Size::new(
            self.text_box.width + 2 * self.padding,
            self.text_box.height + 2 * self.padding,
        )
    }
}

/// `"10"` for ratings of ten or more, one decimal place below that.
pub fn format_rating(rating: f64) -> String {
    if rating >= 10.0 {
        format!("{rating}")
    } else {
        format!("{rating:.1}")
    }
}

/// Render the badge for `rating` as a self-contained transparent buffer of
/// [`BadgeStyle::box_size`].
#[tracing::instrument(level = "debug", skip(style, text))]
pub fn rating_badge(
    rating: f64,
    style: &BadgeStyle,
    text: &dyn TextRenderer,
) -> CardResult<RasterBuffer> {
    let size = style.box_size();
    let border = style.border_width;
    if 2 * border >= size.width || 2 * border >= size.height {
        return Err(CardError::render(format!(
            "badge border {border} leaves no interior in {}x{}",
            size.width, size.height
        )));
    }

    let outer = rounded_rect(
        size.width,
        size.height,
        style.radius,
        style.accent.to_rgba8_premul(),
    )?;
    let inner = rounded_rect(
        size.width - 2 * border,
        size.height - 2 * border,
        style.radius.inset(f64::from(border)),
        style.background.to_rgba8_premul(),
    )?;
    let label = text.render(&TextBlock {
        text: format_rating(rating),
        font: FontRole::Rating,
        size_px: style.font_size,
        color: style.accent,
        max_width: style.text_box.width,
        max_height: style.text_box.height,
    })?;

    let label_x = center_offset(size.width, label.width);
    let label_y = center_offset(size.height, label.height);
    let border = border as i32;
    composite(
        CanvasSpec::transparent(size),
        &[
            PositionedLayer::over(outer, 0, 0),
            PositionedLayer::over(inner, border, border),
            PositionedLayer::over(label, label_x, label_y),
        ],
    )
}

#[cfg(test)]
#[path = "../../tests/unit/render/badge.rs"]
mod tests;
