use serde::{Deserialize, Serialize};

use crate::assets::color::ColorDef;
use crate::card::request::Variant;
use crate::foundation::core::{Rgba8Premul, Size};
use crate::render::badge::BadgeStyle;
use crate::render::composite::CanvasSpec;
use crate::render::encode::OutputFormat;
use crate::render::raster::Channels;
use crate::render::shapes::CornerRadii;

/// Colour scheme shared by both variants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Badge border and rating text.
    pub accent: ColorDef,
    /// Title text.
    pub title: ColorDef,
    /// Credits text.
    pub credits: ColorDef,
    /// Badge fill.
    pub badge_background: ColorDef,
    /// Mask colour used to dim backgrounds. Only its alpha matters under `DestIn`.
    pub overlay: ColorDef,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: ColorDef::rgba(0.961, 0.773, 0.094, 1.0),
            title: ColorDef::white(),
            credits: ColorDef::rgba(0.733, 0.733, 0.733, 1.0),
            badge_background: ColorDef::black(),
            overlay: ColorDef::black(),
        }
    }
}

/// Fixed geometry and format of one variant.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConstants {
    /// Output canvas size.
    pub canvas: Size,
    /// Channel depth of the output canvas.
    pub channels: Channels,
    /// Canvas fill before any layer is painted.
    pub background: Rgba8Premul,
    /// Output encoding.
    pub output: OutputFormat,
    /// Horizontal group padding and logo bottom margin.
    pub padding: u32,
    /// Poster box width.
    pub poster_width: u32,
    /// Poster width / height.
    pub poster_aspect: f64,
    /// Poster corner rounding.
    pub poster_radius: CornerRadii,
    /// Title height cap.
    pub title_max_height: u32,
    /// Title font size in pixels.
    pub title_font_size: f32,
    /// Space between poster and title.
    pub title_gap: u32,
    /// Credits height cap.
    pub credits_max_height: u32,
    /// Credits font size in pixels.
    pub credits_font_size: f32,
    /// Space between title and credits.
    pub credits_gap: u32,
    /// Badge look, `None` when the variant has no badge.
    pub badge: Option<BadgeStyle>,
    /// Badge offset down from the poster's top edge.
    pub badge_top_margin: u32,
    /// Badge offset in from the poster's right edge.
    pub badge_right_margin: u32,
    /// Logo width; height follows the logo's aspect ratio.
    pub logo_width: u32,
    /// Alpha kept on the background photo after dimming.
    pub overlay_opacity: f32,
    /// Colours.
    pub theme: Theme,
}

impl LayoutConstants {
    /// Built-in constants for `variant` with the default theme.
    pub fn for_variant(variant: Variant) -> Self {
        let theme = Theme::default();
        let shared = Self {
            canvas: Size::new(1080, 1920),
            channels: Channels::Rgb,
            background: Rgba8Premul::black(),
            output: variant.output_format(),
            padding: 80,
            poster_width: 600,
            poster_aspect: 2.0 / 3.0,
            poster_radius: CornerRadii::uniform(24.0),
            title_max_height: 240,
            title_font_size: 64.0,
            title_gap: 48,
            credits_max_height: 120,
            credits_font_size: 36.0,
            credits_gap: 16,
            badge: None,
            badge_top_margin: 24,
            badge_right_margin: 24,
            logo_width: 240,
            overlay_opacity: 0.5,
            theme: Theme::default(),
        };
        match variant {
            Variant::Rated => Self {
                badge: Some(BadgeStyle {
                    accent: theme.accent,
                    background: theme.badge_background,
                    ..BadgeStyle::default()
                }),
                ..shared
            },
            Variant::Plain => Self {
                channels: Channels::Rgba,
                background: Rgba8Premul::transparent(),
                padding: 40,
                ..shared
            },
        }
    }

    /// Replace the colour scheme, including the badge colours.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        if let Some(badge) = self.badge.as_mut() {
            badge.accent = theme.accent;
            badge.background = theme.badge_background;
        }
        self.theme = theme;
        self
    }

    /// Poster box: `poster_width × floor(poster_width / poster_aspect)`.
    pub fn poster_size(&self) -> Size {
        let h = (f64::from(self.poster_width) / self.poster_aspect).floor();
        Size::new(self.poster_width, h.max(0.0) as u32)
    }

    /// Wrap width for title and credits: canvas width minus padding on both sides.
    pub fn text_max_width(&self) -> u32 {
        self.canvas.width.saturating_sub(2 * self.padding).max(1)
    }

    /// Canvas the final composite starts from.
    pub fn canvas_spec(&self) -> CanvasSpec {
        CanvasSpec {
            size: self.canvas,
            channels: self.channels,
            background: self.background,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/constants.rs"]
mod tests;
