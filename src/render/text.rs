//! Text blocks: shaped with `parley`, rasterized with `vello_cpu`.
//!
//! Blocks are always centre-aligned and come back sized to the laid-out glyph extents, which are
//! usually smaller than the requested max box. Callers must read the size off the buffer.

use std::borrow::Cow;

use crate::assets::color::ColorDef;
use crate::assets::fonts::{FontRole, FontSet, LoadedFont};
use crate::foundation::core::Size;
use crate::foundation::error::{CardError, CardResult};
use crate::render::raster::{RasterBuffer, pixmap_dims};

/// Declarative description of one text block.
#[derive(Clone, Debug, PartialEq)]
pub struct TextBlock {
    /// Text to draw. Newlines start new lines.
    pub text: String,
    /// Font slot.
    pub font: FontRole,
    /// Preferred font size in pixels.
    pub size_px: f32,
    /// Fill colour.
    pub color: ColorDef,
    /// Wrap width and horizontal bound.
    pub max_width: u32,
    /// Vertical bound.
    pub max_height: u32,
}

/// Renders [`TextBlock`]s to transparent buffers.
pub trait TextRenderer: Send + Sync {
    /// Draw `block` centre-aligned on a transparent background.
    ///
    /// The returned buffer is no larger than the block's max box.
    fn render(&self, block: &TextBlock) -> CardResult<RasterBuffer>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl From<ColorDef> for TextBrushRgba8 {
    fn from(c: ColorDef) -> Self {
        let [r, g, b, a] = c.to_rgba8();
        Self { r, g, b, a }
    }
}

/// Font size is shrunk by this factor per step while the block overflows its max height.
const SHRINK_STEP: f32 = 0.9;
/// Shrinking stops at this fraction of the preferred size; remaining overflow drops lines.
const MIN_SIZE_RATIO: f32 = 0.5;

/// [`TextRenderer`] over a loaded [`FontSet`].
///
/// Fresh Parley contexts are built per call so concurrent requests share nothing mutable.
#[derive(Clone, Debug)]
pub struct ParleyTextRenderer {
    fonts: FontSet,
}

impl ParleyTextRenderer {
    /// Wrap a font set.
    pub fn new(fonts: FontSet) -> Self {
        Self { fonts }
    }
}

impl TextRenderer for ParleyTextRenderer {
    #[tracing::instrument(
        level = "trace",
        skip(self, block),
        fields(role = ?block.font, len = block.text.len())
    )]
    fn render(&self, block: &TextBlock) -> CardResult<RasterBuffer> {
        if block.text.trim().is_empty() {
            return Err(CardError::render("text block is empty"));
        }
        if !block.size_px.is_finite() || block.size_px <= 0.0 {
            return Err(CardError::render("text size_px must be finite and > 0"));
        }
        if block.max_width == 0 || block.max_height == 0 {
            return Err(CardError::render("text max box must be non-zero"));
        }

        let font = self.fonts.get(block.font);
        let mut engine = TextLayoutEngine::new(font);
        let brush = TextBrushRgba8::from(block.color);
        let max_w = block.max_width as f32;
        let max_h = block.max_height as f32;

        let min_size = block.size_px * MIN_SIZE_RATIO;
        let mut size = block.size_px;
        let mut layout = engine.layout(&block.text, size, brush, max_w)?;
        while layout.height() > max_h && size * SHRINK_STEP >= min_size {
            size *= SHRINK_STEP;
            layout = engine.layout(&block.text, size, brush, max_w)?;
        }

        draw_layout(&layout, font, max_w, max_h)
    }
}

/// Font and layout contexts for one render call.
struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family: String,
}

impl TextLayoutEngine {
    fn new(font: &LoadedFont) -> Self {
        let mut font_ctx = parley::FontContext::default();
        font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(font.bytes.as_ref().clone()),
            None,
        );
        Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family: font.family.clone(),
        }
    }

    fn layout(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrushRgba8,
        max_width_px: f32,
    ) -> CardResult<parley::Layout<TextBrushRgba8>> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(self.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(Some(max_width_px));
        layout.align(
            Some(max_width_px),
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );
        if layout.lines().next().is_none() {
            return Err(CardError::render("text produced no lines"));
        }
        Ok(layout)
    }
}

/// Lines kept after clipping to `max_h`. At least one line is always kept.
fn visible_line_count(line_heights: &[f32], max_h: f32) -> usize {
    let mut total = 0.0f32;
    let mut kept = 0usize;
    for h in line_heights {
        if kept > 0 && total + h > max_h {
            break;
        }
        total += h;
        kept += 1;
    }
    kept
}

/// Horizontal shift that centres a line of `advance` inside `block_w`.
fn line_center_dx(block_w: f32, advance: f32) -> f32 {
    ((block_w - advance) / 2.0).max(0.0)
}

fn draw_layout(
    layout: &parley::Layout<TextBrushRgba8>,
    font: &LoadedFont,
    max_w: f32,
    max_h: f32,
) -> CardResult<RasterBuffer> {
    let heights: Vec<f32> = layout.lines().map(|l| l.metrics().line_height).collect();
    let kept = visible_line_count(&heights, max_h);

    let block_w = layout
        .lines()
        .take(kept)
        .map(|l| l.metrics().advance)
        .fold(0.0f32, f32::max)
        .min(max_w);
    let block_h = heights[..kept].iter().sum::<f32>().min(max_h);
    let size = Size::new(
        (block_w.ceil() as u32).max(1),
        (block_h.ceil() as u32).max(1),
    );

    let (w16, h16) = pixmap_dims(size.width, size.height)?;
    let mut ctx = vello_cpu::RenderContext::new(w16, h16);
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    let vfont = vello_cpu::peniko::FontData::new(
        vello_cpu::peniko::Blob::from(font.bytes.as_ref().clone()),
        0,
    );

    for line in layout.lines().take(kept) {
        let dx = line_center_dx(size.width as f32, line.metrics().advance);
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x + dx,
                y: g.y,
            });
            ctx.glyph_run(&vfont)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }

    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
    ctx.render_to_pixmap(&mut pixmap);
    RasterBuffer::from_pixmap(&pixmap)
}

/// Deterministic [`TextRenderer`] that draws solid boxes instead of glyphs.
///
/// Each character is `char_w × line_h`; text wraps at the max width and is clipped to the max
/// height like the real renderer. Useful wherever real fonts are unavailable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxTextRenderer {
    /// Width of one character cell.
    pub char_w: u32,
    /// Height of one line.
    pub line_h: u32,
}

impl Default for BoxTextRenderer {
    fn default() -> Self {
        Self {
            char_w: 10,
            line_h: 20,
        }
    }
}

impl TextRenderer for BoxTextRenderer {
    fn render(&self, block: &TextBlock) -> CardResult<RasterBuffer> {
        let chars = block.text.trim().chars().count() as u32;
        if chars == 0 {
            return Err(CardError::render("text block is empty"));
        }
        let per_line = (block.max_width / self.char_w.max(1)).max(1);
        let lines = chars.div_ceil(per_line);
        let max_lines = (block.max_height / self.line_h.max(1)).max(1);
        let width = (chars.min(per_line) * self.char_w).clamp(1, block.max_width.max(1));
        let height = (lines.min(max_lines) * self.line_h).clamp(1, block.max_height.max(1));
        Ok(RasterBuffer::filled(
            width,
            height,
            crate::render::raster::Channels::Rgba,
            block.color.to_rgba8_premul(),
        ))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
