//! Card assembly: cache lookup, fetch, render, layout, composite, encode, cache store.

use std::time::Duration;

use tracing::{debug, warn};

use crate::assets::decode::{cover_resize, decode_image};
use crate::assets::fetch::AssetFetcher;
use crate::assets::fonts::FontRole;
use crate::cache::fingerprint::fingerprint;
use crate::cache::store::CardCache;
use crate::card::request::{CardRequest, Variant};
use crate::foundation::core::{Rgba8Premul, Size};
use crate::foundation::error::{CardError, CardResult};
use crate::layout::constants::{LayoutConstants, Theme};
use crate::layout::solver::{MeasuredParts, resolve};
use crate::render::badge::rating_badge;
use crate::render::composite::{CanvasSpec, PositionedLayer, composite};
use crate::render::encode::{EncodedImage, OutputFormat, encode};
use crate::render::raster::RasterBuffer;
use crate::render::shapes::{color_overlay, rounded_rect};
use crate::render::text::{TextBlock, TextRenderer};

/// Default lifetime of a cached card.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);
/// Default WebP quality for the rated variant.
pub const DEFAULT_WEBP_QUALITY: u8 = 90;

/// Builds encoded cards for both variants from one parameterised pipeline.
#[derive(Debug)]
pub struct CardBuilder<F, T, C> {
    fetcher: F,
    text: T,
    cache: C,
    logo: Option<RasterBuffer>,
    rated: LayoutConstants,
    plain: LayoutConstants,
    cache_ttl: Duration,
    webp_quality: u8,
}

impl<F: AssetFetcher, T: TextRenderer, C: CardCache> CardBuilder<F, T, C> {
    /// Builder with the built-in constants, no logo and default cache settings.
    pub fn new(fetcher: F, text: T, cache: C) -> Self {
        Self {
            fetcher,
            text,
            cache,
            logo: None,
            rated: LayoutConstants::for_variant(Variant::Rated),
            plain: LayoutConstants::for_variant(Variant::Plain),
            cache_ttl: DEFAULT_CACHE_TTL,
            webp_quality: DEFAULT_WEBP_QUALITY,
        }
    }

    /// Paint `logo` at the bottom of every card. It is used at its own size.
    pub fn with_logo(mut self, logo: RasterBuffer) -> Self {
        self.logo = Some(logo);
        self
    }

    /// Replace the constants of `variant`.
    pub fn with_constants(mut self, variant: Variant, constants: LayoutConstants) -> Self {
        match variant {
            Variant::Rated => self.rated = constants,
            Variant::Plain => self.plain = constants,
        }
        self
    }

    /// Apply `theme` to both variants.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.rated = self.rated.with_theme(theme.clone());
        self.plain = self.plain.with_theme(theme);
        self
    }

    /// Lifetime of cache entries written from now on.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// WebP quality in `1..=100`; 100 is lossless.
    pub fn with_webp_quality(mut self, quality: u8) -> Self {
        self.webp_quality = quality.clamp(1, 100);
        self
    }

    /// Constants in effect for `variant`.
    pub fn constants(&self, variant: Variant) -> &LayoutConstants {
        match variant {
            Variant::Rated => &self.rated,
            Variant::Plain => &self.plain,
        }
    }

    /// Fetcher in use.
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Cache in use.
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Produce the encoded card for `request`, serving from cache when possible.
    ///
    /// A poster that cannot be fetched fails with [`CardError::InvalidPoster`] and nothing is
    /// cached. A background that cannot be fetched is left out. Cache failures only log.
    #[tracing::instrument(
        skip(self, variant, request),
        fields(variant = %variant, title = request.title())
    )]
    pub async fn build(&self, variant: Variant, request: &CardRequest) -> CardResult<EncodedImage> {
        let format = self.constants(variant).output;
        let key = fingerprint(variant, request);
        match self.cache.get(&key) {
            Ok(Some(bytes)) => {
                debug!(key = %key, "card cache hit");
                return Ok(EncodedImage { format, bytes });
            }
            Ok(None) => debug!(key = %key, "card cache miss"),
            Err(err) => warn!(key = %key, error = %err, "card cache read failed"),
        }

        let background = async {
            match request.background_url() {
                Some(url) => Some(self.fetcher.fetch(url).await),
                None => None,
            }
        };
        let (poster, background) =
            tokio::join!(self.fetcher.fetch(request.poster_url()), background);
        let poster = poster.map_err(|err| CardError::invalid_poster(err.to_string()))?;
        let background = match background {
            Some(Ok(bytes)) => Some(bytes),
            Some(Err(err)) => {
                warn!(error = %err, "background fetch failed; omitting background");
                None
            }
            None => None,
        };

        let canvas = self.render(variant, request, &poster, background.as_deref())?;
        let quality = if format == OutputFormat::Webp {
            self.webp_quality
        } else {
            100
        };
        let encoded = encode(&canvas, format, quality)?;

        if let Err(err) = self.cache.set(&key, &encoded.bytes, self.cache_ttl) {
            warn!(key = %key, error = %err, "card cache write failed");
        }
        Ok(encoded)
    }

    /// Assemble the card canvas from already fetched bytes. No cache access.
    pub fn render(
        &self,
        variant: Variant,
        request: &CardRequest,
        poster: &[u8],
        background: Option<&[u8]>,
    ) -> CardResult<RasterBuffer> {
        let c = self.constants(variant);
        let theme = &c.theme;

        let poster = self.poster_layer(c, poster)?;
        let background = background.and_then(|bytes| match self.background_layer(c, bytes) {
            Ok(buf) => Some(buf),
            Err(err) => {
                warn!(error = %err, "background decode failed; omitting background");
                None
            }
        });

        let title = self.text.render(&TextBlock {
            text: request.title().to_owned(),
            font: FontRole::Title,
            size_px: c.title_font_size,
            color: theme.title,
            max_width: c.text_max_width(),
            max_height: c.title_max_height,
        })?;
        let credits = request
            .credits()
            .map(|text| {
                self.text.render(&TextBlock {
                    text: text.to_owned(),
                    font: FontRole::Credits,
                    size_px: c.credits_font_size,
                    color: theme.credits,
                    max_width: c.text_max_width(),
                    max_height: c.credits_max_height,
                })
            })
            .transpose()?;
        let badge = match (&c.badge, request.rating()) {
            (Some(style), Some(rating)) => Some(rating_badge(rating, style, &self.text)?),
            _ => None,
        };

        let layout = resolve(
            &MeasuredParts {
                title: title.size(),
                credits: credits.as_ref().map(RasterBuffer::size),
                badge: badge.as_ref().map(RasterBuffer::size),
                logo: self.logo.as_ref().map(RasterBuffer::size),
                background: background.is_some(),
            },
            c,
        );
        debug!(?layout, "resolved card layout");

        let mut group_layers = vec![PositionedLayer::over(
            poster,
            layout.poster.x,
            layout.poster.y,
        )];
        if let (Some(buf), Some(rect)) = (badge, layout.badge) {
            group_layers.push(PositionedLayer::over(buf, rect.x, rect.y));
        }
        group_layers.push(PositionedLayer::over(title, layout.title.x, layout.title.y));
        if let (Some(buf), Some(rect)) = (credits, layout.credits) {
            group_layers.push(PositionedLayer::over(buf, rect.x, rect.y));
        }
        let group = composite(
            CanvasSpec::transparent(layout.group.size()),
            &group_layers,
        )?;

        let mut layers = Vec::with_capacity(3);
        if let (Some(buf), Some(rect)) = (background, layout.background) {
            layers.push(PositionedLayer::over(buf, rect.x, rect.y));
        }
        layers.push(PositionedLayer::over(group, layout.group.x, layout.group.y));
        if let (Some(buf), Some(rect)) = (self.logo.clone(), layout.logo) {
            layers.push(PositionedLayer::over(buf, rect.x, rect.y));
        }
        composite(c.canvas_spec(), &layers)
    }

    /// Poster cover-resized to its box and clipped to rounded corners.
    fn poster_layer(&self, c: &LayoutConstants, bytes: &[u8]) -> CardResult<RasterBuffer> {
        let size = c.poster_size();
        let photo = cover_resize(&decode_image(bytes)?, size)?;
        let mask = rounded_rect(
            size.width,
            size.height,
            c.poster_radius,
            Rgba8Premul::from_straight_rgba(255, 255, 255, 255),
        )?;
        composite(
            CanvasSpec::transparent(size),
            &[
                PositionedLayer::over(photo, 0, 0),
                PositionedLayer::dest_in(mask, 0, 0),
            ],
        )
    }

    /// Background cover-resized to the canvas and dimmed to the overlay opacity.
    fn background_layer(&self, c: &LayoutConstants, bytes: &[u8]) -> CardResult<RasterBuffer> {
        let Size { width, height } = c.canvas;
        let photo = cover_resize(&decode_image(bytes)?, c.canvas)?;
        let dim = color_overlay(
            width,
            height,
            c.theme.overlay.to_rgba8_premul(),
            c.overlay_opacity,
        )?;
        composite(
            CanvasSpec::transparent(c.canvas),
            &[
                PositionedLayer::over(photo, 0, 0),
                PositionedLayer::dest_in(dim, 0, 0),
            ],
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/card/builder.rs"]
mod tests;
