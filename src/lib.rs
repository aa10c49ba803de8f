//! mediacard renders poster-style "media cards": a rounded poster with title, optional credits
//! and an optional rating badge, laid over an optional dimmed background photo with a logo at
//! the bottom.
//!
//! - Describe a card with a [`CardRequest`]
//! - Pick a [`Variant`] (opaque WebP with badge, or transparent PNG without)
//! - Build it with a [`CardBuilder`], which consults the fingerprint cache before doing any work
//!
//! [`ServiceConfig::build_service`] wires the production collaborators: HTTP fetching, Parley text
//! and a memory or disk cache.
#![forbid(unsafe_code)]

pub mod assets;
pub mod cache;
pub mod card;
/// Service configuration.
pub mod config;
pub mod foundation;
pub mod layout;
pub mod render;

pub use crate::assets::fetch::{AssetFetcher, FetchError, FetchOptions, HttpFetcher, StaticFetcher};
pub use crate::cache::disk::DiskCache;
pub use crate::cache::fingerprint::{CacheKey, fingerprint};
pub use crate::cache::store::{CacheEntry, CardCache, MemoryCache, NoCache};
pub use crate::card::builder::CardBuilder;
pub use crate::card::request::{CardRequest, Variant};
pub use crate::config::{CacheConfig, CacheKind, CardService, ServiceConfig};
pub use crate::foundation::core::{PixelRect, Rgba8Premul, Size};
pub use crate::foundation::error::{CardError, CardResult, ErrorPayload};
pub use crate::layout::constants::{LayoutConstants, Theme};
pub use crate::layout::solver::{Layout, MeasuredParts, resolve};
pub use crate::render::composite::{BlendMode, CanvasSpec, PositionedLayer, composite};
pub use crate::render::encode::{EncodedImage, OutputFormat};
pub use crate::render::raster::{Channels, RasterBuffer};
pub use crate::render::text::{BoxTextRenderer, ParleyTextRenderer, TextBlock, TextRenderer};
