//! Service configuration, loaded from a JSON file with every field defaulted.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::assets::fetch::{FetchOptions, HttpFetcher};
use crate::assets::fonts::{FontPaths, FontSet};
use crate::assets::logo::load_logo;
use crate::cache::disk::DiskCache;
use crate::cache::store::{CardCache, MemoryCache, NoCache};
use crate::card::builder::{CardBuilder, DEFAULT_CACHE_TTL, DEFAULT_WEBP_QUALITY};
use crate::card::request::Variant;
use crate::foundation::error::{CardError, CardResult};
use crate::layout::constants::{LayoutConstants, Theme};
use crate::render::text::ParleyTextRenderer;

/// Card builder over HTTP fetching, Parley text and the configured cache.
pub type CardService = CardBuilder<HttpFetcher, ParleyTextRenderer, Box<dyn CardCache>>;

/// Backing store for rendered cards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheKind {
    /// In-process map.
    #[default]
    Memory,
    /// One file per card under [`CacheConfig::dir`].
    Disk,
    /// Caching disabled.
    None,
}

/// Cache settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Store to use.
    pub kind: CacheKind,
    /// Directory for [`CacheKind::Disk`].
    pub dir: PathBuf,
    /// Entry lifetime in seconds.
    pub ttl_secs: u64,
    /// Entry bound for [`CacheKind::Memory`].
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            kind: CacheKind::Memory,
            dir: PathBuf::from(".mediacard-cache"),
            ttl_secs: DEFAULT_CACHE_TTL.as_secs(),
            capacity: 256,
        }
    }
}

impl CacheConfig {
    /// Entry lifetime.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Open the configured store.
    pub fn open(&self) -> CardResult<Box<dyn CardCache>> {
        Ok(match self.kind {
            CacheKind::Memory => Box::new(MemoryCache::new(self.capacity)),
            CacheKind::Disk => Box::new(DiskCache::open(&self.dir)?),
            CacheKind::None => Box::new(NoCache),
        })
    }
}

/// Everything needed to stand up a [`CardService`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    /// Font files per role.
    pub fonts: FontPaths,
    /// Optional PNG or SVG logo painted at the bottom of every card.
    pub logo: Option<PathBuf>,
    /// Colours.
    pub theme: Theme,
    /// Outbound HTTP settings.
    pub fetch: FetchOptions,
    /// Cache settings.
    pub cache: CacheConfig,
    /// WebP quality for the rated variant, `1..=100`.
    pub webp_quality: u8,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            fonts: FontPaths::default(),
            logo: None,
            theme: Theme::default(),
            fetch: FetchOptions::default(),
            cache: CacheConfig::default(),
            webp_quality: DEFAULT_WEBP_QUALITY,
        }
    }
}

impl ServiceConfig {
    /// Parse a JSON document.
    pub fn from_json_str(s: &str) -> CardResult<Self> {
        let cfg: Self =
            serde_json::from_str(s).map_err(|e| CardError::serde(format!("config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a JSON file.
    pub fn from_path(path: &Path) -> CardResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_json_str(&s)
    }

    fn validate(&self) -> CardResult<()> {
        if !(1..=100).contains(&self.webp_quality) {
            return Err(CardError::config(format!(
                "webp_quality must be within 1..=100, got {}",
                self.webp_quality
            )));
        }
        if self.fetch.max_bytes == 0 {
            return Err(CardError::config("fetch.max_bytes must be > 0"));
        }
        Ok(())
    }

    /// Load fonts and logo, open the cache and assemble the service.
    #[tracing::instrument(skip(self))]
    pub fn build_service(&self) -> CardResult<CardService> {
        self.validate()?;
        let fonts = FontSet::load(&self.fonts)?;
        let fetcher = HttpFetcher::new(&self.fetch)?;
        let cache = self.cache.open()?;

        let mut service = CardBuilder::new(fetcher, ParleyTextRenderer::new(fonts), cache)
            .with_theme(self.theme.clone())
            .with_cache_ttl(self.cache.ttl())
            .with_webp_quality(self.webp_quality);
        if let Some(path) = &self.logo {
            let width = LayoutConstants::for_variant(Variant::Rated).logo_width;
            service = service.with_logo(load_logo(path, width)?);
        }
        tracing::debug!(cache = ?self.cache.kind, logo = self.logo.is_some(), "card service ready");
        Ok(service)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
