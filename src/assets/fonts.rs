use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{CardError, CardResult};

/// Which text slot a font is used for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontRole {
    /// Card title under the poster.
    Title,
    /// Credits line under the title.
    Credits,
    /// Number inside the rating badge.
    Rating,
}

/// Font file locations. `credits` and `rating` fall back to `title`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontPaths {
    /// Title font file (TTF/OTF).
    pub title: PathBuf,
    /// Credits font file.
    pub credits: Option<PathBuf>,
    /// Rating badge font file.
    pub rating: Option<PathBuf>,
}

/// A loaded font face: raw bytes plus the family name it registers under.
#[derive(Clone, Debug)]
pub struct LoadedFont {
    /// Font file bytes.
    pub bytes: Arc<Vec<u8>>,
    /// Family name reported by the font's name table.
    pub family: String,
}

impl LoadedFont {
    /// Validate font bytes and read their family name.
    pub fn from_bytes(bytes: Vec<u8>) -> CardResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            CardError::config("no font families registered from font bytes")
        })?;
        let family = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| CardError::config("registered font family has no name"))?
            .to_string();
        Ok(Self {
            bytes: Arc::new(bytes),
            family,
        })
    }

    fn from_path(path: &Path) -> CardResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            CardError::config(format!("failed to read font '{}': {e}", path.display()))
        })?;
        Self::from_bytes(bytes)
    }
}

/// Fonts for every [`FontRole`], loaded once at startup.
#[derive(Clone, Debug)]
pub struct FontSet {
    title: LoadedFont,
    credits: LoadedFont,
    rating: LoadedFont,
}

impl FontSet {
    /// Read and validate the configured font files.
    pub fn load(paths: &FontPaths) -> CardResult<Self> {
        if paths.title.as_os_str().is_empty() {
            return Err(CardError::config("fonts.title must be set"));
        }
        let title = LoadedFont::from_path(&paths.title)?;
        let credits = match &paths.credits {
            Some(p) => LoadedFont::from_path(p)?,
            None => title.clone(),
        };
        let rating = match &paths.rating {
            Some(p) => LoadedFont::from_path(p)?,
            None => title.clone(),
        };
        Ok(Self {
            title,
            credits,
            rating,
        })
    }

    /// Use one face for every role.
    pub fn single(font: LoadedFont) -> Self {
        Self {
            title: font.clone(),
            credits: font.clone(),
            rating: font,
        }
    }

    /// Font for `role`.
    pub fn get(&self, role: FontRole) -> &LoadedFont {
        match role {
            FontRole::Title => &self.title,
            FontRole::Credits => &self.credits,
            FontRole::Rating => &self.rating,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
