use serde::{Deserialize, Serialize};

use crate::foundation::error::{CardError, CardResult};
use crate::render::encode::OutputFormat;

/// Card layout family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Opaque canvas, optional rating badge, WebP output.
    Rated,
    /// Transparent canvas, no badge, PNG output.
    Plain,
}

impl Variant {
    /// Stable name used in fingerprints and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rated => "rated",
            Self::Plain => "plain",
        }
    }

    /// Encoding used for this variant's output.
    pub fn output_format(self) -> OutputFormat {
        match self {
            Self::Rated => OutputFormat::Webp,
            Self::Plain => OutputFormat::Png,
        }
    }

    /// MIME type of this variant's output.
    pub fn content_type(self) -> &'static str {
        self.output_format().content_type()
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Variant {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rated" | "a" => Ok(Self::Rated),
            "plain" | "b" => Ok(Self::Plain),
            other => Err(CardError::validation(format!("unknown variant '{other}'"))),
        }
    }
}

/// Validated card inputs.
///
/// Optional strings that are blank are stored as `None`, so an explicit empty value and an absent
/// one are the same request.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRequest {
    title: String,
    credits: Option<String>,
    poster_url: String,
    background_url: Option<String>,
    rating: Option<f64>,
}

impl CardRequest {
    /// Validate and normalize.
    pub fn new(
        title: impl Into<String>,
        credits: Option<String>,
        poster_url: impl Into<String>,
        background_url: Option<String>,
        rating: Option<f64>,
    ) -> CardResult<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(CardError::validation("title must be non-empty"));
        }
        let poster_url = poster_url.into();
        if poster_url.trim().is_empty() {
            return Err(CardError::validation("poster must be non-empty"));
        }
        if let Some(r) = rating
            && !(r.is_finite() && (0.0..=10.0).contains(&r))
        {
            return Err(CardError::validation(format!(
                "rating must be within 0..=10, got {r}"
            )));
        }
        Ok(Self {
            title,
            credits: non_blank(credits),
            poster_url,
            background_url: non_blank(background_url),
            // -0.0 would otherwise format and fingerprint as "-0".
            rating: rating.map(|r| if r == 0.0 { 0.0 } else { r }),
        })
    }

    /// Card title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Credits line, if any.
    pub fn credits(&self) -> Option<&str> {
        self.credits.as_deref()
    }

    /// Poster image URL.
    pub fn poster_url(&self) -> &str {
        &self.poster_url
    }

    /// Background image URL, if any.
    pub fn background_url(&self) -> Option<&str> {
        self.background_url.as_deref()
    }

    /// Rating in `0..=10`, if any.
    pub fn rating(&self) -> Option<f64> {
        self.rating
    }
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.trim().is_empty())
}

/// Wire shape of the rated-card JSON body.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CardRequestDef {
    title: String,
    #[serde(default)]
    credits: Option<String>,
    poster: String,
    #[serde(default)]
    background: Option<String>,
    #[serde(default)]
    vote_average: Option<f64>,
}

impl<'de> Deserialize<'de> for CardRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let def = CardRequestDef::deserialize(deserializer)?;
        CardRequest::new(
            def.title,
            def.credits,
            def.poster,
            def.background,
            def.vote_average,
        )
        .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/card/request.rs"]
mod tests;
