use xxhash_rust::xxh3::Xxh3;

use crate::card::request::{CardRequest, Variant};

const KEY_PREFIX: &str = "mediacard:v1";
const XXH3_SEED: u64 = 0x6d65_6469_6163_6172;

/// Canonical cache key of one card request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Stable 128-bit digest of the key, used where the key itself is too long to use verbatim.
    pub fn digest(&self) -> u128 {
        let mut h = Xxh3::with_seed(XXH3_SEED);
        h.update(self.0.as_bytes());
        h.digest128()
    }

    /// [`CacheKey::digest`] as 32 lowercase hex digits.
    pub fn digest_hex(&self) -> String {
        format!("{:032x}", self.digest())
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build the key for `request` rendered as `variant`.
///
/// Every field is written as `<len>:<value>`; absent optional fields are written empty rather
/// than skipped. The plain variant ignores ratings, so its key never includes one.
pub fn fingerprint(variant: Variant, request: &CardRequest) -> CacheKey {
    let rating = match variant {
        Variant::Rated => request.rating().map(|r| r.to_string()),
        Variant::Plain => None,
    };
    let mut key = format!("{KEY_PREFIX}:{}:", variant.as_str());
    for field in [
        Some(request.title()),
        request.credits(),
        Some(request.poster_url()),
        request.background_url(),
        rating.as_deref(),
    ] {
        push_field(&mut key, field.unwrap_or(""));
    }
    CacheKey(key)
}

fn push_field(key: &mut String, value: &str) {
    key.push_str(&value.len().to_string());
    key.push(':');
    key.push_str(value);
}

#[cfg(test)]
#[path = "../../tests/unit/cache/fingerprint.rs"]
mod tests;
