use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use crate::cache::fingerprint::CacheKey;
use crate::foundation::error::{CardError, CardResult};

/// Encoded card bytes with their expiry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheEntry {
    /// Request fingerprint.
    pub key: CacheKey,
    /// Encoded image bytes.
    pub payload: Vec<u8>,
    /// Instant after which the entry is a miss.
    pub expires_at: SystemTime,
}

impl CacheEntry {
    /// Whether the entry is expired at `now`.
    pub fn is_expired(&self, now: SystemTime) -> bool {
        now >= self.expires_at
    }
}

/// Key/value store for encoded cards.
///
/// Errors are reported, not swallowed; callers decide whether a failure is fatal.
pub trait CardCache: Send + Sync + std::fmt::Debug {
    /// Bytes stored under `key`, or `None` when missing or expired.
    fn get(&self, key: &CacheKey) -> CardResult<Option<Vec<u8>>>;

    /// Store `bytes` under `key` for `ttl`.
    fn set(&self, key: &CacheKey, bytes: &[u8], ttl: Duration) -> CardResult<()>;
}

impl<C: CardCache + ?Sized> CardCache for Box<C> {
    fn get(&self, key: &CacheKey) -> CardResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&self, key: &CacheKey, bytes: &[u8], ttl: Duration) -> CardResult<()> {
        (**self).set(key, bytes, ttl)
    }
}

impl<C: CardCache + ?Sized> CardCache for Arc<C> {
    fn get(&self, key: &CacheKey) -> CardResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&self, key: &CacheKey, bytes: &[u8], ttl: Duration) -> CardResult<()> {
        (**self).set(key, bytes, ttl)
    }
}

/// Cache that never stores anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCache;

impl CardCache for NoCache {
    fn get(&self, _key: &CacheKey) -> CardResult<Option<Vec<u8>>> {
        Ok(None)
    }

    fn set(&self, _key: &CacheKey, _bytes: &[u8], _ttl: Duration) -> CardResult<()> {
        Ok(())
    }
}

/// In-process cache bounded by entry count.
///
/// When full, expired entries are dropped first, then the entry closest to expiry.
#[derive(Debug)]
pub struct MemoryCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    max_entries: usize,
}

impl MemoryCache {
    /// Empty cache holding at most `max_entries` (minimum 1).
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            max_entries: max_entries.max(1),
        }
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|m| m.len()).unwrap_or(0)
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> CardResult<std::sync::MutexGuard<'_, HashMap<CacheKey, CacheEntry>>> {
        self.entries
            .lock()
            .map_err(|_| CardError::cache("memory cache mutex poisoned"))
    }
}

impl CardCache for MemoryCache {
    fn get(&self, key: &CacheKey) -> CardResult<Option<Vec<u8>>> {
        let mut map = self.lock()?;
        match map.get(key) {
            Some(e) if e.is_expired(SystemTime::now()) => {
                map.remove(key);
                Ok(None)
            }
            Some(e) => Ok(Some(e.payload.clone())),
            None => Ok(None),
        }
    }

    fn set(&self, key: &CacheKey, bytes: &[u8], ttl: Duration) -> CardResult<()> {
        let now = SystemTime::now();
        let mut map = self.lock()?;
        if !map.contains_key(key) && map.len() >= self.max_entries {
            map.retain(|_, e| !e.is_expired(now));
            if map.len() >= self.max_entries
                && let Some(victim) = map
                    .values()
                    .min_by_key(|e| e.expires_at)
                    .map(|e| e.key.clone())
            {
                map.remove(&victim);
            }
        }
        map.insert(
            key.clone(),
            CacheEntry {
                key: key.clone(),
                payload: bytes.to_vec(),
                expires_at: now + ttl,
            },
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cache/store.rs"]
mod tests;
