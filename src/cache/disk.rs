use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::Context;

use crate::cache::fingerprint::CacheKey;
use crate::cache::store::CardCache;
use crate::foundation::error::{CardError, CardResult};

const EXT: &str = "card";

static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// One file per key under a directory.
///
/// File layout: expiry as unix seconds, a newline, the full key, a newline, then the payload.
/// The file name is the key's 128-bit digest; the stored key guards against digest collisions.
#[derive(Clone, Debug)]
pub struct DiskCache {
    dir: PathBuf,
}

impl DiskCache {
    /// Open (and create if needed) a cache rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> CardResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("create cache dir {}", dir.display()))?;
        Ok(Self { dir })
    }

    /// Cache directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(format!("{}.{EXT}", key.digest_hex()))
    }

    /// Unique per write, so concurrent writers of one key never share a temp file.
    fn tmp_path_for(&self, key: &CacheKey) -> PathBuf {
        let seq = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
        self.dir.join(format!(
            "{}.{EXT}.{}-{seq}.tmp",
            key.digest_hex(),
            std::process::id()
        ))
    }

    /// Delete every expired or unreadable entry. Returns how many files were removed.
    #[tracing::instrument(level = "debug", skip(self), fields(dir = %self.dir.display()))]
    pub fn prune(&self) -> CardResult<usize> {
        let now = unix_secs(SystemTime::now());
        let mut removed = 0usize;
        let rd = std::fs::read_dir(&self.dir)
            .with_context(|| format!("read cache dir {}", self.dir.display()))?;
        for entry in rd {
            let path = entry.context("read cache dir entry")?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXT) {
                continue;
            }
            let keep = std::fs::read(&path)
                .ok()
                .and_then(|bytes| parse_entry(&bytes).map(|e| e.expires_at > now))
                .unwrap_or(false);
            if !keep {
                match std::fs::remove_file(&path) {
                    Ok(()) => removed += 1,
                    Err(e) if e.kind() == ErrorKind::NotFound => {}
                    Err(e) => {
                        return Err(anyhow::Error::new(e)
                            .context(format!("remove {}", path.display()))
                            .into());
                    }
                }
            }
        }
        tracing::debug!(removed, "pruned disk cache");
        Ok(removed)
    }
}

struct ParsedEntry<'a> {
    expires_at: u64,
    key: &'a str,
    payload: &'a [u8],
}

fn parse_entry(bytes: &[u8]) -> Option<ParsedEntry<'_>> {
    let nl1 = bytes.iter().position(|b| *b == b'\n')?;
    let expires_at = std::str::from_utf8(&bytes[..nl1]).ok()?.parse().ok()?;
    let rest = &bytes[nl1 + 1..];
    let nl2 = rest.iter().position(|b| *b == b'\n')?;
    let key = std::str::from_utf8(&rest[..nl2]).ok()?;
    Some(ParsedEntry {
        expires_at,
        key,
        payload: &rest[nl2 + 1..],
    })
}

fn unix_secs(t: SystemTime) -> u64 {
    t.duration_since(UNIX_EPOCH).map_or(0, |d| d.as_secs())
}

impl CardCache for DiskCache {
    fn get(&self, key: &CacheKey) -> CardResult<Option<Vec<u8>>> {
        let path = self.path_for(key);
        let bytes = match std::fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(CardError::cache(format!("read {}: {e}", path.display())));
            }
        };
        let Some(entry) = parse_entry(&bytes) else {
            return Err(CardError::cache(format!(
                "corrupt cache entry {}",
                path.display()
            )));
        };
        if entry.key != key.as_str() || entry.expires_at <= unix_secs(SystemTime::now()) {
            return Ok(None);
        }
        Ok(Some(entry.payload.to_vec()))
    }

    fn set(&self, key: &CacheKey, bytes: &[u8], ttl: Duration) -> CardResult<()> {
        let expires_at = unix_secs(SystemTime::now() + ttl);
        let mut out = Vec::with_capacity(bytes.len() + key.as_str().len() + 24);
        out.extend_from_slice(expires_at.to_string().as_bytes());
        out.push(b'\n');
        out.extend_from_slice(key.as_str().as_bytes());
        out.push(b'\n');
        out.extend_from_slice(bytes);

        let path = self.path_for(key);
        let tmp = self.tmp_path_for(key);
        let written = std::fs::write(&tmp, &out)
            .map_err(|e| CardError::cache(format!("write {}: {e}", tmp.display())))
            .and_then(|()| {
                std::fs::rename(&tmp, &path)
                    .map_err(|e| CardError::cache(format!("rename {}: {e}", path.display())))
            });
        if written.is_err() {
            let _ = std::fs::remove_file(&tmp);
        }
        written
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cache/disk.rs"]
mod tests;
