use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::foundation::error::CardResult;

/// Why a remote image could not be retrieved.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The URL did not parse or is not http(s).
    #[error("invalid asset url: {0}")]
    InvalidUrl(String),
    /// The upstream answered with a non-success status.
    #[error("asset fetch failed from {url}: {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Requested URL.
        url: String,
    },
    /// Connection, TLS, timeout or body read failure.
    #[error("asset fetch failed from {url}: {message}")]
    Transport {
        /// Requested URL.
        url: String,
        /// Underlying error text.
        message: String,
    },
    /// The body exceeded the configured limit.
    #[error("asset from {url} exceeds {limit} bytes")]
    TooLarge {
        /// Requested URL.
        url: String,
        /// Configured byte limit.
        limit: usize,
    },
}

/// Retrieves remote image bytes.
///
/// Implementations must not retry; each call resolves once.
pub trait AssetFetcher: Send + Sync {
    /// Fetch the body at `url`.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send;
}

/// Outbound HTTP settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchOptions {
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
    /// Largest accepted body.
    pub max_bytes: usize,
    /// Redirects followed before giving up.
    pub max_redirects: usize,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            max_bytes: 20 * 1024 * 1024,
            max_redirects: 5,
            user_agent: concat!("mediacard/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

/// [`AssetFetcher`] backed by a shared `reqwest` client.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
    max_bytes: usize,
}

impl HttpFetcher {
    /// Build the client from options.
    pub fn new(opts: &FetchOptions) -> CardResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(opts.timeout_secs.max(1)))
            .redirect(reqwest::redirect::Policy::limited(opts.max_redirects))
            .user_agent(opts.user_agent.as_str())
            .build()
            .context("build reqwest client")?;
        Ok(Self {
            client,
            max_bytes: opts.max_bytes,
        })
    }
}

impl AssetFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let parsed = validate_http_url(url)?;
        let transport = |e: reqwest::Error| FetchError::Transport {
            url: url.to_owned(),
            message: e.to_string(),
        };

        let mut response = self.client.get(parsed).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }
        if let Some(len) = response.content_length()
            && len > self.max_bytes as u64
        {
            return Err(FetchError::TooLarge {
                url: url.to_owned(),
                limit: self.max_bytes,
            });
        }

        let mut buffer = Vec::with_capacity(std::cmp::min(self.max_bytes, 64 * 1024));
        while let Some(chunk) = response.chunk().await.map_err(transport)? {
            if buffer.len().saturating_add(chunk.len()) > self.max_bytes {
                return Err(FetchError::TooLarge {
                    url: url.to_owned(),
                    limit: self.max_bytes,
                });
            }
            buffer.extend_from_slice(&chunk);
        }
        debug!(url = %url, size = buffer.len(), "fetched asset");
        Ok(buffer)
    }
}

fn validate_http_url(url: &str) -> Result<reqwest::Url, FetchError> {
    let parsed =
        reqwest::Url::parse(url.trim()).map_err(|_| FetchError::InvalidUrl(url.to_owned()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        _ => Err(FetchError::InvalidUrl(url.to_owned())),
    }
}

/// In-process fetcher serving canned responses, for tests and offline rendering.
///
/// Unknown URLs answer with status 404. Every call is counted.
#[derive(Debug, Default)]
pub struct StaticFetcher {
    responses: Mutex<HashMap<String, Result<Vec<u8>, FetchError>>>,
    calls: AtomicUsize,
}

impl StaticFetcher {
    /// Empty fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `bytes` for `url`.
    pub fn with_body(self, url: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(url.into(), Ok(bytes));
        self
    }

    /// Fail `url` with `err`.
    pub fn with_error(self, url: impl Into<String>, err: FetchError) -> Self {
        self.insert(url.into(), Err(err));
        self
    }

    fn insert(&self, url: String, response: Result<Vec<u8>, FetchError>) {
        self.responses
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .insert(url, response);
    }

    /// Number of `fetch` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AssetFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let responses = self.responses.lock().unwrap_or_else(|err| err.into_inner());
        responses.get(url).cloned().unwrap_or_else(|| {
            Err(FetchError::Status {
                status: 404,
                url: url.to_owned(),
            })
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fetch.rs"]
mod tests;
