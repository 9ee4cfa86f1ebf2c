//! Image acquisition: fetchers and the proxy retry policy.
//!
//! Fetchers return raw bytes; decoding happens in [`super::sources`]. A
//! fetch that is refused with [`ContentError::PixelReadDenied`] is retried
//! exactly once through the configured proxy prefix.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::{debug, info, warn};

use crate::error::{ContentError, ContentResult};

/// Source of raw image bytes, allowing mock injection for tests.
#[allow(async_fn_in_trait)]
pub trait ImageFetcher {
    /// Fetches the resource at `url`.
    async fn fetch(&self, url: &str) -> ContentResult<Vec<u8>>;
}

/// Builds the proxied URL for a retry.
#[must_use]
pub fn proxied_url(proxy: &str, url: &str) -> String {
    format!("{}{}", proxy, urlencoding::encode(url))
}

/// Fetches `url`, retrying once through `proxy` if the first attempt is
/// denied pixel access.
///
/// A denial on the retry (or with no proxy configured) becomes
/// [`ContentError::Unavailable`].
pub async fn acquire_with_proxy<F: ImageFetcher + ?Sized>(
    fetcher: &F,
    url: &str,
    proxy: Option<&str>,
) -> ContentResult<Vec<u8>> {
    match fetcher.fetch(url).await {
        Err(ContentError::PixelReadDenied { .. }) => {
            let Some(proxy) = proxy else {
                warn!("Pixel read denied for {} and no proxy configured", url);
                return Err(ContentError::unavailable(format!(
                    "pixel read denied for {url}"
                )));
            };

            let retry = proxied_url(proxy, url);
            info!("Pixel read denied for {}, retrying via proxy", url);
            match fetcher.fetch(&retry).await {
                Err(ContentError::PixelReadDenied { .. }) => Err(ContentError::unavailable(
                    format!("pixel read denied for {url} (after proxy retry)"),
                )),
                other => other,
            }
        }
        other => other,
    }
}

/// Reads images from the local filesystem (`file://` URLs or bare paths).
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFetcher;

impl FileFetcher {
    fn path_for(url: &str) -> PathBuf {
        PathBuf::from(url.strip_prefix("file://").unwrap_or(url))
    }
}

impl ImageFetcher for FileFetcher {
    async fn fetch(&self, url: &str) -> ContentResult<Vec<u8>> {
        let path = Self::path_for(url);
        debug!("Reading image from {}", path.display());
        tokio::fs::read(&path)
            .await
            .map_err(|e| ContentError::unavailable(format!("{}: {e}", path.display())))
    }
}

/// Fetches images over HTTP(S).
///
/// 401 and 403 responses are reported as pixel-read denials so the caller
/// can retry through the proxy.
#[cfg(feature = "fetch")]
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

#[cfg(feature = "fetch")]
impl HttpFetcher {
    /// Creates a fetcher with a default client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(feature = "fetch")]
impl ImageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> ContentResult<Vec<u8>> {
        use reqwest::StatusCode;

        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ContentError::unavailable(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ContentError::PixelReadDenied {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(ContentError::unavailable(format!("HTTP {status} for {url}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ContentError::unavailable(format!("reading body of {url}: {e}")))?;
        Ok(bytes.to_vec())
    }
}

/// Dispatches by URL scheme: HTTP(S) to the network, everything else to disk.
#[derive(Debug, Clone, Default)]
pub struct DefaultFetcher {
    #[cfg(feature = "fetch")]
    http: HttpFetcher,
    file: FileFetcher,
}

impl DefaultFetcher {
    /// Creates the default fetcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn is_remote(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

impl ImageFetcher for DefaultFetcher {
    async fn fetch(&self, url: &str) -> ContentResult<Vec<u8>> {
        if is_remote(url) {
            #[cfg(feature = "fetch")]
            return self.http.fetch(url).await;
            #[cfg(not(feature = "fetch"))]
            return Err(ContentError::unavailable(format!(
                "network fetching disabled (built without `fetch`): {url}"
            )));
        }
        self.file.fetch(url).await
    }
}

/// In-memory fetcher for tests and demos.
///
/// URLs registered with [`MockFetcher::deny`] answer with a pixel-read
/// denial; unknown URLs are unavailable. Every requested URL is recorded.
#[derive(Debug, Default)]
pub struct MockFetcher {
    responses: HashMap<String, Vec<u8>>,
    denied: HashSet<String>,
    requests: Mutex<Vec<String>>,
}

impl MockFetcher {
    /// Creates an empty mock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `bytes` for `url`.
    #[must_use]
    pub fn with_response(mut self, url: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.responses.insert(url.into(), bytes);
        self
    }

    /// Denies pixel reads for `url`.
    #[must_use]
    pub fn deny(mut self, url: impl Into<String>) -> Self {
        self.denied.insert(url.into());
        self
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl ImageFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> ContentResult<Vec<u8>> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }

        if self.denied.contains(url) {
            return Err(ContentError::PixelReadDenied {
                url: url.to_string(),
            });
        }
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| ContentError::unavailable(format!("no mock response for {url}")))
    }
}
