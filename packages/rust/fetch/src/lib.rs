//! Retrieval of documentation from the network or the local filesystem.
//!
//! Network fetches run under a single end-to-end deadline that covers every
//! hop of a redirect chain. When redirect following is enabled, protocol
//! redirects are handled by the HTTP client and HTML meta-refresh tags are
//! followed here, up to a fixed number of hops.

mod refresh;

use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use llmsdoc_shared::{
    FetchError, LlmsDocError, Result, ServerConfig, canonical_local_path, is_network_location,
};
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

pub use refresh::find_meta_refresh;

/// Maximum number of protocol-level redirects the client follows.
const MAX_HTTP_REDIRECTS: usize = 10;

/// Default cap on meta-refresh hops.
pub const DEFAULT_MAX_REFRESH_HOPS: usize = 10;

/// Default end-to-end timeout for one fetch.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// User-Agent string for fetch requests.
const USER_AGENT: &str = concat!("llmsdoc/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Configuration for a [`ContentFetcher`].
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Deadline for the whole fetch, redirect hops included.
    pub timeout: Duration,
    /// Follow protocol redirects and meta-refresh tags.
    pub follow_redirects: bool,
    /// Maximum number of meta-refresh hops before giving up.
    pub max_refresh_hops: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            follow_redirects: false,
            max_refresh_hops: DEFAULT_MAX_REFRESH_HOPS,
        }
    }
}

impl TryFrom<&ServerConfig> for FetchOptions {
    type Error = LlmsDocError;

    fn try_from(config: &ServerConfig) -> Result<Self> {
        Ok(Self {
            timeout: config.timeout()?,
            follow_redirects: config.follow_redirects,
            ..Self::default()
        })
    }
}

/// Raw content retrieved by one fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    /// Retrieved text, not yet converted.
    pub text: String,
    /// Where the text finally came from: the last URL of the redirect chain,
    /// or `file://` plus the canonical path.
    pub final_url: String,
    /// Status of the first response; always 200 for local files.
    pub status_code: u16,
}

// ---------------------------------------------------------------------------
// ContentFetcher
// ---------------------------------------------------------------------------

/// Fetches documents over HTTP(S) or from disk. No retries, no caching.
#[derive(Debug, Clone)]
pub struct ContentFetcher {
    client: Client,
    opts: FetchOptions,
}

impl ContentFetcher {
    /// Build a fetcher and its HTTP client.
    pub fn new(opts: FetchOptions) -> Result<Self> {
        let redirect = if opts.follow_redirects {
            reqwest::redirect::Policy::limited(MAX_HTTP_REDIRECTS)
        } else {
            reqwest::redirect::Policy::none()
        };

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(redirect)
            .build()
            .map_err(|e| {
                LlmsDocError::Transport(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self { client, opts })
    }

    /// Fetch a network URL or a local path, depending on its prefix.
    pub async fn fetch(&self, location: &str) -> Result<FetchResult> {
        if is_network_location(location) {
            Ok(self.fetch_remote(location).await?)
        } else {
            self.fetch_local(location).await
        }
    }

    /// Fetch a URL, following meta-refresh hops when enabled.
    #[instrument(skip(self), fields(timeout = ?self.opts.timeout))]
    pub async fn fetch_remote(&self, url: &str) -> std::result::Result<FetchResult, FetchError> {
        tokio::time::timeout(self.opts.timeout, self.follow_chain(url))
            .await
            .map_err(|_| FetchError::Timeout(self.opts.timeout))?
    }

    /// Read a local file given as a path or `file://` URL.
    pub async fn fetch_local(&self, location: &str) -> Result<FetchResult> {
        let path = canonical_local_path(location)?;
        Ok(self.read_local(&path).await?)
    }

    /// Read an already canonicalized local path as UTF-8 text.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub async fn read_local(&self, path: &Path) -> std::result::Result<FetchResult, FetchError> {
        let text = tokio::fs::read_to_string(path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => FetchError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => FetchError::ReadError {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
        })?;

        debug!(bytes = text.len(), "read local file");

        Ok(FetchResult {
            text,
            final_url: format!("file://{}", path.display()),
            status_code: 200,
        })
    }

    async fn follow_chain(&self, url: &str) -> std::result::Result<FetchResult, FetchError> {
        let mut result = self.get_once(url).await?;
        if !self.opts.follow_redirects {
            return Ok(result);
        }

        let mut hops = 0;
        while let Some(target) = find_meta_refresh(&result.text) {
            if hops >= self.opts.max_refresh_hops {
                return Err(FetchError::TooManyRedirects(self.opts.max_refresh_hops));
            }
            hops += 1;

            let next = Url::parse(&result.final_url)
                .and_then(|base| base.join(&target))
                .map_err(|_| FetchError::InvalidRedirect {
                    url: result.final_url.clone(),
                    target: target.clone(),
                })?;

            debug!(from = %result.final_url, to = %next, hops, "following meta-refresh");

            let hop = self.get_once(next.as_str()).await?;
            result.text = hop.text;
            result.final_url = hop.final_url;
        }

        Ok(result)
    }

    /// One GET request: status check, then the full body as text.
    async fn get_once(&self, url: &str) -> std::result::Result<FetchResult, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| request_error(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let final_url = response.url().to_string();
        let text = response
            .text()
            .await
            .map_err(|e| request_error(url, &e))?;

        debug!(%final_url, status = status.as_u16(), bytes = text.len(), "fetched");

        Ok(FetchResult {
            text,
            final_url,
            status_code: status.as_u16(),
        })
    }
}

fn request_error(url: &str, err: &reqwest::Error) -> FetchError {
    FetchError::Transport {
        url: url.to_string(),
        message: err.to_string(),
    }
}
