//! The two tool operations: listing sources and fetching documents.
//!
//! Only a missing `url` parameter is reported as an `Err`. Every other
//! failure (denial, read or fetch error, anything unexpected) comes back as
//! an `Ok` [`ToolOutcome`] with `is_error` set.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::PathBuf;

use llmsdoc_fetch::{ContentFetcher, FetchOptions};
use llmsdoc_shared::{
    LlmsDocError, Result, ServerConfig, canonical_local_path, is_network_location,
};
use tracing::{info, instrument, warn};
use url::Url;

use crate::allowlist::AllowListRegistry;
use crate::catalog::SourceCatalog;

// ---------------------------------------------------------------------------
// ToolOutcome
// ---------------------------------------------------------------------------

/// Text payload of a completed tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutcome {
    pub text: String,
    /// Set when the payload describes a failure.
    pub is_error: bool,
}

impl ToolOutcome {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

// ---------------------------------------------------------------------------
// DocRetrievalService
// ---------------------------------------------------------------------------

/// Immutable after construction; safe to share across concurrent requests.
#[derive(Debug)]
pub struct DocRetrievalService {
    catalog: SourceCatalog,
    allow_list: AllowListRegistry,
    fetcher: ContentFetcher,
}

impl DocRetrievalService {
    /// Build the catalog, allow-list and fetcher from a validated config.
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let catalog = SourceCatalog::new(config.sources.clone())?;
        let allow_list = AllowListRegistry::new(&config.sources, &config.allowed_domains)?;
        let fetcher = ContentFetcher::new(FetchOptions::try_from(config)?)?;

        info!(
            sources = catalog.entries().len(),
            allow_all_domains = allow_list.allows_all_domains(),
            follow_redirects = config.follow_redirects,
            timeout_secs = config.timeout_secs,
            "documentation service ready"
        );

        Ok(Self {
            catalog,
            allow_list,
            fetcher,
        })
    }

    pub fn catalog(&self) -> &SourceCatalog {
        &self.catalog
    }

    /// Text listing of every configured source, in configured order.
    pub fn list_sources(&self) -> ToolOutcome {
        ToolOutcome::success(self.catalog.render_listing())
    }

    /// Fetch a document by URL, local path, or `file://` URL.
    ///
    /// Returns `Err` only for an absent or empty `url`.
    #[instrument(skip(self))]
    pub async fn fetch_docs(&self, url: Option<&str>) -> Result<ToolOutcome> {
        let raw = url
            .filter(|u| !u.is_empty())
            .ok_or(LlmsDocError::MissingParameter("url"))?;

        let location = raw.trim();
        match self.retrieve(location).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                warn!(error = %e, "unexpected failure during fetch_docs");
                Ok(ToolOutcome::error(format!("Unexpected error: {e}")))
            }
        }
    }

    async fn retrieve(&self, location: &str) -> Result<ToolOutcome> {
        if is_network_location(location) {
            self.retrieve_remote(location).await
        } else {
            let path = canonical_local_path(location)?;
            self.retrieve_local(path).await
        }
    }

    async fn retrieve_local(&self, path: PathBuf) -> Result<ToolOutcome> {
        if !self.allow_list.is_local_path_allowed(&path) {
            warn!(path = %path.display(), "local path denied");
            let allowed = self
                .allow_list
                .allowed_local_paths()
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            return Ok(ToolOutcome::error(format!(
                "Error: Local file not allowed: {}. Allowed files: {allowed}",
                path.display()
            )));
        }

        match self.fetcher.read_local(&path).await {
            Ok(result) => Ok(ToolOutcome::success(convert(&result.text, None)?)),
            Err(e) => Ok(ToolOutcome::error(format!("Error reading local file: {e}"))),
        }
    }

    async fn retrieve_remote(&self, url: &str) -> Result<ToolOutcome> {
        if !self.allow_list.is_domain_allowed(url) {
            warn!(url, "domain denied");
            return Ok(ToolOutcome::error(format!(
                "Error: URL not allowed: {url}. Must start with one of the following domains: {}",
                self.allow_list.allowed_domains().join(", ")
            )));
        }

        match self.fetcher.fetch_remote(url).await {
            Ok(result) => {
                let base = Url::parse(&result.final_url).ok();
                Ok(ToolOutcome::success(convert(&result.text, base.as_ref())?))
            }
            Err(e) => {
                warn!(url, error = %e, "fetch failed");
                Ok(ToolOutcome::error(format!("Encountered an HTTP error: {e}")))
            }
        }
    }
}

/// Run the converter, turning a panic into a conversion error.
fn convert(text: &str, base: Option<&Url>) -> Result<String> {
    catch_unwind(AssertUnwindSafe(|| {
        llmsdoc_markdown::to_normalized_text_with_base(text, base)
    }))
    .map_err(|_| LlmsDocError::Conversion("converter panicked".to_string()))
}
