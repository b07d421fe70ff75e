//! Access control over which domains and local files may be retrieved.

use std::path::{Path, PathBuf};

use llmsdoc_shared::{DocSource, LocationKind, Result, canonical_local_path, domain_prefix};
use tracing::debug;
use url::Url;

/// Extra-domain entry that allows every URL.
pub const WILDCARD: &str = "*";

/// Immutable allow-list built once from the configured sources.
///
/// Network sources implicitly allow their own `scheme://host/` prefix.
/// Local sources allow exactly their own canonical path: no siblings, no
/// parent directories, nothing linked from inside the file.
#[derive(Debug, Clone, Default)]
pub struct AllowListRegistry {
    domains: Vec<String>,
    local_paths: Vec<PathBuf>,
    allow_all: bool,
}

impl AllowListRegistry {
    /// Build the registry from sources plus operator-supplied extra domains.
    ///
    /// Fails if a network source's URL cannot be parsed.
    pub fn new(sources: &[DocSource], extra_domains: &[String]) -> Result<Self> {
        let mut registry = Self::default();

        for source in sources {
            match source.kind() {
                LocationKind::Network => registry.add_domain(domain_prefix(&source.location)?),
                LocationKind::Local => {
                    let path = canonical_local_path(&source.location)?;
                    if !registry.local_paths.contains(&path) {
                        registry.local_paths.push(path);
                    }
                }
            }
        }

        for domain in extra_domains {
            if domain == WILDCARD {
                registry.allow_all = true;
            }
            registry.add_domain(domain.clone());
        }

        debug!(
            domains = registry.domains.len(),
            local_paths = registry.local_paths.len(),
            allow_all = registry.allow_all,
            "allow-list built"
        );

        Ok(registry)
    }

    fn add_domain(&mut self, domain: String) {
        if !self.domains.contains(&domain) {
            self.domains.push(domain);
        }
    }

    /// True if the wildcard is present or `url` starts with an allowed prefix.
    ///
    /// Both the raw string and its parsed serialization are checked, so a
    /// mixed-case host matches the lowercased prefix of its own source.
    pub fn is_domain_allowed(&self, url: &str) -> bool {
        if self.allow_all || self.has_prefix_of(url) {
            return true;
        }
        Url::parse(url).is_ok_and(|parsed| self.has_prefix_of(parsed.as_str()))
    }

    fn has_prefix_of(&self, url: &str) -> bool {
        self.domains.iter().any(|domain| url.starts_with(domain.as_str()))
    }

    /// True iff `path` is exactly one of the configured local sources.
    ///
    /// `path` must already be canonical (see [`canonical_local_path`]).
    pub fn is_local_path_allowed(&self, path: &Path) -> bool {
        self.local_paths.iter().any(|allowed| allowed == path)
    }

    /// Allowed domain prefixes, in the order they were added.
    pub fn allowed_domains(&self) -> &[String] {
        &self.domains
    }

    /// Allowed canonical local paths, in configured order.
    pub fn allowed_local_paths(&self) -> &[PathBuf] {
        &self.local_paths
    }

    /// Whether the wildcard entry was configured.
    pub fn allows_all_domains(&self) -> bool {
        self.allow_all
    }
}
