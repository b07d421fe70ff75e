//! The ordered, immutable set of configured documentation sources.

use std::path::PathBuf;

use llmsdoc_shared::{
    DocSource, LlmsDocError, LocationKind, Result, canonical_local_path, domain_prefix,
};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Where a source resolves to once validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedLocation {
    /// A network source, kept as configured.
    Url(String),
    /// A local source, canonicalized.
    Path(PathBuf),
}

/// A validated source with its precomputed display values.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub source: DocSource,
    /// Configured name, else the domain prefix or canonical path.
    pub display_name: String,
    /// Short name used in the server instructions.
    pub short_name: String,
    pub resolved: ResolvedLocation,
}

/// Sources in configured order. Built once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct SourceCatalog {
    entries: Vec<CatalogEntry>,
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl SourceCatalog {
    /// Validate and resolve every source.
    ///
    /// Fails when the list is empty, a location is blank, or a network
    /// location is not a parseable URL.
    pub fn new(sources: Vec<DocSource>) -> Result<Self> {
        if sources.is_empty() {
            return Err(LlmsDocError::config("No documentation sources configured"));
        }

        let entries = sources
            .into_iter()
            .enumerate()
            .map(|(index, source)| resolve_entry(index, source))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Whether any source lives on the local filesystem.
    pub fn has_local_sources(&self) -> bool {
        self.entries
            .iter()
            .any(|e| matches!(e.resolved, ResolvedLocation::Path(_)))
    }

    /// One block per source: name, then `URL:` or `Path:`, then a blank line.
    pub fn render_listing(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&entry.display_name);
            out.push('\n');
            match &entry.resolved {
                ResolvedLocation::Url(url) => {
                    out.push_str("URL: ");
                    out.push_str(url);
                }
                ResolvedLocation::Path(path) => {
                    out.push_str("Path: ");
                    out.push_str(&path.display().to_string());
                }
            }
            out.push_str("\n\n");
        }
        out
    }

    /// Short names of all sources, in configured order.
    pub fn source_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.short_name.as_str()).collect()
    }
}

fn resolve_entry(index: usize, source: DocSource) -> Result<CatalogEntry> {
    if source.location.trim().is_empty() {
        return Err(LlmsDocError::config(format!(
            "doc source #{index} has an empty llms_txt location"
        )));
    }

    let (resolved, default_name, default_short) = match source.kind() {
        LocationKind::Network => {
            let prefix = domain_prefix(&source.location)?;
            let short = prefix
                .split_once("://")
                .map_or(prefix.as_str(), |(_, rest)| rest)
                .trim_end_matches('/')
                .to_string();
            (ResolvedLocation::Url(source.location.clone()), prefix, short)
        }
        LocationKind::Local => {
            let path = canonical_local_path(&source.location)?;
            let short = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            let display = path.display().to_string();
            (ResolvedLocation::Path(path), display, short)
        }
    };

    let display_name = source.label().map_or(default_name, str::to_string);
    let short_name = source.label().map_or(default_short, str::to_string);

    Ok(CatalogEntry {
        source,
        display_name,
        short_name,
        resolved,
    })
}
