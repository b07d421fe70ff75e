//! Documentation retrieval for llmsdoc.
//!
//! Ties the pieces together:
//! - [`SourceCatalog`] holds the configured sources in order
//! - [`AllowListRegistry`] decides which domains and local files may be read
//! - [`DocRetrievalService`] implements `list_doc_sources` and `fetch_docs`
//! - [`instructions`] holds the tool names and descriptive text

pub mod allowlist;
pub mod catalog;
pub mod instructions;
pub mod service;

pub use allowlist::{AllowListRegistry, WILDCARD};
pub use catalog::{CatalogEntry, ResolvedLocation, SourceCatalog};
pub use instructions::{
    FETCH_DOCS, LIST_DOC_SOURCES, LIST_DOC_SOURCES_DESCRIPTION, fetch_docs_description,
    server_instructions,
};
pub use service::{DocRetrievalService, ToolOutcome};
