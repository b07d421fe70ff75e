//! Shared types, error model, location classification, and configuration
//! for llmsdoc.
//!
//! This crate is the foundation depended on by all other llmsdoc crates.
//! It provides:
//! - [`LlmsDocError`] and [`FetchError`]: the unified error types
//! - [`DocSource`]: one configured documentation entry
//! - [`location`]: network/local classification and canonical forms
//! - Configuration ([`ServerConfig`], [`ConfigInputs`], config loading)

pub mod config;
pub mod error;
pub mod location;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    ConfigFormat, ConfigInputs, DEFAULT_TIMEOUT_SECS, ServerConfig, load_config,
    load_sources_file, sources_from_urls,
};
pub use error::{FetchError, LlmsDocError, Result};
pub use location::{LocationKind, canonical_local_path, domain_prefix, is_network_location};
pub use types::DocSource;
