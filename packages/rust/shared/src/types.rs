//! Core domain types.

use serde::{Deserialize, Serialize};

use crate::location::LocationKind;

// ---------------------------------------------------------------------------
// DocSource
// ---------------------------------------------------------------------------

/// One configured documentation entry.
///
/// `location` points at an index document (`llms.txt`), either over the
/// network or on the local filesystem. Whether it is one or the other is
/// always derived from the string itself via [`DocSource::kind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocSource {
    /// Optional human-readable label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// URL or filesystem path of the index document.
    #[serde(rename = "llms_txt", alias = "location")]
    pub location: String,

    /// Optional free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl DocSource {
    /// A source with only a location.
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            name: None,
            location: location.into(),
            description: None,
        }
    }

    /// Attach a display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Network or local, derived from the location prefix.
    pub fn kind(&self) -> LocationKind {
        LocationKind::of(&self.location)
    }

    /// The configured name, if any, ignoring empty values.
    pub fn label(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }
}
