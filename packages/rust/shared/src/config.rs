//! Server configuration for llmsdoc.
//!
//! Documentation sources come from YAML/JSON source lists, a TOML settings
//! file, and `--urls` entries on the command line, merged in that order.
//! CLI flags override TOML values, which override defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LlmsDocError, Result};
use crate::location::is_network_location;
use crate::types::DocSource;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: f64 = 10.0;

// ---------------------------------------------------------------------------
// File formats
// ---------------------------------------------------------------------------

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// A top-level YAML list of sources.
    Yaml,
    /// A top-level JSON array of sources.
    Json,
    /// A TOML settings file with a `[[sources]]` array of tables.
    Toml,
}

impl ConfigFormat {
    fn name(self) -> &'static str {
        match self {
            Self::Yaml => "YAML",
            Self::Json => "JSON",
            Self::Toml => "TOML",
        }
    }
}

/// A source entry as written in a config file, before validation.
#[derive(Debug, Deserialize)]
struct RawDocSource {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, alias = "location")]
    llms_txt: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// TOML settings file schema.
#[derive(Debug, Default, Deserialize)]
struct TomlFile {
    #[serde(default)]
    follow_redirects: Option<bool>,
    #[serde(default)]
    timeout_secs: Option<f64>,
    #[serde(default)]
    allowed_domains: Option<Vec<String>>,
    #[serde(default)]
    sources: Vec<RawDocSource>,
}

/// Settings read from a TOML file, applied beneath CLI flags.
#[derive(Debug, Default)]
struct FileSettings {
    follow_redirects: Option<bool>,
    timeout_secs: Option<f64>,
    allowed_domains: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Runtime config
// ---------------------------------------------------------------------------

/// Everything that feeds configuration, as collected by the CLI.
#[derive(Debug, Clone, Default)]
pub struct ConfigInputs {
    /// YAML source list.
    pub yaml: Option<PathBuf>,
    /// JSON source list.
    pub json: Option<PathBuf>,
    /// TOML settings file.
    pub toml: Option<PathBuf>,
    /// `url_or_path` or `name:url_or_path` entries.
    pub urls: Vec<String>,
    /// Follow HTTP and meta-refresh redirects.
    pub follow_redirects: bool,
    /// Request timeout in seconds.
    pub timeout_secs: Option<f64>,
    /// Extra allowed domain prefixes, or `*`.
    pub allowed_domains: Vec<String>,
}

/// Validated, immutable server configuration.
#[derive(Debug, Clone, Serialize)]
pub struct ServerConfig {
    /// Whether redirects (protocol-level and meta-refresh) are followed.
    pub follow_redirects: bool,
    /// End-to-end timeout for one remote fetch, in seconds.
    pub timeout_secs: f64,
    /// Extra allowed domains. Empty means only the sources' own domains.
    pub allowed_domains: Vec<String>,
    /// Documentation sources in configured order.
    pub sources: Vec<DocSource>,
}

impl ServerConfig {
    /// Build a config from sources with all settings at their defaults.
    pub fn with_sources(sources: Vec<DocSource>) -> Self {
        Self {
            follow_redirects: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            allowed_domains: Vec::new(),
            sources,
        }
    }

    /// The fetch timeout as a [`Duration`].
    ///
    /// Fails for values that are not positive or do not fit a `Duration`.
    pub fn timeout(&self) -> Result<Duration> {
        timeout_duration(self.timeout_secs)
    }
}

fn timeout_duration(secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs)
        .ok()
        .filter(|d| !d.is_zero())
        .ok_or_else(|| {
            LlmsDocError::config(format!(
                "timeout must be a positive number of seconds, got {secs}"
            ))
        })
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Merge and validate all configuration inputs.
pub fn load_config(inputs: &ConfigInputs) -> Result<ServerConfig> {
    let mut sources = Vec::new();
    let mut settings = FileSettings::default();

    if let Some(path) = &inputs.yaml {
        sources.extend(load_sources_file(path, ConfigFormat::Yaml)?);
    }
    if let Some(path) = &inputs.json {
        sources.extend(load_sources_file(path, ConfigFormat::Json)?);
    }
    if let Some(path) = &inputs.toml {
        let (toml_sources, toml_settings) = load_toml_file(path)?;
        sources.extend(toml_sources);
        settings = toml_settings;
    }
    sources.extend(sources_from_urls(&inputs.urls));

    if sources.is_empty() {
        return Err(LlmsDocError::config(
            "No documentation sources configured. Use --yaml, --json, --toml, or --urls.",
        ));
    }

    let timeout_secs = inputs
        .timeout_secs
        .or(settings.timeout_secs)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    timeout_duration(timeout_secs)?;

    let allowed_domains = if inputs.allowed_domains.is_empty() {
        settings.allowed_domains.unwrap_or_default()
    } else {
        inputs.allowed_domains.clone()
    };
    let allowed_domains = allowed_domains
        .into_iter()
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .collect();

    let config = ServerConfig {
        follow_redirects: inputs.follow_redirects || settings.follow_redirects.unwrap_or(false),
        timeout_secs,
        allowed_domains,
        sources,
    };

    tracing::debug!(
        sources = config.sources.len(),
        follow_redirects = config.follow_redirects,
        timeout_secs = config.timeout_secs,
        "configuration resolved"
    );

    Ok(config)
}

/// Load a YAML or JSON list of sources (or the sources of a TOML file).
pub fn load_sources_file(path: &Path, format: ConfigFormat) -> Result<Vec<DocSource>> {
    let raw: Vec<RawDocSource> = match format {
        ConfigFormat::Yaml => serde_yaml_ng::from_str(&read_config_file(path)?)
            .map_err(|e| parse_error(path, format, e))?,
        ConfigFormat::Json => serde_json::from_str(&read_config_file(path)?)
            .map_err(|e| parse_error(path, format, e))?,
        ConfigFormat::Toml => return load_toml_file(path).map(|(sources, _)| sources),
    };

    validate_sources(raw, path)
}

fn load_toml_file(path: &Path) -> Result<(Vec<DocSource>, FileSettings)> {
    let content = read_config_file(path)?;
    let file: TomlFile =
        toml::from_str(&content).map_err(|e| parse_error(path, ConfigFormat::Toml, e))?;

    let sources = validate_sources(file.sources, path)?;
    let settings = FileSettings {
        follow_redirects: file.follow_redirects,
        timeout_secs: file.timeout_secs,
        allowed_domains: file.allowed_domains,
    };
    Ok((sources, settings))
}

fn read_config_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            LlmsDocError::config(format!("config file not found: {}", path.display()))
        }
        _ => LlmsDocError::io(path, e),
    })
}

fn parse_error(path: &Path, format: ConfigFormat, err: impl std::fmt::Display) -> LlmsDocError {
    LlmsDocError::config(format!(
        "failed to parse {} as {}: {err}",
        path.display(),
        format.name()
    ))
}

/// Reject entries without a location before they reach the core.
fn validate_sources(raw: Vec<RawDocSource>, path: &Path) -> Result<Vec<DocSource>> {
    raw.into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let location = entry
                .llms_txt
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .ok_or_else(|| {
                    LlmsDocError::config(format!(
                        "{}: doc source #{index} must have a llms_txt field",
                        path.display()
                    ))
                })?;
            Ok(DocSource {
                name: entry.name,
                location,
                description: entry.description,
            })
        })
        .collect()
}

/// Build sources from `url_or_path` / `name:url_or_path` entries.
///
/// The `name:` split only applies when the entry is not itself an
/// `http:`/`https:` URL. Blank entries are skipped.
pub fn sources_from_urls(entries: &[String]) -> Vec<DocSource> {
    entries
        .iter()
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once(':') {
            Some((name, location)) if !is_network_location(entry) => DocSource {
                name: Some(name.to_string()),
                location: location.to_string(),
                description: None,
            },
            _ => DocSource::new(entry),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("create temp file");
        file.write_all(content.as_bytes()).expect("write temp file");
        file
    }

    #[test]
    fn loads_yaml_sources() {
        let file = write_temp(
            ".yaml",
            r#"
- name: LangGraph
  llms_txt: https://langchain-ai.github.io/langgraph/llms.txt
  description: Graph framework
- llms_txt: ./docs/llms.txt
"#,
        );
        let sources = load_sources_file(file.path(), ConfigFormat::Yaml).unwrap();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].name.as_deref(), Some("LangGraph"));
        assert_eq!(sources[0].description.as_deref(), Some("Graph framework"));
        assert_eq!(sources[1].location, "./docs/llms.txt");
    }

    #[test]
    fn loads_json_sources() {
        let file = write_temp(
            ".json",
            r#"[{"name": "A", "llms_txt": "https://a.dev/llms.txt"}]"#,
        );
        let sources = load_sources_file(file.path(), ConfigFormat::Json).unwrap();
        assert_eq!(sources, vec![DocSource::new("https://a.dev/llms.txt").with_name("A")]);
    }

    #[test]
    fn rejects_entry_without_location() {
        let file = write_temp(".json", r#"[{"llms_txt": "https://a.dev/"}, {"name": "broken"}]"#);
        let err = load_sources_file(file.path(), ConfigFormat::Json).unwrap_err();
        assert!(err.to_string().contains("#1 must have a llms_txt field"), "{err}");
    }

    #[test]
    fn rejects_non_list_document() {
        let file = write_temp(".yaml", "name: not-a-list\n");
        let err = load_sources_file(file.path(), ConfigFormat::Yaml).unwrap_err();
        assert!(err.to_string().contains("failed to parse"), "{err}");
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load_sources_file(Path::new("/nonexistent/llmsdoc.yaml"), ConfigFormat::Yaml)
            .unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn toml_file_carries_settings() {
        let file = write_temp(
            ".toml",
            r#"
follow_redirects = true
timeout_secs = 2.5
allowed_domains = ["https://docs.rs/"]

[[sources]]
name = "Tokio"
llms_txt = "https://tokio.rs/llms.txt"
"#,
        );
        let config = load_config(&ConfigInputs {
            toml: Some(file.path().to_path_buf()),
            ..Default::default()
        })
        .unwrap();

        assert!(config.follow_redirects);
        assert_eq!(config.timeout().unwrap(), Duration::from_millis(2500));
        assert_eq!(config.allowed_domains, vec!["https://docs.rs/".to_string()]);
        assert_eq!(config.sources[0].label(), Some("Tokio"));
    }

    #[test]
    fn cli_values_override_toml() {
        let file = write_temp(
            ".toml",
            "timeout_secs = 30.0\nallowed_domains = [\"https://a.dev/\"]\n\n[[sources]]\nllms_txt = \"https://a.dev/llms.txt\"\n",
        );
        let config = load_config(&ConfigInputs {
            toml: Some(file.path().to_path_buf()),
            timeout_secs: Some(3.0),
            allowed_domains: vec!["*".into()],
            ..Default::default()
        })
        .unwrap();

        assert_eq!(config.timeout_secs, 3.0);
        assert_eq!(config.allowed_domains, vec!["*".to_string()]);
    }

    #[test]
    fn merge_preserves_order_across_inputs() {
        let yaml = write_temp(".yaml", "- llms_txt: https://first.dev/llms.txt\n");
        let json = write_temp(".json", r#"[{"llms_txt": "https://second.dev/llms.txt"}]"#);
        let config = load_config(&ConfigInputs {
            yaml: Some(yaml.path().to_path_buf()),
            json: Some(json.path().to_path_buf()),
            urls: vec!["Third:https://third.dev/llms.txt".into()],
            ..Default::default()
        })
        .unwrap();

        let locations: Vec<&str> = config.sources.iter().map(|s| s.location.as_str()).collect();
        assert_eq!(
            locations,
            ["https://first.dev/llms.txt", "https://second.dev/llms.txt", "https://third.dev/llms.txt"]
        );
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = load_config(&ConfigInputs {
            urls: vec!["https://a.dev/llms.txt".into()],
            ..Default::default()
        })
        .unwrap();

        assert!(!config.follow_redirects);
        assert_eq!(config.timeout().unwrap(), Duration::from_secs(10));
        assert!(config.allowed_domains.is_empty());
    }

    #[test]
    fn no_sources_is_fatal() {
        let err = load_config(&ConfigInputs::default()).unwrap_err();
        assert!(err.to_string().contains("No documentation sources configured"));
    }

    #[test]
    fn non_positive_timeout_is_rejected() {
        let err = load_config(&ConfigInputs {
            urls: vec!["https://a.dev/".into()],
            timeout_secs: Some(0.0),
            ..Default::default()
        })
        .unwrap_err();
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn oversized_timeout_is_rejected() {
        for secs in [1e30, f64::INFINITY, f64::NAN, -1.0] {
            let err = load_config(&ConfigInputs {
                urls: vec!["https://a.dev/llms.txt".into()],
                timeout_secs: Some(secs),
                ..Default::default()
            })
            .unwrap_err();
            assert!(err.to_string().contains("timeout"), "{secs}: {err}");
        }

        let mut config = ServerConfig::with_sources(vec![DocSource::new("https://a.dev/llms.txt")]);
        config.timeout_secs = 1e30;
        assert!(config.timeout().is_err());
    }

    #[test]
    fn url_entries_split_names() {
        let sources = sources_from_urls(&[
            "LangGraph:https://langchain-ai.github.io/langgraph/llms.txt".into(),
            "https://example.com/llms.txt".into(),
            "  ".into(),
            "Local:./docs/llms.txt".into(),
            "./plain/llms.txt".into(),
        ]);

        assert_eq!(sources.len(), 4);
        assert_eq!(sources[0].label(), Some("LangGraph"));
        assert_eq!(sources[0].location, "https://langchain-ai.github.io/langgraph/llms.txt");
        assert_eq!(sources[1].label(), None);
        assert_eq!(sources[1].location, "https://example.com/llms.txt");
        assert_eq!(sources[2].label(), Some("Local"));
        assert_eq!(sources[2].location, "./docs/llms.txt");
        assert_eq!(sources[3].location, "./plain/llms.txt");
    }

    #[test]
    fn resolved_config_serializes_to_toml() {
        let config = ServerConfig::with_sources(vec![DocSource::new("https://a.dev/llms.txt")]);
        let rendered = toml::to_string_pretty(&config).unwrap();
        assert!(rendered.contains("timeout_secs = 10.0"));
        assert!(rendered.contains("[[sources]]"));
        assert!(rendered.contains("llms_txt = \"https://a.dev/llms.txt\""));
    }
}
