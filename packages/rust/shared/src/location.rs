//! Classification of source locations into network URLs and local paths.
//!
//! Everything here is pure string and path arithmetic: no DNS lookups, no
//! filesystem access. The only ambient input is the process working
//! directory, used as the base for relative paths.

use std::path::{Component, Path, PathBuf};

use url::Url;

use crate::error::{LlmsDocError, Result};

/// Prefix marking a `file://` URL.
const FILE_SCHEME: &str = "file://";

/// Where a location string points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationKind {
    /// `http:` or `https:` URL.
    Network,
    /// Filesystem path, possibly `file://`-prefixed.
    Local,
}

impl LocationKind {
    /// Classify a location string by its prefix.
    pub fn of(location: &str) -> Self {
        if is_network_location(location) {
            Self::Network
        } else {
            Self::Local
        }
    }
}

/// True iff `s` begins with `http:` or `https:`.
pub fn is_network_location(s: &str) -> bool {
    s.starts_with("http:") || s.starts_with("https:")
}

/// Resolve a local path or `file://` URL to a canonical absolute path.
///
/// Relative paths are joined onto the current working directory and `.` /
/// `..` segments are folded lexically. Symlinks are not followed and the
/// target need not exist, so the result is stable for equality checks.
pub fn canonical_local_path(s: &str) -> Result<PathBuf> {
    let raw = s.strip_prefix(FILE_SCHEME).unwrap_or(s);
    let path = Path::new(raw);

    if path.is_absolute() {
        return Ok(normalize_lexically(path));
    }

    let cwd = std::env::current_dir()
        .map_err(|e| LlmsDocError::io(PathBuf::from("."), e))?;
    Ok(normalize_lexically(&cwd.join(path)))
}

/// Canonical `scheme://host[:port]/` prefix of a URL.
///
/// Path, query and fragment are discarded. Default ports are omitted.
pub fn domain_prefix(url: &str) -> Result<String> {
    let parsed = Url::parse(url).map_err(|_| LlmsDocError::invalid_url(url))?;
    let host = parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| LlmsDocError::invalid_url(url))?;

    match parsed.port() {
        Some(port) => Ok(format!("{}://{host}:{port}/", parsed.scheme())),
        None => Ok(format!("{}://{host}/", parsed.scheme())),
    }
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `pop` refuses to go above the root, like `/..` resolving to `/`.
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_locations_are_detected_by_prefix() {
        assert!(is_network_location("http://example.com"));
        assert!(is_network_location("https://example.com/llms.txt"));
        assert!(is_network_location("https:relative"));
        assert!(!is_network_location("ftp://example.com"));
        assert!(!is_network_location("./docs/llms.txt"));
        assert!(!is_network_location("file:///tmp/llms.txt"));
        assert!(!is_network_location("HTTP://example.com"));
    }

    #[test]
    fn location_kind_follows_prefix() {
        assert_eq!(LocationKind::of("https://a.dev/"), LocationKind::Network);
        assert_eq!(LocationKind::of("/srv/llms.txt"), LocationKind::Local);
    }

    #[test]
    fn canonical_local_path_resolves_relative_against_cwd() {
        let cwd = std::env::current_dir().unwrap();
        let path = canonical_local_path("./docs/../docs/llms.txt").unwrap();
        assert_eq!(path, cwd.join("docs").join("llms.txt"));
        assert!(path.is_absolute());
    }

    #[test]
    fn canonical_local_path_strips_file_scheme() {
        let path = canonical_local_path("file:///tmp/a/./b/../llms.txt").unwrap();
        assert_eq!(path, PathBuf::from("/tmp/a/llms.txt"));
    }

    #[test]
    fn canonical_local_path_is_idempotent() {
        for input in ["docs/llms.txt", "../x/./y", "/a/b/../c", "file:///srv/docs/../llms.txt"] {
            let once = canonical_local_path(input).unwrap();
            let twice = canonical_local_path(once.to_str().unwrap()).unwrap();
            assert_eq!(once, twice, "not idempotent for {input}");
        }
    }

    #[test]
    fn relative_and_file_url_forms_agree() {
        let cwd = std::env::current_dir().unwrap();
        let file_url = format!("file://{}/docs/llms.txt", cwd.display());
        assert_eq!(
            canonical_local_path("./docs/llms.txt").unwrap(),
            canonical_local_path(&file_url).unwrap()
        );
    }

    #[test]
    fn parent_dir_does_not_escape_root() {
        let path = canonical_local_path("/../../etc/passwd").unwrap();
        assert_eq!(path, PathBuf::from("/etc/passwd"));
    }

    #[test]
    fn domain_prefix_discards_path_and_query() {
        assert_eq!(
            domain_prefix("https://example.com/a/b?x=1#frag").unwrap(),
            "https://example.com/"
        );
        assert_eq!(
            domain_prefix("https://example.com").unwrap(),
            "https://example.com/"
        );
    }

    #[test]
    fn domain_prefix_keeps_non_default_port() {
        assert_eq!(
            domain_prefix("http://127.0.0.1:8080/llms.txt").unwrap(),
            "http://127.0.0.1:8080/"
        );
        assert_eq!(
            domain_prefix("https://example.com:443/x").unwrap(),
            "https://example.com/"
        );
    }

    #[test]
    fn domain_prefix_rejects_unparseable_input() {
        assert!(matches!(
            domain_prefix("not a url"),
            Err(LlmsDocError::InvalidUrl { .. })
        ));
        assert!(domain_prefix("docs/llms.txt").is_err());
    }
}
