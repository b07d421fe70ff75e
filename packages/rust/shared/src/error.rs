//! Error types for llmsdoc.
//!
//! Library crates use [`LlmsDocError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;
use std::time::Duration;

/// Top-level error type for all llmsdoc operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmsDocError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// A string that should have been a URL could not be parsed as one.
    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },

    /// A required tool parameter was absent or empty.
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    /// Retrieval of a document failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// HTML-to-Markdown conversion error.
    #[error("conversion error: {0}")]
    Conversion(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Tool transport failure (handshake, framing, closed pipe).
    #[error("transport error: {0}")]
    Transport(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LlmsDocError>;

impl LlmsDocError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create an invalid-URL error for the offending input.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Why a single retrieval attempt failed.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The end-to-end deadline elapsed before the fetch completed.
    #[error("request timeout after {0:?}")]
    Timeout(Duration),

    /// The server answered with a non-success status.
    #[error("HTTP {code}: {reason}")]
    HttpStatus { code: u16, reason: String },

    /// The local file does not exist.
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// The local file exists but could not be read as text.
    #[error("failed to read {}: {message}", path.display())]
    ReadError { path: PathBuf, message: String },

    /// Connection, TLS, or body decoding failure.
    #[error("{url}: {message}")]
    Transport { url: String, message: String },

    /// A meta-refresh target could not be resolved against the page URL.
    #[error("invalid meta-refresh target '{target}' on {url}")]
    InvalidRedirect { url: String, target: String },

    /// The meta-refresh chain exceeded the hop cap.
    #[error("too many meta-refresh redirects (max {0})")]
    TooManyRedirects(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = LlmsDocError::config("No documentation sources configured");
        assert_eq!(
            err.to_string(),
            "config error: No documentation sources configured"
        );

        let err = LlmsDocError::MissingParameter("url");
        assert_eq!(err.to_string(), "Missing required parameter: url");

        let err = LlmsDocError::invalid_url("not a url");
        assert_eq!(err.to_string(), "Invalid URL: not a url");
    }

    #[test]
    fn fetch_errors_describe_cause() {
        let err = FetchError::Timeout(Duration::from_secs(10));
        assert_eq!(err.to_string(), "request timeout after 10s");

        let err = FetchError::HttpStatus {
            code: 404,
            reason: "Not Found".into(),
        };
        assert_eq!(err.to_string(), "HTTP 404: Not Found");

        let wrapped: LlmsDocError = FetchError::TooManyRedirects(10).into();
        assert!(wrapped.to_string().contains("max 10"));
    }
}
