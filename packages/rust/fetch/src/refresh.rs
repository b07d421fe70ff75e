//! HTML meta-refresh detection.

use std::sync::LazyLock;

use regex::Regex;

/// Matches `<meta http-equiv="refresh" content="<delay>; url=<target>">`.
static META_REFRESH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)<meta\s+http-equiv\s*=\s*"refresh"\s+content\s*=\s*"[^";]+;\s*url\s*=\s*([^"]+)""#,
    )
    .expect("meta refresh regex")
});

/// Target of the first well-formed meta-refresh tag in `html`, if any.
///
/// The target is returned as written (possibly relative); single quotes
/// around it are removed.
pub fn find_meta_refresh(html: &str) -> Option<String> {
    let caps = META_REFRESH_RE.captures(html)?;
    let target = caps[1].trim().trim_matches('\'').trim();
    (!target.is_empty()).then(|| target.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_relative_target() {
        let html = r#"<html><head><meta http-equiv="refresh" content="0; url=/docs/llms.txt"></head></html>"#;
        assert_eq!(find_meta_refresh(html).as_deref(), Some("/docs/llms.txt"));
    }

    #[test]
    fn attribute_names_are_case_insensitive() {
        let html = r#"<META HTTP-EQUIV="Refresh" CONTENT="5;URL=https://example.com/new">"#;
        assert_eq!(
            find_meta_refresh(html).as_deref(),
            Some("https://example.com/new")
        );
    }

    #[test]
    fn strips_single_quotes() {
        let html = r#"<meta http-equiv="refresh" content="0; url='next.html'">"#;
        assert_eq!(find_meta_refresh(html).as_deref(), Some("next.html"));
    }

    #[test]
    fn first_occurrence_wins() {
        let html = r#"<meta http-equiv="refresh" content="0; url=/a"><meta http-equiv="refresh" content="0; url=/b">"#;
        assert_eq!(find_meta_refresh(html).as_deref(), Some("/a"));
    }

    #[test]
    fn ignores_refresh_without_url() {
        assert!(find_meta_refresh(r#"<meta http-equiv="refresh" content="30">"#).is_none());
        assert!(find_meta_refresh("<p>no tags here</p>").is_none());
        assert!(find_meta_refresh(r#"<meta name="viewport" content="width=device-width">"#).is_none());
    }
}
