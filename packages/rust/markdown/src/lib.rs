//! HTML-to-Markdown normalization for fetched documentation.
//!
//! Converts HTML documents to Markdown using the `htmd` crate (ATX headings,
//! fenced code blocks), then applies a series of cleanup passes. Input that
//! carries no HTML markup, such as an `llms.txt` index, skips the conversion
//! and only goes through cleanup.
//!
//! Conversion is best-effort: it never fails and never panics, whatever the
//! input looks like.

mod cleanup;

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

/// Tags whose content is dropped entirely.
const SKIPPED_TAGS: [&str; 5] = ["script", "style", "noscript", "iframe", "svg"];

// ---------------------------------------------------------------------------
// Converter
// ---------------------------------------------------------------------------

/// Convert HTML (or plain Markdown) text to normalized Markdown.
pub fn to_normalized_text(input: &str) -> String {
    to_normalized_text_with_base(input, None)
}

/// Like [`to_normalized_text`], resolving relative links against `base_url`.
///
/// Pass the URL the document was finally retrieved from so that links in
/// the output can be fetched directly.
pub fn to_normalized_text_with_base(input: &str, base_url: Option<&Url>) -> String {
    let markdown = if looks_like_html(input) {
        html_to_markdown(input)
    } else {
        debug!(len = input.len(), "no HTML markup found, passing through");
        input.to_string()
    };

    cleanup::run_pipeline(&markdown, base_url)
}

/// Whether the input contains recognizable HTML markup.
pub fn looks_like_html(input: &str) -> bool {
    static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(
            r"(?i)<(?:!doctype|/?(?:html|head|body|meta|title|div|span|p|h[1-6]|ul|ol|li|a|pre|code|table|tr|td|th|br|hr|img|section|article|main|nav|header|footer|strong|em|b|i|blockquote|script|style)(?:\s[^<>]*)?/?>)",
        )
        .expect("valid regex")
    });

    TAG_RE.is_match(input)
}

fn html_to_markdown(html: &str) -> String {
    let (html, tables) = preprocess_tables(html);

    let converter = htmd::HtmlToMarkdown::builder()
        .skip_tags(SKIPPED_TAGS.to_vec())
        .build();

    match converter.convert(&html) {
        Ok(markdown) => {
            debug!(html_len = html.len(), md_len = markdown.len(), "htmd conversion complete");
            restore_tables(markdown, &tables)
        }
        Err(e) => {
            warn!(error = %e, "htmd conversion failed, falling back to text content");
            restore_tables(text_content(&html), &tables)
        }
    }
}

/// Plain text of a document, one block per text node.
fn text_content(html: &str) -> String {
    let doc = Html::parse_document(html);
    doc.root_element()
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

// ---------------------------------------------------------------------------
// Table pre-processing
// ---------------------------------------------------------------------------

/// Swap HTML `<table>` elements for placeholders before htmd runs.
///
/// `htmd` 0.1 doesn't support table conversion, and would collapse the
/// newlines of a pre-rendered table, so each table is rendered separately
/// and spliced back in by [`restore_tables`]. Tables whose serialized form
/// does not appear verbatim in the source are left for htmd to flatten.
fn preprocess_tables(html: &str) -> (String, Vec<String>) {
    static TABLE_SEL: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("table").expect("valid selector"));

    let doc = Html::parse_document(html);
    let mut result = html.to_string();
    let mut tables = Vec::new();

    for table in doc.select(&TABLE_SEL) {
        let outer = table.html();
        if !result.contains(&outer) {
            continue;
        }
        let placeholder = format!("<p>{}</p>", table_placeholder(tables.len()));
        result = result.replacen(&outer, &placeholder, 1);
        tables.push(table_to_markdown(&table));
    }

    (result, tables)
}

fn restore_tables(mut markdown: String, tables: &[String]) -> String {
    for (index, table) in tables.iter().enumerate() {
        markdown = markdown.replacen(&table_placeholder(index), table.trim(), 1);
    }
    markdown
}

fn table_placeholder(index: usize) -> String {
    format!("LLMSDOCTABLE{index}X")
}

fn table_to_markdown(table: &ElementRef) -> String {
    static TR_SEL: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("tr").expect("valid selector"));
    static CELL_SEL: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("th, td").expect("valid selector"));

    let rows: Vec<Vec<String>> = table
        .select(&TR_SEL)
        .map(|tr| {
            tr.select(&CELL_SEL)
                .map(|cell| {
                    cell.text()
                        .collect::<String>()
                        .split_whitespace()
                        .collect::<Vec<_>>()
                        .join(" ")
                        .replace('|', "\\|")
                })
                .collect::<Vec<_>>()
        })
        .filter(|cells| !cells.is_empty())
        .collect();

    let col_count = rows.iter().map(Vec::len).max().unwrap_or(0);
    if col_count == 0 {
        return String::new();
    }

    let render_row = |row: &[String]| {
        let mut cells = row.to_vec();
        cells.resize(col_count, String::new());
        format!("| {} |\n", cells.join(" | "))
    };

    let mut md = render_row(&rows[0]);
    md.push_str(&render_row(&vec!["---".to_string(); col_count]));
    for row in &rows[1..] {
        md.push_str(&render_row(row));
    }
    md
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
