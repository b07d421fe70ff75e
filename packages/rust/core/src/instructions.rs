//! Tool names and the descriptive text advertised to clients.

use crate::catalog::SourceCatalog;

/// Name of the source listing tool.
pub const LIST_DOC_SOURCES: &str = "list_doc_sources";

/// Name of the document retrieval tool.
pub const FETCH_DOCS: &str = "fetch_docs";

pub const LIST_DOC_SOURCES_DESCRIPTION: &str = "List all configured documentation sources";

const FETCH_DOCS_PREAMBLE: &str = "Fetch and parse documentation from a given URL or local file.\n\n\
Use this tool after list_doc_sources to:\n\
1. First fetch the llms.txt file from a documentation source\n\
2. Analyze the URLs listed in the llms.txt file\n\
3. Then fetch specific documentation pages relevant to the user's question\n";

const FETCH_DOCS_ARGS_REMOTE: &str = "\nArgs:\n    url: The URL to fetch documentation from.\n";

const FETCH_DOCS_ARGS_LOCAL: &str = "\nArgs:\n    url: The URL or file path to fetch documentation from. Can be:\n\
\x20       - URL from an allowed domain\n\
\x20       - A local file path (absolute or relative)\n\
\x20       - A file:// URL (e.g., file:///path/to/llms.txt)\n";

const FETCH_DOCS_RETURNS: &str = "\nReturns:\n\
\x20   The fetched documentation content converted to markdown, or an error message\n\
\x20   if the request fails or the URL is not from an allowed domain.";

/// Description of `fetch_docs`; local paths are only mentioned when a
/// local source exists.
pub fn fetch_docs_description(has_local_sources: bool) -> String {
    let args = if has_local_sources {
        FETCH_DOCS_ARGS_LOCAL
    } else {
        FETCH_DOCS_ARGS_REMOTE
    };
    format!("{FETCH_DOCS_PREAMBLE}{args}{FETCH_DOCS_RETURNS}")
}

/// Server-level instructions describing the two-step workflow.
pub fn server_instructions(catalog: &SourceCatalog) -> String {
    let names = join_names(&catalog.source_names());

    let mut text = format!(
        "Use the {LIST_DOC_SOURCES} tool to see available documentation sources.\n\
         This tool will return a URL for each documentation source.\n"
    );
    if !names.is_empty() {
        text.push_str(&format!(
            "Documentation URLs are available from this tool for {names}.\n"
        ));
    }
    text.push_str(&format!(
        "\nOnce you have a source documentation URL, use the {FETCH_DOCS} tool to get the documentation contents. \n\
         If the documentation contents contains a URL for additional documentation that is relevant to your task, \
         you can use the {FETCH_DOCS} tool to fetch documentation from that URL next."
    ));
    text
}

/// English list join: `a`, `a and b`, `a, b, and c`.
fn join_names(names: &[&str]) -> String {
    match names {
        [] => String::new(),
        [one] => (*one).to_string(),
        [a, b] => format!("{a} and {b}"),
        [init @ .., last] => format!("{}, and {last}", init.join(", ")),
    }
}
