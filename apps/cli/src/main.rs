//! llmsdoc CLI: serve llms.txt documentation to MCP clients.
//!
//! Exposes configured documentation sources through two tools,
//! `list_doc_sources` and `fetch_docs`, over stdio.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
