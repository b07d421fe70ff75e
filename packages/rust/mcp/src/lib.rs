//! MCP tool surface for llmsdoc, served over stdio with `rmcp`.

mod server;

pub use server::DocsServer;
