//! MCP server exposing `list_doc_sources` and `fetch_docs`.
//!
//! Protocol errors are reserved for a missing `url`, an unknown tool name,
//! and internal dispatch failures. Everything else the service reports is
//! returned as tool content, flagged as an error where appropriate.

use std::borrow::Cow;
use std::sync::Arc;

use llmsdoc_core::{
    DocRetrievalService, FETCH_DOCS, LIST_DOC_SOURCES, LIST_DOC_SOURCES_DESCRIPTION, ToolOutcome,
    fetch_docs_description, server_instructions,
};
use llmsdoc_shared::{LlmsDocError, Result};
use rmcp::model::*;
use rmcp::{ErrorData as McpError, ServerHandler, ServiceExt};
use serde_json::{Value, json};
use tracing::{debug, info, instrument};

/// MCP handler wrapping a shared [`DocRetrievalService`].
///
/// Clones share the same service; nothing in it is mutable.
#[derive(Debug, Clone)]
pub struct DocsServer {
    service: Arc<DocRetrievalService>,
}

impl DocsServer {
    pub fn new(service: DocRetrievalService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Serve MCP over stdin/stdout until the client disconnects.
    pub async fn serve_stdio(self) -> Result<()> {
        info!(
            sources = self.service.catalog().entries().len(),
            "starting MCP server on stdio"
        );

        let running = self
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| LlmsDocError::Transport(e.to_string()))?;

        running
            .waiting()
            .await
            .map_err(|e| LlmsDocError::Transport(e.to_string()))?;

        info!("MCP client disconnected");
        Ok(())
    }

    /// Descriptors for both tools, in listing order.
    pub fn tools(&self) -> Vec<Tool> {
        vec![
            tool_descriptor(
                LIST_DOC_SOURCES,
                LIST_DOC_SOURCES_DESCRIPTION.to_string(),
                json!({
                    "type": "object",
                    "properties": {},
                    "additionalProperties": false,
                }),
            ),
            tool_descriptor(
                FETCH_DOCS,
                fetch_docs_description(self.service.catalog().has_local_sources()),
                json!({
                    "type": "object",
                    "properties": {
                        "url": {
                            "type": "string",
                            "description": "URL or file path to fetch documentation from",
                        },
                    },
                    "required": ["url"],
                    "additionalProperties": false,
                }),
            ),
        ]
    }

    /// Route a tool call by name.
    #[instrument(skip(self, arguments))]
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> std::result::Result<CallToolResult, McpError> {
        let outcome = match name {
            LIST_DOC_SOURCES => self.service.list_sources(),
            FETCH_DOCS => {
                let url = arguments
                    .as_ref()
                    .and_then(|args| args.get("url"))
                    .and_then(Value::as_str);
                self.service.fetch_docs(url).await.map_err(protocol_error)?
            }
            other => {
                debug!(tool = other, "unknown tool requested");
                return Err(McpError::new(
                    ErrorCode::METHOD_NOT_FOUND,
                    format!("Unknown tool: {other}"),
                    None,
                ));
            }
        };

        Ok(to_call_result(outcome))
    }
}

fn tool_descriptor(name: &'static str, description: String, schema: Value) -> Tool {
    let input_schema = match schema {
        Value::Object(map) => Arc::new(map),
        _ => Arc::new(serde_json::Map::new()),
    };

    Tool {
        name: Cow::Borrowed(name),
        title: None,
        description: Some(Cow::Owned(description)),
        input_schema,
        output_schema: None,
        annotations: Some(ToolAnnotations::new().read_only(true)),
        execution: None,
        icons: None,
        meta: None,
    }
}

fn to_call_result(outcome: ToolOutcome) -> CallToolResult {
    let content = vec![Content::text(outcome.text)];
    if outcome.is_error {
        CallToolResult::error(content)
    } else {
        CallToolResult::success(content)
    }
}

fn protocol_error(err: LlmsDocError) -> McpError {
    match err {
        LlmsDocError::MissingParameter(_) => {
            McpError::new(ErrorCode::INVALID_PARAMS, err.to_string(), None)
        }
        other => McpError::new(
            ErrorCode::INTERNAL_ERROR,
            format!("Error executing tool: {other}"),
            None,
        ),
    }
}

impl ServerHandler for DocsServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "llmsdoc".to_string(),
                title: Some("llms.txt documentation server".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(server_instructions(self.service.catalog())),
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl std::future::Future<Output = std::result::Result<ListToolsResult, McpError>> + Send + '_
    {
        std::future::ready(Ok(ListToolsResult::with_all_items(self.tools())))
    }

    fn get_tool(&self, name: &str) -> Option<Tool> {
        self.tools().into_iter().find(|t| t.name == name)
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        self.dispatch(&request.name, request.arguments).await
    }
}
