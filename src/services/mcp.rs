//! MCP (Model Context Protocol) server over stdio.
//!
//! Implements JSON-RPC 2.0 with one message per line. A line is fully handled
//! and its response written before the next line is read.

use crate::error::{McpError, McpResult};
use jsonrpc_core::{Error as RpcError, ErrorCode, IoHandler, Params};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::future::Future;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

/// MCP protocol version
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

/// Standard JSON-RPC error codes
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
}

/// Tool definition returned by tools/list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Tool call result content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResultContent {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

/// Tool call result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<ToolResultContent>,
    #[serde(rename = "isError", default)]
    pub is_error: bool,
    #[serde(
        rename = "structuredContent",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub structured_content: Option<Value>,
}

impl ToolResult {
    /// Successful text result
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolResultContent {
                content_type: "text".to_string(),
                text: text.into(),
            }],
            is_error: false,
            structured_content: None,
        }
    }

    /// Failed text result; still a valid tool response, not an RPC error
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::text(text)
        }
    }

    pub fn with_structured(mut self, value: Value) -> Self {
        self.structured_content = Some(value);
        self
    }

    /// Concatenated text of all content blocks
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// tools/call params
#[derive(Debug, Clone, Deserialize)]
pub struct CallToolParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<Value>,
}

/// MCP Server capabilities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerCapabilities {
    pub tools: Value,
}

/// Server info
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

/// Initialize result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeResult {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
}

/// Tools list result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsListResult {
    pub tools: Vec<ToolDefinition>,
}

/// The tool catalog served over MCP
pub trait ToolHandler: Send + Sync + 'static {
    fn tools(&self) -> Vec<ToolDefinition>;

    /// Run a tool. `Err` is reserved for unknown tools and bad arguments.
    fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> impl Future<Output = McpResult<ToolResult>> + Send;
}

fn rpc_error(error: McpError) -> RpcError {
    match error {
        McpError::ToolNotFound(_) | McpError::InvalidArguments { .. } => {
            RpcError::invalid_params(error.to_string())
        }
        other => RpcError {
            code: ErrorCode::InternalError,
            message: other.to_string(),
            data: None,
        },
    }
}

/// JSON-RPC dispatcher for one tool handler
pub struct McpServer {
    io: IoHandler,
}

impl McpServer {
    pub fn new<H: ToolHandler>(handler: Arc<H>, server_info: ServerInfo) -> Self {
        let mut io = IoHandler::new();

        let initialize = InitializeResult {
            protocol_version: MCP_PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: json!({ "listChanged": false }),
            },
            server_info,
        };
        io.add_method("initialize", move |_params: Params| {
            let result = serde_json::to_value(&initialize).map_err(|e| rpc_error(e.into()));
            async move {
                tracing::info!("Client initialized MCP session");
                result
            }
        });

        io.add_notification("notifications/initialized", |_params: Params| {
            tracing::debug!("Client confirmed initialization");
        });

        io.add_method("ping", |_params: Params| async { Ok::<_, RpcError>(json!({})) });

        let list_handler = Arc::clone(&handler);
        io.add_method("tools/list", move |_params: Params| {
            let result = serde_json::to_value(ToolsListResult {
                tools: list_handler.tools(),
            })
            .map_err(|e| rpc_error(e.into()));
            async move { result }
        });

        io.add_method("tools/call", move |params: Params| {
            let handler = Arc::clone(&handler);
            async move {
                let call: CallToolParams = params.parse()?;
                tracing::info!("Calling tool: {}", call.name);
                let arguments = call.arguments.unwrap_or_else(|| json!({}));
                let result = handler
                    .call_tool(&call.name, arguments)
                    .await
                    .map_err(rpc_error)?;
                if result.is_error {
                    tracing::warn!("Tool {} reported failure", call.name);
                }
                serde_json::to_value(result).map_err(|e| rpc_error(e.into()))
            }
        });

        Self { io }
    }

    /// Handle one raw message. Notifications produce no response.
    pub async fn handle_message(&self, message: &str) -> Option<String> {
        self.io.handle_request(message).await
    }

    /// Serve newline-delimited messages until the reader is exhausted
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> McpResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let transport = |e: std::io::Error| McpError::Transport(e.to_string());
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await.map_err(transport)? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            tracing::debug!("Received message ({} bytes)", line.len());
            if let Some(response) = self.handle_message(line).await {
                writer
                    .write_all(response.as_bytes())
                    .await
                    .map_err(transport)?;
                writer.write_all(b"\n").await.map_err(transport)?;
                writer.flush().await.map_err(transport)?;
            }
        }

        tracing::info!("Input closed, stopping MCP server");
        Ok(())
    }

    /// Serve on the process stdin/stdout
    pub async fn serve_stdio(&self) -> McpResult<()> {
        tracing::info!("MCP server ready, listening on stdio");
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }
}
