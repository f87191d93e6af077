//! JSON-RPC 2.0 framing and MCP method dispatch.
//!
//! Transport-independent: both stdio and HTTP hand raw frames to
//! [`McpServer::handle_frame`] and write back whatever it returns.

use std::sync::Arc;

use radarr_mcp_core::error::ToolError;
use radarr_mcp_core::tool::{ToolCall, ToolRegistry, ToolResult};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;

/// Protocol version answered when the client does not name one.
pub const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";

const SERVER_NAME: &str = "mcp-radarr";

const INSTRUCTIONS: &str = "Radarr is a movie collection and download manager. Use these tools \
    to browse the movie library, look up movies that are not in it yet, queue movies for \
    download and change how library movies are monitored.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    /// Absent for notifications.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ToolsCallParams {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    arguments: Option<Value>,
}

/// MCP method handling over a shared tool registry.
#[derive(Clone)]
pub struct McpServer {
    registry: Arc<ToolRegistry>,
}

impl McpServer {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Parse and handle one raw frame. `None` means nothing is sent back.
    pub async fn handle_frame(&self, frame: &str) -> Option<JsonRpcResponse> {
        match serde_json::from_str::<JsonRpcRequest>(frame) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => {
                warn!(error = %e, "Unparsable JSON-RPC frame");
                Some(JsonRpcResponse::error(
                    Value::Null,
                    PARSE_ERROR,
                    format!("parse error: {e}"),
                ))
            }
        }
    }

    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                request.id.unwrap_or(Value::Null),
                INVALID_REQUEST,
                "invalid jsonrpc version",
            ));
        }

        let Some(id) = request.id else {
            debug!(method = %request.method, "Notification received");
            return None;
        };

        let response = match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(id, initialize_result(&request.params)),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::success(id, self.tools_list()),
            "tools/call" => self.tools_call(id, request.params).await,
            other => {
                debug!(method = other, "Unknown method");
                JsonRpcResponse::error(id, METHOD_NOT_FOUND, format!("method not found: {other}"))
            }
        };
        Some(response)
    }

    fn tools_list(&self) -> Value {
        let tools: Vec<Value> = self
            .registry
            .definitions()
            .into_iter()
            .map(|def| {
                json!({
                    "name": def.name,
                    "description": def.description,
                    "inputSchema": def.parameters,
                })
            })
            .collect();
        json!({ "tools": tools })
    }

    async fn tools_call(&self, id: Value, params: Value) -> JsonRpcResponse {
        let params: ToolsCallParams = match serde_json::from_value(params) {
            Ok(params) => params,
            Err(e) => return JsonRpcResponse::error(id, INVALID_PARAMS, format!("invalid params: {e}")),
        };
        let Some(name) = params.name.filter(|n| !n.is_empty()) else {
            return JsonRpcResponse::error(id, INVALID_PARAMS, "missing tool name");
        };

        let call = ToolCall {
            id: call_id(&id),
            name,
            arguments: params.arguments.unwrap_or_else(|| json!({})),
        };

        match self.registry.execute(&call).await {
            Ok(result) => {
                info!(tool = %call.name, success = result.success, "Tool call finished");
                JsonRpcResponse::success(id, call_result(&result))
            }
            Err(ToolError::NotFound(name)) => {
                JsonRpcResponse::error(id, INVALID_PARAMS, format!("unknown tool: {name}"))
            }
            Err(e) => {
                warn!(tool = %call.name, error = %e, "Tool call failed");
                JsonRpcResponse::success(
                    id,
                    json!({
                        "content": [{"type": "text", "text": e.to_string()}],
                        "isError": true
                    }),
                )
            }
        }
    }
}

fn initialize_result(params: &Value) -> Value {
    let protocol_version = params
        .get("protocolVersion")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_PROTOCOL_VERSION);
    json!({
        "protocolVersion": protocol_version,
        "serverInfo": {"name": SERVER_NAME, "version": env!("CARGO_PKG_VERSION")},
        "capabilities": {"tools": {"listChanged": false}},
        "instructions": INSTRUCTIONS,
    })
}

/// MCP `tools/call` result for a finished tool.
///
/// `structuredContent` must be an object, so list and null results are
/// only carried in the text content.
pub fn call_result(result: &ToolResult) -> Value {
    let mut body = json!({
        "content": [{"type": "text", "text": result.output}],
        "isError": !result.success,
    });
    if let Some(data @ Value::Object(_)) = &result.data {
        body["structuredContent"] = data.clone();
    }
    body
}

fn call_id(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
