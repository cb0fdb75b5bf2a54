/// MCP (Model Context Protocol) message structures and JSON-RPC handling
///
/// This module defines the JSON-RPC message format that MCP clients use to
/// talk to the habit tracker, and how tool errors map onto error codes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::tools::ToolError;

/// MCP protocol version we support
pub const MCP_VERSION: &str = "2024-11-05";

/// JSON-RPC 2.0 request message
///
/// A request without an `id` is a notification and gets no response.
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    /// e.g. "initialize", "tools/list", "tools/call"
    pub method: String,
    pub params: Option<Value>,
}

/// JSON-RPC 2.0 response message; exactly one of `result` and `error` is set
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error information
#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Parameters of a tools/call request
#[derive(Debug, Deserialize)]
pub struct ToolCallParams {
    pub name: String,
    /// Tool arguments; missing or null means no arguments
    #[serde(default)]
    pub arguments: Option<Value>,
}

/// Result of a tools/call request
#[derive(Debug, Serialize)]
pub struct ToolCallResult {
    pub content: Vec<ToolContent>,
    /// Whether the tool failed
    #[serde(rename = "isError")]
    pub is_error: bool,
}

/// Content returned by a tool
#[derive(Debug, Serialize)]
pub struct ToolContent {
    /// Type of content (always "text" here)
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

/// MCP tool definition
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON schema for the tool's input parameters
    pub input_schema: Value,
}

impl ToolDefinition {
    /// Describe a tool whose arguments deserialize into `P`
    pub fn new<P: JsonSchema>(name: &str, description: &str) -> Self {
        let mut input_schema = serde_json::to_value(schemars::schema_for!(P))
            .unwrap_or_else(|_| json!({ "type": "object" }));
        if let Some(schema) = input_schema.as_object_mut() {
            schema.remove("$schema");
            schema.remove("title");
        }

        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ServerCapabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolsCapability>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsCapability {
    pub list_changed: bool,
}

/// The parts of an initialize request we log
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    pub protocol_version: Option<String>,
    pub client_info: Option<ClientInfo>,
}

#[derive(Debug, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    pub server_info: ServerInfo,
}

#[derive(Debug, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

/// Error codes used in JSON-RPC errors and in failed tool results
pub mod error_codes {
    // Standard JSON-RPC 2.0 codes
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;

    // Server range (-32000 to -32099)
    /// No such habit or user for the caller
    pub const HABIT_NOT_FOUND: i32 = -32001;
    /// Malformed or out-of-range input
    pub const VALIDATION_ERROR: i32 = -32003;
    /// The database failed
    pub const STORAGE_ERROR: i32 = -32004;
    /// Well-formed but not allowed, such as toggling a future day
    pub const POLICY_VIOLATION: i32 = -32005;
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Value, code: i32, message: String, data: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError { code, message, data }),
        }
    }
}

impl ToolCallResult {
    fn text(text: String, is_error: bool) -> Self {
        Self {
            content: vec![ToolContent {
                content_type: "text".to_string(),
                text,
            }],
            is_error,
        }
    }

    pub fn success(text: String) -> Self {
        Self::text(text, false)
    }

    /// Create an error tool result carrying the error's JSON-RPC code
    pub fn error(code: i32, error_message: String) -> Self {
        Self::text(json!({ "code": code, "error": error_message }).to_string(), true)
    }

    pub fn from_tool_error(error: &ToolError) -> Self {
        Self::error(tool_error_to_json_rpc_code(error), error.to_string())
    }
}

/// Map tool errors to JSON-RPC error codes
pub fn tool_error_to_json_rpc_code(error: &ToolError) -> i32 {
    match error {
        ToolError::Validation(_) => error_codes::VALIDATION_ERROR,
        ToolError::NotFound { .. } => error_codes::HABIT_NOT_FOUND,
        ToolError::PolicyViolation { .. } => error_codes::POLICY_VIOLATION,
        ToolError::Storage(_) => error_codes::STORAGE_ERROR,
    }
}
