/// MCP protocol implementation
///
/// This module handles the Model Context Protocol communication: JSON-RPC
/// message types, error codes and the stdio server that routes tool calls.

pub mod protocol;
pub mod server;

pub use server::{tool_definitions, McpServer};
