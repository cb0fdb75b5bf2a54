/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the actual MCP server that:
/// 1. Reads JSON-RPC requests from stdin, one per line
/// 2. Dispatches tool calls to the habit tools
/// 3. Writes JSON-RPC responses to stdout

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::mcp::protocol::*;
use crate::storage::SqliteStorage;
use crate::tools::{self, ToolContext, ToolError};
use crate::{HabitTrackerServer, ServerError};

type ToolFn<P, R> = fn(&SqliteStorage, &ToolContext, P) -> Result<R, ToolError>;

/// MCP server that handles communication with the client
pub struct McpServer {
    habit_tracker: HabitTrackerServer,
    initialized: bool,
}

impl McpServer {
    pub fn new(habit_tracker: HabitTrackerServer) -> Self {
        Self {
            habit_tracker,
            initialized: false,
        }
    }

    /// Run the MCP server, handling JSON-RPC over stdin/stdout
    pub async fn run(&mut self) -> Result<(), ServerError> {
        info!("Starting MCP server, waiting for JSON-RPC requests...");

        let mut reader = BufReader::new(tokio::io::stdin());
        let mut stdout = tokio::io::stdout();
        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("MCP server shutting down (stdin closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.process_line(&line) {
                        let response_str = serde_json::to_string(&response)?;

                        stdout.write_all(response_str.as_bytes()).await?;
                        stdout.write_all(b"\n").await?;
                        stdout.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read from stdin: {}", e);
                    return Err(e.into());
                }
            }
        }

        Ok(())
    }

    /// Process a single line of JSON-RPC input
    ///
    /// Returns `None` for blank lines and notifications.
    pub fn process_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None,
                ));
            }
        };

        self.handle_request(request)
    }

    fn handle_request(&mut self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id else {
            self.handle_notification(&request.method);
            return None;
        };

        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                id,
                error_codes::INVALID_REQUEST,
                format!("Unsupported JSON-RPC version '{}'", request.jsonrpc),
                None,
            ));
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id, request.params),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::success(id, json!({ "tools": tool_definitions() })),
            "tools/call" => self.handle_tools_call(id, request.params),
            _ => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
                None,
            ),
        };
        Some(response)
    }

    fn handle_notification(&mut self, method: &str) {
        match method {
            "notifications/initialized" | "initialized" => {
                self.initialized = true;
                debug!("Client finished initialization");
            }
            other => debug!("Ignoring notification '{}'", other),
        }
    }

    fn handle_initialize(&mut self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let params: InitializeParams = params
            .and_then(|p| serde_json::from_value(p).ok())
            .unwrap_or_default();
        match &params.client_info {
            Some(client) => info!(
                "MCP client connected: {} {} (protocol {})",
                client.name,
                client.version,
                params.protocol_version.as_deref().unwrap_or("unknown")
            ),
            None => info!("MCP client connected"),
        }

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability { list_changed: false }),
            },
            server_info: ServerInfo {
                name: "Habit Streak MCP".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        to_response(id, &result)
    }

    fn handle_tools_call(&mut self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let Some(params) = params else {
            return JsonRpcResponse::error(id, error_codes::INVALID_PARAMS, "Missing parameters".to_string(), None);
        };
        let call: ToolCallParams = match serde_json::from_value(params) {
            Ok(call) => call,
            Err(e) => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid parameters: {}", e),
                    None,
                );
            }
        };
        if !self.initialized {
            warn!("Tool '{}' called before initialization completed", call.name);
        }

        let Some(result) = self.call_tool(&call.name, call.arguments.unwrap_or(Value::Null)) else {
            return JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Unknown tool: {}", call.name),
                None,
            );
        };

        to_response(id, &result)
    }

    /// Run a named tool; `None` if no tool has that name
    fn call_tool(&self, name: &str, arguments: Value) -> Option<ToolCallResult> {
        let result = match name {
            "habit_create" => self.invoke(arguments, tools::create_habit as ToolFn<_, _>),
            "habit_update" => self.invoke(arguments, tools::update_habit as ToolFn<_, _>),
            "habit_delete" => self.invoke(arguments, tools::delete_habit as ToolFn<_, _>),
            "habit_complete" => self.invoke(arguments, tools::complete_habit as ToolFn<_, _>),
            "habit_uncomplete" => self.invoke(arguments, tools::uncomplete_habit as ToolFn<_, _>),
            "habit_list" => self.invoke(arguments, tools::list_habits as ToolFn<_, _>),
            "habit_detail" => self.invoke(arguments, tools::habit_detail as ToolFn<_, _>),
            "habit_stats" => self.invoke(arguments, tools::get_stats as ToolFn<_, _>),
            "habit_week" => self.invoke(arguments, tools::habit_week as ToolFn<_, _>),
            "habit_month" => self.invoke(arguments, tools::habit_month as ToolFn<_, _>),
            "user_update" => self.invoke(arguments, tools::update_user as ToolFn<_, _>),
            _ => return None,
        };
        Some(result)
    }

    /// Deserialize the arguments, run the tool and render its outcome
    fn invoke<P, R>(&self, arguments: Value, tool: ToolFn<P, R>) -> ToolCallResult
    where
        P: DeserializeOwned,
        R: Serialize,
    {
        let arguments = if arguments.is_null() { json!({}) } else { arguments };
        let params: P = match serde_json::from_value(arguments) {
            Ok(params) => params,
            Err(e) => {
                return ToolCallResult::error(error_codes::VALIDATION_ERROR, format!("Invalid arguments: {}", e));
            }
        };

        let ctx = self.habit_tracker.context();
        match tool(self.habit_tracker.storage(), &ctx, params) {
            Ok(response) => match serde_json::to_string_pretty(&response) {
                Ok(text) => ToolCallResult::success(text),
                Err(e) => ToolCallResult::error(error_codes::INTERNAL_ERROR, e.to_string()),
            },
            Err(e) => {
                match &e {
                    ToolError::Storage(inner) => error!("Tool failed on storage: {}", inner),
                    other => debug!("Tool rejected request: {}", other),
                }
                ToolCallResult::from_tool_error(&e)
            }
        }
    }
}

fn to_response<T: Serialize>(id: Value, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, error_codes::INTERNAL_ERROR, e.to_string(), None),
    }
}

fn definition<P: JsonSchema>(name: &str, description: &str) -> ToolDefinition {
    ToolDefinition::new::<P>(name, description)
}

/// Every tool this server offers
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        definition::<tools::CreateHabitParams>("habit_create", "Create a new habit to track"),
        definition::<tools::UpdateHabitParams>(
            "habit_update",
            "Change a habit's name, description, frequency, goal or color",
        ),
        definition::<tools::DeleteHabitParams>("habit_delete", "Delete a habit and all of its completions"),
        definition::<tools::ToggleParams>(
            "habit_complete",
            "Mark a habit as done for today or a past day; future days are rejected",
        ),
        definition::<tools::ToggleParams>(
            "habit_uncomplete",
            "Clear a habit's completion for today or a past day; future days are rejected",
        ),
        definition::<tools::ListHabitsParams>(
            "habit_list",
            "List habits with current streaks, today's status and this week's completion rate",
        ),
        definition::<tools::HabitDetailParams>(
            "habit_detail",
            "Show one habit with its streaks, completion rate and recent completions",
        ),
        definition::<tools::StatsParams>(
            "habit_stats",
            "Portfolio statistics: total habits, total completions, average and best streak",
        ),
        definition::<tools::WeekParams>("habit_week", "Week grid (Sunday to Saturday) for every habit"),
        definition::<tools::MonthParams>("habit_month", "Month grid for one habit"),
        definition::<tools::UpdateUserParams>("user_update", "Set the reminder email and opt in or out of daily reminders"),
    ]
}
