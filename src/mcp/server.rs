use crate::app::App;
use crate::config::Config;
use crate::errors::{McpError, ToolError};
use crate::mcp::catalog::{tool_by_name, tool_catalog, tool_names, validate_tool_args};
use crate::mcp::protocol::{JsonRpcRequest, JsonRpcResponse};
use crate::mcp::resources;
use crate::utils::tool_errors::unknown_tool_error;
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};

pub const PROTOCOL_VERSION: &str = "2025-06-18";
const SERVER_NAME: &str = "agentkit";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

fn text_content(text: String) -> Value {
    serde_json::json!({ "content": [ { "type": "text", "text": text } ] })
}

/// Tool outcome as protocol content. Failures are reported as `ERROR: ...`
/// text so the calling agent can read and react to them.
pub fn tool_result_payload(result: Result<Value, ToolError>) -> Value {
    match result {
        Ok(Value::String(text)) => text_content(text),
        Ok(value) => {
            let text = serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());
            let mut payload = text_content(text);
            if value.is_object() {
                payload["structuredContent"] = value;
            }
            payload
        }
        Err(err) => text_content(err.to_content_text()),
    }
}

pub struct McpServer {
    app: Arc<App>,
}

impl McpServer {
    pub fn new(app: App) -> Self {
        Self { app: Arc::new(app) }
    }

    fn handle_initialize(&self) -> Value {
        serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": { "listChanged": false },
                "resources": { "subscribe": false, "listChanged": false },
            },
            "serverInfo": { "name": SERVER_NAME, "version": SERVER_VERSION },
        })
    }

    fn handle_tools_list(&self) -> Value {
        serde_json::json!({ "tools": tool_catalog() })
    }

    async fn handle_tools_call(&self, params: &Value) -> Result<Value, McpError> {
        let name = params.get("name").and_then(|v| v.as_str()).unwrap_or("");
        if name.is_empty() {
            return Err(McpError::invalid_params("Missing tool name"));
        }
        if tool_by_name(name).is_none() || !self.app.tool_executor.has_handler(name) {
            let known = tool_names();
            let known: Vec<&str> = known.iter().map(|s| s.as_str()).collect();
            let err = unknown_tool_error("agentkit", name, &known);
            let message = match &err.hint {
                Some(hint) => format!("Unknown tool: {}. {}", name, hint),
                None => format!("Unknown tool: {}", name),
            };
            return Err(McpError::invalid_params(message));
        }

        let args = match params.get("arguments") {
            None | Some(Value::Null) => Value::Object(Default::default()),
            Some(value) => value.clone(),
        };
        if let Err(err) = validate_tool_args(name, &args) {
            return Ok(tool_result_payload(Err(err)));
        }
        let result = self.app.tool_executor.execute(name, args).await;
        Ok(tool_result_payload(result))
    }

    fn handle_resources_read(&self, params: &Value) -> Result<Value, McpError> {
        let uri = params
            .get("uri")
            .and_then(|v| v.as_str())
            .ok_or_else(|| McpError::invalid_params("Missing resource uri"))?;
        resources::read_resource(&self.app.preset_manager, uri)
    }

    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            return None;
        }
        let id = request.id.clone().unwrap_or(Value::Null);
        let outcome = match request.method.as_str() {
            "initialize" => Ok(self.handle_initialize()),
            "ping" => Ok(serde_json::json!({})),
            "tools/list" => Ok(self.handle_tools_list()),
            "tools/call" => self.handle_tools_call(&request.params).await,
            "resources/list" => resources::list_resources(&self.app.preset_manager),
            "resources/templates/list" => Ok(resources::resource_templates()),
            "resources/read" => self.handle_resources_read(&request.params),
            other => Err(McpError::method_not_found(other)),
        };
        Some(JsonRpcResponse::reply(id, outcome))
    }

    /// One newline-delimited frame in, at most one frame out.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        let parsed: Value = match serde_json::from_str(trimmed) {
            Ok(value) => value,
            Err(_) => {
                return Some(JsonRpcResponse::reply(
                    Value::Null,
                    Err(McpError::parse_error()),
                ))
            }
        };
        let id = parsed.get("id").cloned().unwrap_or(Value::Null);
        match serde_json::from_value::<JsonRpcRequest>(parsed) {
            Ok(request) => self.handle_request(request).await,
            Err(_) => Some(JsonRpcResponse::reply(id, Err(McpError::invalid_request()))),
        }
    }

    pub async fn serve<R, W>(&self, reader: R, writer: W) -> Result<(), ToolError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        let mut writer = BufWriter::new(writer);
        while let Some(line) = lines.next_line().await? {
            if let Some(response) = self.handle_line(&line).await {
                let payload = serde_json::to_string(&response)
                    .map_err(|err| ToolError::internal(err.to_string()))?;
                writer.write_all(payload.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
        }
        Ok(())
    }

    pub async fn run_stdio(&self) -> Result<(), ToolError> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }
}

pub async fn run_stdio() -> Result<(), ToolError> {
    let app = App::initialize(Config::from_env())?;
    app.seed_bundled_presets();
    let logger = app.logger.clone();
    let server = McpServer::new(app);
    let outcome = server.run_stdio().await;
    logger.info("stdin closed, shutting down", Some(&logger.stats()));
    outcome
}
