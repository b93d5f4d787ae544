//! JSON-RPC request handling
//!
//! Tools:
//! - convert: Convert a value between two named units
//! - list_categories: List unit categories
//! - list_units: List the units of a category
//! - reload: Reload units from the configured sources
//!
//! Resources:
//! - metron://categories/{name} - Units of one category as JSON

use crate::config::{load_sources, ServerConfig};
use metron::{ConversionResponse, Metron};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::io::{self, BufRead, Write};

pub const PROTOCOL_VERSION: &str = "2025-11-25";
const SERVER_NAME: &str = "metron";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
const CATEGORY_URI_PREFIX: &str = "metron://categories/";

// JSON-RPC error codes
const PARSE_ERROR: i32 = -32700;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;
const INTERNAL_ERROR: i32 = -32603;

// MCP Protocol types
#[derive(Debug, Deserialize)]
pub struct McpRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    id: Option<JsonValue>,
    method: String,
    #[serde(default)]
    params: Option<JsonValue>,
}

#[derive(Debug, Serialize)]
pub struct McpResponse {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<McpError>,
}

#[derive(Debug, Serialize)]
pub struct McpError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<JsonValue>,
}

impl McpError {
    fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), data: None }
    }

    fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(INVALID_PARAMS, message)
    }

    fn with_data(mut self, data: JsonValue) -> Self {
        self.data = Some(data);
        self
    }
}

impl McpResponse {
    fn reply(id: Option<JsonValue>, result: Result<JsonValue, McpError>) -> Self {
        let (result, error) = match result {
            Ok(r) => (Some(r), None),
            Err(e) => (None, Some(e)),
        };
        Self { jsonrpc: "2.0".to_string(), id, result, error }
    }
}

/// Server state shared by every request
pub struct Server {
    metron: Metron,
    config: ServerConfig,
}

impl Server {
    pub fn new(metron: Metron, config: ServerConfig) -> Self {
        Self { metron, config }
    }

    /// Serve line-delimited requests until EOF
    pub fn serve<R: BufRead, W: Write>(&self, mut reader: R, mut writer: W) -> io::Result<()> {
        let mut line = String::new();

        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                tracing::info!("client disconnected (EOF)");
                return Ok(());
            }

            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            tracing::debug!(bytes = line.len(), "received request");

            let response = match serde_json::from_str::<McpRequest>(line) {
                Ok(request) => {
                    let response = self.handle_request(&request);
                    // Notifications (no id) get no response
                    if request.id.is_none() {
                        tracing::debug!(method = %request.method, "notification processed");
                        continue;
                    }
                    response
                }
                Err(e) => {
                    tracing::warn!(error = %e, "unparseable request");
                    McpResponse::reply(None, Err(McpError::new(PARSE_ERROR, format!("Parse error: {}", e))))
                }
            };

            serde_json::to_writer(&mut writer, &response)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
    }

    pub fn handle_request(&self, request: &McpRequest) -> McpResponse {
        tracing::debug!(method = %request.method, "processing");

        let result = match request.method.as_str() {
            // Lifecycle
            "initialize" => self.handle_initialize(&request.params),
            "initialized" | "notifications/initialized" | "ping" => Ok(json!({})),

            // Tools
            "tools/list" => Ok(tools_list()),
            "tools/call" => self.handle_tool_call(&request.params),

            // Resources
            "resources/list" => Ok(self.resources_list()),
            "resources/read" => self.handle_resources_read(&request.params),

            _ => Err(McpError::new(METHOD_NOT_FOUND, format!("Method not found: {}", request.method))),
        };

        McpResponse::reply(request.id.clone(), result)
    }

    fn handle_initialize(&self, params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
        let client_info = params
            .as_ref()
            .and_then(|p| p.get("clientInfo"))
            .and_then(|c| c.get("name"))
            .and_then(|n| n.as_str())
            .unwrap_or("unknown");

        // Use client's protocol version for compatibility
        let client_protocol = params
            .as_ref()
            .and_then(|p| p.get("protocolVersion"))
            .and_then(|v| v.as_str())
            .unwrap_or(PROTOCOL_VERSION);

        tracing::info!(client = client_info, protocol = client_protocol, "client connected");

        Ok(json!({
            "protocolVersion": client_protocol,
            "serverInfo": {
                "name": SERVER_NAME,
                "version": SERVER_VERSION,
                "description": "Unit conversion between named units of measurement"
            },
            "capabilities": {
                "tools": { "listChanged": false },
                "resources": { "subscribe": false, "listChanged": false }
            },
            "instructions": "Use 'list_categories' and 'list_units' to discover unit names, then 'convert' to convert values. Unit names are case-insensitive."
        }))
    }

    fn handle_tool_call(&self, params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
        let params = params.as_ref().ok_or_else(|| McpError::invalid_params("Missing params"))?;

        let name = params
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;

        let args = params.get("arguments").cloned().unwrap_or(json!({}));

        match name {
            "convert" => self.tool_convert(&args),
            "list_categories" => Ok(self.tool_list_categories()),
            "list_units" => self.tool_list_units(&args),
            "reload" => self.tool_reload(),
            _ => Err(McpError::invalid_params(format!("Unknown tool: {}", name))),
        }
    }

    fn tool_convert(&self, args: &JsonValue) -> Result<JsonValue, McpError> {
        let value = number_arg(args, "value")?;
        let from = str_arg(args, "from")?;
        let to = str_arg(args, "to")?;

        let response = self.metron.conversion(value, from, to);
        let text = serde_json::to_string(&response)
            .map_err(|e| McpError::new(INTERNAL_ERROR, e.to_string()))?;

        let mut result = json!({
            "content": [{ "type": "text", "text": text }],
            "data": response,
            "isError": !response.is_ok()
        });
        if let Some(suggestions) = self.suggestions(&response, &[from, to]) {
            result["suggestions"] = suggestions;
        }
        Ok(result)
    }

    /// Similar names for every unknown unit in a failed conversion
    fn suggestions(&self, response: &ConversionResponse, names: &[&str]) -> Option<JsonValue> {
        if response.is_ok() {
            return None;
        }
        let registry = self.metron.registry();
        let hints: serde_json::Map<String, JsonValue> = names
            .iter()
            .filter(|n| !registry.contains(n))
            .map(|n| (n.to_string(), json!(registry.suggest(n, 5))))
            .collect();

        if hints.is_empty() {
            None
        } else {
            Some(JsonValue::Object(hints))
        }
    }

    fn tool_list_categories(&self) -> JsonValue {
        let categories = self.metron.categories();
        json!({
            "content": [{ "type": "text", "text": categories.join("\n") }],
            "data": categories
        })
    }

    fn tool_list_units(&self, args: &JsonValue) -> Result<JsonValue, McpError> {
        let category = str_arg(args, "category")?;
        let units = self.metron.units_by_category(category);

        if units.is_empty() {
            return Err(McpError::invalid_params(format!("Unknown category: {}", category))
                .with_data(json!({ "available": self.metron.categories() })));
        }

        let text = units
            .iter()
            .map(|u| format!("{} ({})", u.name, u.symbol))
            .collect::<Vec<_>>()
            .join("\n");

        Ok(json!({
            "content": [{ "type": "text", "text": text }],
            "data": units
        }))
    }

    fn tool_reload(&self) -> Result<JsonValue, McpError> {
        let units = load_sources(&self.metron, &self.config)
            .map_err(|e| McpError::new(INTERNAL_ERROR, format!("Reload failed: {}", e)))?;

        tracing::info!(units, "reloaded unit sources");
        Ok(json!({
            "content": [{ "type": "text", "text": format!("Loaded {} units", units) }],
            "units": units
        }))
    }

    fn resources_list(&self) -> JsonValue {
        let resources: Vec<JsonValue> = self.metron.categories().iter().map(|c| {
            json!({
                "uri": format!("{}{}", CATEGORY_URI_PREFIX, c),
                "name": c,
                "description": format!("Units in category {}", c),
                "mimeType": "application/json"
            })
        }).collect();

        json!({ "resources": resources })
    }

    fn handle_resources_read(&self, params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
        let uri = params
            .as_ref()
            .and_then(|p| p.get("uri"))
            .and_then(|u| u.as_str())
            .ok_or_else(|| McpError::invalid_params("Missing uri parameter"))?;

        let category = uri
            .strip_prefix(CATEGORY_URI_PREFIX)
            .ok_or_else(|| McpError::invalid_params(format!(
                "Invalid URI: {}. Expected {}{{name}}", uri, CATEGORY_URI_PREFIX
            )))?;

        let units = self.metron.units_by_category(category);
        if units.is_empty() {
            return Err(McpError::invalid_params(format!("Unknown category: {}", category)));
        }

        let text = serde_json::to_string_pretty(&units)
            .map_err(|e| McpError::new(INTERNAL_ERROR, e.to_string()))?;

        Ok(json!({
            "contents": [{
                "uri": uri,
                "mimeType": "application/json",
                "text": text
            }]
        }))
    }
}

fn tools_list() -> JsonValue {
    json!({
        "tools": [
            {
                "name": "convert",
                "description": "Convert a value from one unit to another. Both units must share a category and base unit.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "value": {
                            "type": "number",
                            "description": "Value to convert"
                        },
                        "from": {
                            "type": "string",
                            "description": "Source unit name (e.g., \"celsius\")"
                        },
                        "to": {
                            "type": "string",
                            "description": "Target unit name (e.g., \"fahrenheit\")"
                        }
                    },
                    "required": ["value", "from", "to"]
                }
            },
            {
                "name": "list_categories",
                "description": "List all unit categories.",
                "inputSchema": {
                    "type": "object",
                    "properties": {}
                }
            },
            {
                "name": "list_units",
                "description": "List the units of one category, sorted by name.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "category": {
                            "type": "string",
                            "description": "Category name, exactly as listed by list_categories"
                        }
                    },
                    "required": ["category"]
                }
            },
            {
                "name": "reload",
                "description": "Reload units from the built-in catalogue and the data directory.",
                "inputSchema": {
                    "type": "object",
                    "properties": {}
                }
            }
        ]
    })
}

fn str_arg<'a>(args: &'a JsonValue, name: &str) -> Result<&'a str, McpError> {
    args
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params(format!("Missing {} argument", name)))
}

/// Numbers may arrive as JSON numbers or numeric strings
fn number_arg(args: &JsonValue, name: &str) -> Result<f64, McpError> {
    match args.get(name) {
        Some(JsonValue::Number(n)) => n
            .as_f64()
            .ok_or_else(|| McpError::invalid_params(format!("{} is out of range", name))),
        Some(JsonValue::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| McpError::invalid_params(format!("{} is not a number: {}", name, s))),
        Some(_) => Err(McpError::invalid_params(format!("{} must be a number", name))),
        None => Err(McpError::invalid_params(format!("Missing {} argument", name))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn test_server() -> Server {
        let config = ServerConfig {
            data_path: PathBuf::from("/nonexistent/metron/data"),
            builtin: true,
        };
        let metron = Metron::with_builtin_units().unwrap();
        Server::new(metron, config)
    }

    fn call(server: &Server, method: &str, params: JsonValue) -> JsonValue {
        let request: McpRequest = serde_json::from_value(json!({
            "jsonrpc": "2.0", "id": 1, "method": method, "params": params
        }))
        .unwrap();
        serde_json::to_value(server.handle_request(&request)).unwrap()
    }

    fn tool(server: &Server, name: &str, arguments: JsonValue) -> JsonValue {
        call(server, "tools/call", json!({ "name": name, "arguments": arguments }))
    }

    #[test]
    fn test_initialize() {
        let server = test_server();
        let resp = call(&server, "initialize", json!({
            "protocolVersion": "2024-11-05",
            "clientInfo": { "name": "test" }
        }));
        assert_eq!(resp["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(resp["result"]["serverInfo"]["name"], "metron");
    }

    #[test]
    fn test_unknown_method() {
        let server = test_server();
        let resp = call(&server, "prompts/list", json!({}));
        assert_eq!(resp["error"]["code"], METHOD_NOT_FOUND);
        assert!(resp.get("result").is_none());
    }

    #[test]
    fn test_tools_list() {
        let server = test_server();
        let resp = call(&server, "tools/list", json!({}));
        let names: Vec<&str> = resp["result"]["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["convert", "list_categories", "list_units", "reload"]);
    }

    #[test]
    fn test_convert_tool() {
        let server = test_server();
        let resp = tool(&server, "convert", json!({ "value": 1000, "from": "joule", "to": "kilojoule" }));
        let result = &resp["result"];
        assert_eq!(result["isError"], false);
        assert_eq!(result["data"]["ok"], true);
        assert_eq!(result["data"]["result"], 1.0);
        assert_eq!(result["data"]["tosymbol"], "kJ");
    }

    #[test]
    fn test_convert_tool_string_value() {
        let server = test_server();
        let resp = tool(&server, "convert", json!({ "value": "100", "from": "Celsius", "to": "Fahrenheit" }));
        let f = resp["result"]["data"]["result"].as_f64().unwrap();
        assert!((f - 212.0).abs() < 1e-9);
    }

    #[test]
    fn test_convert_tool_unknown_unit() {
        let server = test_server();
        let resp = tool(&server, "convert", json!({ "value": 1, "from": "kilojoul", "to": "joule" }));
        let result = &resp["result"];
        assert_eq!(result["isError"], true);
        assert_eq!(result["data"], json!({ "ok": false, "message": "unknown unit: kilojoul" }));

        let hints = result["suggestions"]["kilojoul"].as_array().unwrap();
        assert_eq!(hints[0], "kilojoule");
        assert!(result["suggestions"].get("joule").is_none());
    }

    #[test]
    fn test_convert_tool_missing_args() {
        let server = test_server();
        let resp = tool(&server, "convert", json!({ "value": 1, "from": "joule" }));
        assert_eq!(resp["error"]["code"], INVALID_PARAMS);

        let resp = tool(&server, "convert", json!({ "value": "lots", "from": "joule", "to": "joule" }));
        assert_eq!(resp["error"]["code"], INVALID_PARAMS);
    }

    #[test]
    fn test_list_tools() {
        let server = test_server();
        let resp = tool(&server, "list_categories", json!({}));
        let categories = resp["result"]["data"].as_array().unwrap();
        assert!(categories.contains(&json!("Energy")));

        let resp = tool(&server, "list_units", json!({ "category": "Temperature" }));
        let names: Vec<&str> = resp["result"]["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|u| u["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["celsius", "fahrenheit", "kelvin", "rankine"]);

        let resp = tool(&server, "list_units", json!({ "category": "Nope" }));
        assert_eq!(resp["error"]["code"], INVALID_PARAMS);
    }

    #[test]
    fn test_reload() {
        let server = test_server();
        server.metron.clear();
        let resp = tool(&server, "reload", json!({}));
        assert!(resp["result"]["units"].as_u64().unwrap() > 100);
        assert!(server.metron.registry().contains("joule"));
    }

    #[test]
    fn test_failed_reload_keeps_serving() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("broken.json"), "{ broken").unwrap();

        let config = ServerConfig { data_path: dir.path().to_path_buf(), builtin: true };
        let server = Server::new(Metron::with_builtin_units().unwrap(), config);
        let before = server.metron.registry().len();

        let resp = tool(&server, "reload", json!({}));
        assert_eq!(resp["error"]["code"], INTERNAL_ERROR);
        assert_eq!(server.metron.registry().len(), before);

        let resp = tool(&server, "convert", json!({ "value": 1, "from": "kilometer", "to": "meter" }));
        assert_eq!(resp["result"]["data"]["result"], 1000.0);
    }

    #[test]
    fn test_resources() {
        let server = test_server();
        let resp = call(&server, "resources/list", json!({}));
        let uris: Vec<&str> = resp["result"]["resources"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["uri"].as_str().unwrap())
            .collect();
        assert!(uris.contains(&"metron://categories/Energy"));

        let resp = call(&server, "resources/read", json!({ "uri": "metron://categories/Energy" }));
        let text = resp["result"]["contents"][0]["text"].as_str().unwrap();
        let units: JsonValue = serde_json::from_str(text).unwrap();
        assert!(units.as_array().unwrap().iter().any(|u| u["name"] == "kilowatt-hour"));

        let resp = call(&server, "resources/read", json!({ "uri": "file:///etc/passwd" }));
        assert_eq!(resp["error"]["code"], INVALID_PARAMS);
    }

    #[test]
    fn test_serve_loop() {
        let server = test_server();
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#, "\n",
            "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#, "\n",
            "not json\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"convert","arguments":{"value":1,"from":"kilometer","to":"meter"}}}"#, "\n",
        );

        let mut output = Vec::new();
        server.serve(input.as_bytes(), &mut output).unwrap();

        let lines: Vec<JsonValue> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["id"], 1);
        assert_eq!(lines[1]["error"]["code"], PARSE_ERROR);
        assert_eq!(lines[2]["id"], 2);
        assert_eq!(lines[2]["result"]["data"]["result"], 1000.0);
    }
}
