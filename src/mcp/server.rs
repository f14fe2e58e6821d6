//! MCP server - stdio transport

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde_json::json;
use std::io::{BufRead, BufReader, Write};

use super::protocol::{
    Request, Response, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND,
    PARSE_ERROR,
};
use super::tool::{ShortcutTool, ToolResult};

/// MCP revision advertised in `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "smart-mcp";

/// Run MCP server over stdio
pub fn run_mcp_server(tool: &ShortcutTool) -> Result<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let reader = BufReader::new(stdin.lock());

    info!("{}: MCP server ready", SERVER_NAME);
    serve(reader, stdout.lock(), tool)
}

/// Serve newline-delimited JSON-RPC until `reader` hits EOF.
pub fn serve<R: BufRead, W: Write>(reader: R, mut writer: W, tool: &ShortcutTool) -> Result<()> {
    for line in reader.lines() {
        let line = line.context("Failed to read request")?;
        if line.trim().is_empty() {
            continue;
        }

        let request: Request = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                let resp = Response::error(None, PARSE_ERROR, &format!("Parse error: {}", e));
                write_response(&mut writer, &resp)?;
                continue;
            }
        };

        if request.jsonrpc != "2.0" {
            let resp = Response::error(
                request.id.clone(),
                INVALID_REQUEST,
                &format!(
                    "Invalid JSON-RPC version: expected 2.0, got {}",
                    request.jsonrpc
                ),
            );
            write_response(&mut writer, &resp)?;
            continue;
        }

        if let Some(response) = dispatch(&request, tool) {
            write_response(&mut writer, &response)?;
        }
    }

    info!("{}: stdin closed, shutting down", SERVER_NAME);
    Ok(())
}

fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    writeln!(writer, "{}", serde_json::to_string(response)?)
        .context("Failed to write response")?;
    writer.flush().context("Failed to flush response")?;
    Ok(())
}

/// Route one request. Notifications produce no response.
pub fn dispatch(req: &Request, tool: &ShortcutTool) -> Option<Response> {
    if req.is_notification() {
        debug!("Notification: {}", req.method);
        return None;
    }

    let response = match req.method.as_str() {
        "initialize" => handle_initialize(req),
        "ping" => Response::success(req.id.clone(), json!({})),
        "tools/list" => handle_list_tools(req, tool),
        "tools/call" => handle_tool_call(req, tool),
        other => Response::error(
            req.id.clone(),
            METHOD_NOT_FOUND,
            &format!("Method not found: {}", other),
        ),
    };
    Some(response)
}

fn handle_initialize(req: &Request) -> Response {
    Response::success(
        req.id.clone(),
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION")
            }
        }),
    )
}

fn handle_list_tools(req: &Request, tool: &ShortcutTool) -> Response {
    let tools = tool.list_tools();
    match serde_json::to_value(&tools) {
        Ok(tools) => Response::success(req.id.clone(), json!({ "tools": tools })),
        Err(e) => Response::error(req.id.clone(), INTERNAL_ERROR, &e.to_string()),
    }
}

fn handle_tool_call(req: &Request, tool: &ShortcutTool) -> Response {
    let Some(name) = req.params.get("name").and_then(|v| v.as_str()) else {
        return Response::error(
            req.id.clone(),
            INVALID_PARAMS,
            "Invalid params: missing tool name",
        );
    };
    let arguments = req.params.get("arguments");

    let result = tool.call_tool(name, arguments).unwrap_or_else(|e| {
        warn!("{} call failed: {}", name, e);
        ToolResult::error(e.to_string())
    });

    match serde_json::to_value(&result) {
        Ok(value) => Response::success(req.id.clone(), value),
        Err(e) => Response::error(req.id.clone(), INTERNAL_ERROR, &e.to_string()),
    }
}
