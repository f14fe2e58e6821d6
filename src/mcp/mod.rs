//! MCP (Model Context Protocol) server
//!
//! JSON-RPC 2.0 over stdio. No external SDK - blocking I/O, minimal dependencies.

pub mod protocol;
mod server;
pub mod tool;

pub use server::{dispatch, run_mcp_server, serve, PROTOCOL_VERSION, SERVER_NAME};
pub use tool::{ShortcutTool, ToolDescriptor, ToolError, ToolResult, TOOL_NAME};
