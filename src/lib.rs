//! Smart MCP - reusable instruction shortcuts behind a single MCP tool.
//!
//! Shortcuts come from a global file (`~/.claude/smart_mcp/shortcuts.json`)
//! merged with a project file (`./shortcuts.json`), project entries winning.

pub mod mcp;
pub mod paths;
pub mod shortcuts;

// Re-export commonly used types
pub use mcp::{ShortcutTool, ToolError};
pub use paths::ShortcutPaths;
pub use shortcuts::{ShortcutEntry, ShortcutSet, ShortcutStore};
