//! The `sm` tool: shortcut catalog and invocation

use log::debug;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::shortcuts::{ShortcutSet, ShortcutStore};

/// Name of the single tool this server exposes.
pub const TOOL_NAME: &str = "sm";

const DESCRIPTION_PREAMBLE: &str =
    "Smart MCP shortcut tool. Execute predefined instruction shortcuts.\n\nAvailable shortcuts:\n";
const DESCRIPTION_USAGE: &str =
    "\n\nUsage: Provide the shortcut name and optional context/target.";
const CONTEXT_DESCRIPTION: &str = "Optional context or target for the shortcut (e.g., file path, code snippet, specific area to focus on)";

/// Failures of a single `sm` call. None of them affect later requests.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Missing arguments")]
    MissingArguments,

    #[error("Missing required argument: {0}")]
    MissingRequiredField(&'static str),

    #[error("Unknown shortcut: '{name}'. Available shortcuts: {}", .available.join(", "))]
    UnknownShortcut {
        name: String,
        available: Vec<String>,
    },
}

/// Tool listing entry as sent in `tools/list`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// One item of a tool result.
///
/// Only `Text` is produced by the shortcut tool.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    Text {
        text: String,
    },
    Image {
        data: String,
        #[serde(rename = "mimeType")]
        mime_type: String,
    },
    Resource {
        resource: Value,
    },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ToolResult {
    pub content: Vec<Content>,
    #[serde(rename = "isError", skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// Error reported in-band, so the calling model can read the message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![Content::Text {
                text: message.into(),
            }],
            is_error: true,
        }
    }

    /// Concatenated text of all text items.
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(|c| match c {
                Content::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Binds a [`ShortcutStore`] to the tool-calling protocol.
///
/// Every list and call reloads the store.
#[derive(Debug, Clone)]
pub struct ShortcutTool {
    store: ShortcutStore,
}

impl ShortcutTool {
    pub fn new(store: ShortcutStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ShortcutStore {
        &self.store
    }

    pub fn list_tools(&self) -> Vec<ToolDescriptor> {
        let shortcuts = self.store.load_merged();
        vec![descriptor(&shortcuts)]
    }

    pub fn call_tool(
        &self,
        name: &str,
        arguments: Option<&Value>,
    ) -> Result<ToolResult, ToolError> {
        if name != TOOL_NAME {
            return Err(ToolError::UnknownTool(name.to_string()));
        }

        let args = match arguments.and_then(Value::as_object) {
            Some(map) if !map.is_empty() => map,
            _ => return Err(ToolError::MissingArguments),
        };

        let shortcut_name = args.get("shortcut").and_then(Value::as_str).unwrap_or("");
        let context = args.get("context").and_then(Value::as_str);

        self.render(shortcut_name, context).map(ToolResult::text)
    }

    /// Resolve one shortcut against a fresh load and substitute `context`.
    pub fn render(&self, shortcut: &str, context: Option<&str>) -> Result<String, ToolError> {
        if shortcut.is_empty() {
            return Err(ToolError::MissingRequiredField("shortcut"));
        }

        let shortcuts = self.store.load_merged();
        let entry = shortcuts
            .get(shortcut)
            .ok_or_else(|| ToolError::UnknownShortcut {
                name: shortcut.to_string(),
                available: shortcuts.names().into_iter().map(String::from).collect(),
            })?;

        debug!("Resolved shortcut '{}'", shortcut);
        Ok(entry.render(context))
    }

    /// `name: description` per merged shortcut, in catalog order.
    pub fn catalog_lines(&self) -> Vec<String> {
        self.store
            .load_merged()
            .iter()
            .map(|e| format!("{}: {}", e.name, e.description))
            .collect()
    }
}

/// Build the `sm` descriptor from a loaded shortcut set.
pub fn descriptor(shortcuts: &ShortcutSet) -> ToolDescriptor {
    let shortcut_list = shortcuts
        .iter()
        .map(|e| format!("- {}: {}", e.name, e.description))
        .collect::<Vec<_>>()
        .join("\n");

    ToolDescriptor {
        name: TOOL_NAME.to_string(),
        description: format!("{DESCRIPTION_PREAMBLE}{shortcut_list}{DESCRIPTION_USAGE}"),
        input_schema: json!({
            "type": "object",
            "properties": {
                "shortcut": {
                    "type": "string",
                    "description": format!(
                        "Shortcut name to execute. Available: {}",
                        shortcuts.names().join(", ")
                    )
                },
                "context": {
                    "type": "string",
                    "description": CONTEXT_DESCRIPTION
                }
            },
            "required": ["shortcut"]
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::ShortcutPaths;
    use crate::shortcuts::ShortcutEntry;
    use std::fs;
    use tempfile::TempDir;

    fn tool_with(project: &str) -> (TempDir, ShortcutTool) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shortcuts.json");
        fs::write(&path, project).unwrap();
        let tool = ShortcutTool::new(ShortcutStore::new(ShortcutPaths::single(path)));
        (dir, tool)
    }

    const REVIEW: &str = r#"{"shortcuts": {
        "review": {"description": "Code review", "instruction": "Review {target} for bugs."},
        "explain": {"description": "Explain code", "instruction": "Explain {file} like I'm new."}
    }}"#;

    #[test]
    fn test_descriptor_lists_shortcuts() {
        let set: ShortcutSet = vec![
            ShortcutEntry::new("review", "Code review", "r"),
            ShortcutEntry::new("docs", "Write docs", "d"),
        ]
        .into_iter()
        .collect();

        let d = descriptor(&set);
        assert_eq!(d.name, "sm");
        assert_eq!(
            d.description,
            "Smart MCP shortcut tool. Execute predefined instruction shortcuts.\n\n\
             Available shortcuts:\n- review: Code review\n- docs: Write docs\n\n\
             Usage: Provide the shortcut name and optional context/target."
        );
        assert_eq!(
            d.input_schema["properties"]["shortcut"]["description"],
            "Shortcut name to execute. Available: review, docs"
        );
        assert_eq!(d.input_schema["required"], json!(["shortcut"]));
        assert_eq!(d.input_schema["properties"]["context"]["type"], "string");
    }

    #[test]
    fn test_descriptor_empty_set() {
        let d = descriptor(&ShortcutSet::new());
        assert!(d.description.contains("Available shortcuts:\n\n\nUsage:"));
        assert_eq!(
            d.input_schema["properties"]["shortcut"]["description"],
            "Shortcut name to execute. Available: "
        );
    }

    #[test]
    fn test_list_tools_single_descriptor() {
        let (_dir, tool) = tool_with(REVIEW);
        let tools = tool.list_tools();
        assert_eq!(tools.len(), 1);
        assert!(tools[0].description.contains("- review: Code review"));
        assert!(tools[0].description.contains("- explain: Explain code"));
    }

    #[test]
    fn test_call_substitutes_context() {
        let (_dir, tool) = tool_with(REVIEW);
        let args = json!({"shortcut": "review", "context": "main.go"});
        let result = tool.call_tool("sm", Some(&args)).unwrap();
        assert_eq!(result, ToolResult::text("Review main.go for bugs."));
        assert!(!result.is_error);
    }

    #[test]
    fn test_call_without_context_is_verbatim() {
        let (_dir, tool) = tool_with(REVIEW);
        let args = json!({"shortcut": "review"});
        let result = tool.call_tool("sm", Some(&args)).unwrap();
        assert_eq!(result.text_content(), "Review {target} for bugs.");

        let args = json!({"shortcut": "review", "context": ""});
        let result = tool.call_tool("sm", Some(&args)).unwrap();
        assert_eq!(result.text_content(), "Review {target} for bugs.");
    }

    #[test]
    fn test_call_unknown_tool() {
        let (_dir, tool) = tool_with(REVIEW);
        let args = json!({"shortcut": "review"});
        assert_eq!(
            tool.call_tool("other", Some(&args)),
            Err(ToolError::UnknownTool("other".to_string()))
        );
    }

    #[test]
    fn test_call_missing_arguments() {
        let (_dir, tool) = tool_with(REVIEW);
        assert_eq!(tool.call_tool("sm", None), Err(ToolError::MissingArguments));
        assert_eq!(
            tool.call_tool("sm", Some(&Value::Null)),
            Err(ToolError::MissingArguments)
        );
        assert_eq!(
            tool.call_tool("sm", Some(&json!({}))),
            Err(ToolError::MissingArguments)
        );
    }

    #[test]
    fn test_call_missing_shortcut_field() {
        let (_dir, tool) = tool_with(REVIEW);
        for args in [json!({"context": "x"}), json!({"shortcut": ""}), json!({"shortcut": 3})] {
            let err = tool.call_tool("sm", Some(&args)).unwrap_err();
            assert_eq!(err, ToolError::MissingRequiredField("shortcut"));
            assert_eq!(err.to_string(), "Missing required argument: shortcut");
        }
    }

    #[test]
    fn test_call_unknown_shortcut_lists_available() {
        let (_dir, tool) = tool_with(REVIEW);
        let args = json!({"shortcut": "missing"});
        let err = tool.call_tool("sm", Some(&args)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown shortcut: 'missing'. Available shortcuts: review, explain"
        );
    }

    #[test]
    fn test_call_is_idempotent() {
        let (_dir, tool) = tool_with(REVIEW);
        let args = json!({"shortcut": "explain", "context": "lib.rs"});
        let first = tool.call_tool("sm", Some(&args)).unwrap();
        let second = tool.call_tool("sm", Some(&args)).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.text_content(), "Explain lib.rs like I'm new.");
    }

    #[test]
    fn test_render_with_and_without_context() {
        let (_dir, tool) = tool_with(REVIEW);
        assert_eq!(
            tool.render("review", Some("main.go")).unwrap(),
            "Review main.go for bugs."
        );
        assert_eq!(tool.render("review", None).unwrap(), "Review {target} for bugs.");
    }

    #[test]
    fn test_render_unknown_shortcut() {
        let (_dir, tool) = tool_with(REVIEW);
        let err = tool.render("missing", Some("x")).unwrap_err();
        assert_eq!(
            err,
            ToolError::UnknownShortcut {
                name: "missing".to_string(),
                available: vec!["review".to_string(), "explain".to_string()],
            }
        );
        assert_eq!(
            tool.render("", None),
            Err(ToolError::MissingRequiredField("shortcut"))
        );
    }

    #[test]
    fn test_catalog_lines() {
        let (_dir, tool) = tool_with(REVIEW);
        assert_eq!(
            tool.catalog_lines(),
            vec!["review: Code review", "explain: Explain code"]
        );
    }

    #[test]
    fn test_result_serialization() {
        let ok = serde_json::to_value(ToolResult::text("hi")).unwrap();
        assert_eq!(ok, json!({"content": [{"type": "text", "text": "hi"}]}));

        let err = serde_json::to_value(ToolResult::error("boom")).unwrap();
        assert_eq!(
            err,
            json!({"content": [{"type": "text", "text": "boom"}], "isError": true})
        );
    }
}
