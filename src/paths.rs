//! Single source of truth for where shortcut files live.
//!
//! This module defines WHERE data lives. It has no I/O and no parsing.
//!
//! # User-Level Path (~/.claude/smart_mcp/)
//!
//! ```text
//! ~/.claude/smart_mcp/
//! └── shortcuts.json           # Global shortcuts (base defaults)
//! ```
//!
//! # Project-Level Path
//!
//! ```text
//! project/
//! └── shortcuts.json           # Project shortcuts (override global)
//! ```

use std::path::PathBuf;

/// Shortcut file name used at both levels.
pub const SHORTCUTS_FILE: &str = "shortcuts.json";

// =============================================================================
// User Level (~/.claude/smart_mcp/)
// =============================================================================

/// Directory holding the global shortcuts: `~/.claude/smart_mcp/`
pub fn smart_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".claude")
        .join("smart_mcp")
}

/// Global shortcuts file: `~/.claude/smart_mcp/shortcuts.json`
pub fn global_shortcuts_path() -> PathBuf {
    smart_home().join(SHORTCUTS_FILE)
}

// =============================================================================
// Project Level
// =============================================================================

/// Project shortcuts file, relative: `shortcuts.json`
///
/// Resolved against the working directory at read time, not at startup.
pub fn project_shortcuts_path() -> PathBuf {
    PathBuf::from(SHORTCUTS_FILE)
}

// =============================================================================
// Injected pair
// =============================================================================

/// The pair of shortcut sources a store reads on every load.
///
/// `global: None` is single-file mode: only `project` is consulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutPaths {
    pub global: Option<PathBuf>,
    pub project: PathBuf,
}

impl ShortcutPaths {
    /// Global file under the user's home, project file in the working directory.
    pub fn hierarchical() -> Self {
        Self {
            global: Some(global_shortcuts_path()),
            project: project_shortcuts_path(),
        }
    }

    /// Read one file only.
    pub fn single(path: impl Into<PathBuf>) -> Self {
        Self {
            global: None,
            project: path.into(),
        }
    }

    pub fn new(global: Option<PathBuf>, project: PathBuf) -> Self {
        Self { global, project }
    }
}

impl Default for ShortcutPaths {
    fn default() -> Self {
        Self::hierarchical()
    }
}
