//! Shortcut store
//!
//! Reads `shortcuts.json` documents and merges them into one ordered set.
//! Nothing is cached: every call goes back to disk, so edits show up on the
//! next request without a restart.
//!
//! ```text
//! { "shortcuts": { "<name>": { "description": "...", "instruction": "..." } } }
//! ```

use std::fmt;
use std::fs;
use std::path::Path;

use log::{info, warn};
use serde::Deserialize;
use serde_json::Value;

use crate::paths::ShortcutPaths;

/// Tokens replaced by the caller's context, in replacement order.
pub const PLACEHOLDERS: [&str; 4] = ["{task}", "{context}", "{target}", "{file}"];

/// A named instruction template plus its catalog description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutEntry {
    pub name: String,
    pub description: String,
    pub instruction: String,
}

impl ShortcutEntry {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        instruction: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            instruction: instruction.into(),
        }
    }

    /// Instruction with every placeholder replaced by `context`.
    ///
    /// An empty or missing context leaves the template untouched, unresolved
    /// placeholders included.
    pub fn render(&self, context: Option<&str>) -> String {
        match context {
            Some(ctx) if !ctx.is_empty() => substitute(&self.instruction, ctx),
            _ => self.instruction.clone(),
        }
    }
}

/// Literal, unescaped replacement of all four placeholders.
///
/// Replacements run in [`PLACEHOLDERS`] order over the evolving string, so a
/// context that itself contains a later token gets substituted again.
pub fn substitute(template: &str, context: &str) -> String {
    PLACEHOLDERS
        .iter()
        .fold(template.to_string(), |acc, token| acc.replace(token, context))
}

/// On-disk shape of one shortcut.
#[derive(Deserialize)]
struct RawEntry {
    #[serde(default)]
    description: String,
    instruction: String,
}

/// Insertion-ordered mapping from name to entry.
///
/// Inserting an existing name replaces the entry in place, keeping its
/// original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortcutSet {
    entries: Vec<ShortcutEntry>,
}

impl ShortcutSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite. Returns the replaced entry, if any.
    pub fn insert(&mut self, entry: ShortcutEntry) -> Option<ShortcutEntry> {
        match self.entries.iter_mut().find(|e| e.name == entry.name) {
            Some(existing) => Some(std::mem::replace(existing, entry)),
            None => {
                self.entries.push(entry);
                None
            }
        }
    }

    /// Merge `other` on top of `self`; `other` wins on collisions.
    pub fn merge(&mut self, other: ShortcutSet) {
        for entry in other.entries {
            self.insert(entry);
        }
    }

    pub fn get(&self, name: &str) -> Option<&ShortcutEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShortcutEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<ShortcutEntry> for ShortcutSet {
    fn from_iter<I: IntoIterator<Item = ShortcutEntry>>(iter: I) -> Self {
        let mut set = ShortcutSet::new();
        for entry in iter {
            set.insert(entry);
        }
        set
    }
}

/// Which configured file a shortcut set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Global,
    Project,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Global => write!(f, "global"),
            Source::Project => write!(f, "project-local"),
        }
    }
}

/// Loads shortcuts from an injected pair of paths.
#[derive(Debug, Clone)]
pub struct ShortcutStore {
    paths: ShortcutPaths,
}

impl ShortcutStore {
    pub fn new(paths: ShortcutPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &ShortcutPaths {
        &self.paths
    }

    /// Load one shortcuts file.
    ///
    /// Never fails. A missing file is an empty set; unreadable or malformed
    /// files are logged and also yield an empty set.
    pub fn load_from_file(path: &Path) -> ShortcutSet {
        if !path.exists() {
            return ShortcutSet::new();
        }

        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!("Error loading {}: {}", path.display(), e);
                return ShortcutSet::new();
            }
        };

        parse_shortcuts(&content, path)
    }

    /// Load global then project, project overriding global.
    pub fn load_merged(&self) -> ShortcutSet {
        let mut shortcuts = match &self.paths.global {
            Some(global) => Self::load_from_file(global),
            None => ShortcutSet::new(),
        };

        let project = Self::load_from_file(&self.paths.project);
        shortcuts.merge(project);

        if let Some(summary) = self.source_summary(&shortcuts) {
            info!("Loaded shortcuts from {}", summary);
        }

        shortcuts
    }

    /// Comma-joined present sources for the load line, `None` when `merged`
    /// is empty.
    pub fn source_summary(&self, merged: &ShortcutSet) -> Option<String> {
        if merged.is_empty() {
            return None;
        }
        let sources = self.present_sources();
        if sources.is_empty() {
            return Some("none".to_string());
        }
        Some(
            sources
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        )
    }

    /// Configured sources whose files currently exist.
    pub fn present_sources(&self) -> Vec<Source> {
        let mut sources = Vec::new();
        if self.paths.global.as_deref().is_some_and(Path::exists) {
            sources.push(Source::Global);
        }
        if self.paths.project.exists() {
            sources.push(Source::Project);
        }
        sources
    }
}

fn parse_shortcuts(content: &str, path: &Path) -> ShortcutSet {
    let doc: Value = match serde_json::from_str(content) {
        Ok(v) => v,
        Err(e) => {
            warn!("Error parsing {}: {}", path.display(), e);
            return ShortcutSet::new();
        }
    };

    // Other top-level keys are ignored
    let Some(shortcuts) = doc.get("shortcuts") else {
        return ShortcutSet::new();
    };

    let Some(members) = shortcuts.as_object() else {
        warn!(
            "Error loading {}: \"shortcuts\" must be an object",
            path.display()
        );
        return ShortcutSet::new();
    };

    let mut set = ShortcutSet::new();
    for (name, raw) in members {
        if name.is_empty() {
            warn!("Skipping unnamed shortcut in {}", path.display());
            continue;
        }
        match RawEntry::deserialize(raw) {
            Ok(entry) => {
                set.insert(ShortcutEntry::new(
                    name.as_str(),
                    entry.description,
                    entry.instruction,
                ));
            }
            Err(e) => {
                warn!("Skipping shortcut '{}' in {}: {}", name, path.display(), e);
            }
        }
    }
    set
}
