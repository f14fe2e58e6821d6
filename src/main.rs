use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;

use smart_mcp::mcp::{self, ShortcutTool};
use smart_mcp::paths::{self, ShortcutPaths};
use smart_mcp::shortcuts::ShortcutStore;

#[derive(Parser)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about = "Reusable instruction shortcuts over MCP", long_about = None)]
struct Cli {
    /// Global shortcuts file (default: ~/.claude/smart_mcp/shortcuts.json)
    #[arg(long, global = true, value_name = "PATH", conflicts_with = "no_global")]
    global_file: Option<PathBuf>,

    /// Project shortcuts file (default: ./shortcuts.json, resolved per request)
    #[arg(long, global = true, value_name = "PATH")]
    project_file: Option<PathBuf>,

    /// Read only the project file
    #[arg(long, global = true)]
    no_global: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the `sm` tool over stdio (default)
    Serve,

    /// Print the merged shortcut catalog
    List,

    /// Print a shortcut's instruction with context substituted
    Render {
        /// Shortcut name
        shortcut: String,

        /// Value for {task}, {context}, {target} and {file}
        context: Option<String>,
    },
}

impl Cli {
    fn shortcut_paths(&self) -> ShortcutPaths {
        let project = self
            .project_file
            .clone()
            .unwrap_or_else(paths::project_shortcuts_path);
        let global = if self.no_global {
            None
        } else {
            Some(
                self.global_file
                    .clone()
                    .unwrap_or_else(paths::global_shortcuts_path),
            )
        };
        ShortcutPaths::new(global, project)
    }
}

fn setup_logging() {
    // stdout carries the protocol; everything else goes to stderr
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();
}

fn list(tool: &ShortcutTool) {
    let lines = tool.catalog_lines();
    if lines.is_empty() {
        println!("No shortcuts found.");
        return;
    }
    for line in lines {
        println!("{}", line);
    }
}

fn main() -> Result<()> {
    setup_logging();

    let cli = Cli::parse();
    let tool = ShortcutTool::new(ShortcutStore::new(cli.shortcut_paths()));
    let sources = tool.store().paths();
    info!(
        "Shortcut sources: global={:?} project={}",
        sources.global,
        sources.project.display()
    );

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            mcp::run_mcp_server(&tool).context("MCP server failed")?;
        }
        Commands::List => list(&tool),
        Commands::Render { shortcut, context } => {
            println!("{}", tool.render(&shortcut, context.as_deref())?);
        }
    }

    Ok(())
}
