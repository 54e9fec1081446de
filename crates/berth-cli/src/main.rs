//! # Berth CLI
//!
//! Command-line interface for the Berth workspace launcher.
//!
//! ## Commands
//!
//! - `berth list [pattern]` - List cataloged workspaces, optionally filtered
//! - `berth open <name>` - Launch a workspace in the editor
//! - `berth new <name>` - Create a workspace descriptor under the root
//! - `berth pin <name>` - Pin a workspace, or unpin it if already pinned
//! - `berth repair` - Backfill missing structure in descriptor files
//! - `berth tags` - List every tag present in the catalog
//! - `berth interactive` - Start the interactive picker
//!
//! ## Example Usage
//!
//! ```bash
//! # List everything under the configured root
//! berth list
//!
//! # Filter by text and tag
//! berth list api --tag backend
//!
//! # Launch straight into the editor
//! berth open api
//! ```

mod app;
mod commands;
mod editor;
mod tui;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Berth - Catalog and launch editor workspaces
#[derive(Parser)]
#[command(name = "berth")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Scan this root instead of the configured one
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List cataloged workspaces
    List {
        /// Filter text matched against name, description, and path
        pattern: Option<String>,

        /// Only show workspaces carrying this tag
        #[arg(short, long)]
        tag: Option<String>,

        /// Only show pinned workspaces
        #[arg(short, long)]
        pinned: bool,

        /// Only show recently launched workspaces
        #[arg(short, long)]
        recent: bool,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// Launch a workspace in the editor
    Open {
        /// Workspace name or descriptor path
        name: String,
    },

    /// Create a new workspace descriptor under the root
    New {
        /// Name of the workspace to create
        name: String,

        /// Description stored in the descriptor
        #[arg(short, long, default_value = "")]
        description: String,

        /// Tag stored in the descriptor (repeatable)
        #[arg(short, long)]
        tag: Vec<String>,

        /// Launch the new workspace immediately
        #[arg(short, long)]
        open: bool,
    },

    /// Pin a workspace, or unpin it if already pinned
    Pin {
        /// Workspace name or descriptor path
        name: String,
    },

    /// Backfill missing structure in descriptor files
    Repair,

    /// List every tag present in the catalog
    Tags,

    /// Start the interactive picker
    #[command(alias = "i")]
    Interactive,
}

#[derive(Clone, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .init();

    // Load configuration
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => berth_core::Config::default_config_path()?,
    };
    let mut config = berth_core::Config::load_from(&config_path)?;

    if let Some(root) = cli.root {
        config.general.root = root;
    }

    // Execute command
    match cli.command {
        Commands::List {
            pattern,
            tag,
            pinned,
            recent,
            output,
        } => commands::list::run(
            config,
            config_path,
            pattern.as_deref(),
            tag.as_deref(),
            pinned,
            recent,
            output,
        ),
        Commands::Open { name } => commands::open::run(config, config_path, &name),
        Commands::New {
            name,
            description,
            tag,
            open,
        } => commands::new::run(config, config_path, &name, &description, tag, open),
        Commands::Pin { name } => commands::pin::run(config, config_path, &name),
        Commands::Repair => commands::repair::run(config, config_path),
        Commands::Tags => commands::tags::run(config, config_path),
        Commands::Interactive => tui::run(config, config_path),
    }
}
