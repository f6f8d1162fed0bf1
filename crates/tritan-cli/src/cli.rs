use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tritan_core::{LlmProvider, NodeKind};

/// Tritan - edit, validate and run visual workflows from the terminal
#[derive(Parser, Debug)]
#[command(name = "tritan")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the persisted workflow
    #[arg(long, global = true, env = "TRITAN_STATE_DIR", default_value = ".tritan")]
    pub state_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start a fresh empty workflow
    New {
        #[arg(long)]
        name: Option<String>,
    },
    /// Print the current workflow
    Show {
        /// Print the export document instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Rename the workflow
    Rename { name: String },
    /// Add a node of the given kind
    Add {
        kind: NodeKind,
        #[arg(long, default_value_t = 0.0)]
        x: f64,
        #[arg(long, default_value_t = 0.0)]
        y: f64,
    },
    /// Connect two nodes
    Connect {
        source: String,
        target: String,
        #[arg(long)]
        source_handle: Option<String>,
        #[arg(long)]
        target_handle: Option<String>,
    },
    /// Update node data; only the given fields change
    Set {
        node_id: String,
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        prompt: Option<String>,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        provider: Option<LlmProvider>,
        #[arg(long)]
        temperature: Option<f64>,
        /// Config entry as key=value; the value is read as JSON when it parses
        #[arg(long = "config", value_name = "KEY=VALUE")]
        config: Vec<String>,
    },
    /// Remove a node; its edges stay
    Remove { node_id: String },
    /// Remove an edge
    Disconnect { edge_id: String },
    /// Validate the workflow with the engine, or locally when it is unreachable
    Validate,
    /// Validate, then execute if valid
    Run,
    /// Write the workflow to `<name>.json`
    Export {
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Replace the workflow with a JSON file
    Import { file: PathBuf },
    /// Ask the engine whether it is up
    Health,
    /// List node kinds and LLM providers
    Kinds,
}
