//! # genome-cli
//!
//! Command-line access to a genome document.
//!
//! ## Commands
//!
//! - `genome inspect` - Print the whole tree or a pruned slice
//! - `genome apply` - Apply a batch of edits and report the result
//! - `genome history` - Apply a batch of edits and list the log
//! - `genome components` - Resolve UI fragments for a scope
//!
//! Every command prints JSON on stdout. Logs go to stderr, filtered by
//! `RUST_LOG` (default `info`).

#![warn(missing_docs)]

pub mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

/// Genome document tool
#[derive(Debug, Parser)]
#[command(name = "genome")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Configuration file (TOML or YAML)
    #[arg(long, global = true, env = "GENOME_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the genome, or the subtree rooted at `--scope`
    Inspect(InspectArgs),
    /// Apply edits in order and print the assigned sequence numbers
    Apply(ApplyArgs),
    /// Apply edits and print the resulting log
    History(HistoryArgs),
    /// Resolve elite and contextual fragments for a scope
    Components(ComponentsArgs),
}

/// Arguments for `inspect`
#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Genome document (JSON or YAML)
    #[arg(long)]
    pub genome: PathBuf,

    /// Node id to prune to
    #[arg(long)]
    pub scope: Option<String>,
}

/// Arguments for `apply`
#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Genome document (JSON or YAML)
    #[arg(long)]
    pub genome: PathBuf,

    /// List of edit requests (JSON or YAML)
    #[arg(long)]
    pub edits: PathBuf,

    /// Take a named snapshot after the last edit
    #[arg(long)]
    pub snapshot: Option<String>,

    /// Also print the resulting tree
    #[arg(long)]
    pub print_tree: bool,
}

/// Arguments for `history`
#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Genome document (JSON or YAML)
    #[arg(long)]
    pub genome: PathBuf,

    /// List of edit requests (JSON or YAML)
    #[arg(long)]
    pub edits: PathBuf,

    /// Only records targeting this node
    #[arg(long)]
    pub target: Option<String>,
}

/// Arguments for `components`
#[derive(Debug, Args)]
pub struct ComponentsArgs {
    /// Genome document (JSON or YAML)
    #[arg(long)]
    pub genome: PathBuf,

    /// Fragment catalog (JSON or YAML map of key to markup)
    #[arg(long)]
    pub catalog: PathBuf,

    /// Node id to resolve for; whole tree when absent
    #[arg(long)]
    pub scope: Option<String>,
}

/// Execute the parsed command and return its JSON output
///
/// # Errors
/// Any load, edit or resolution failure, with the file or edit index as
/// context
pub fn run(cli: &Cli) -> Result<Value> {
    let config = commands::load_config(cli.config.as_deref())?;
    match &cli.command {
        Commands::Inspect(args) => commands::inspect(args, &config),
        Commands::Apply(args) => commands::apply(args, &config),
        Commands::History(args) => commands::history(args, &config),
        Commands::Components(args) => commands::components(args, &config),
    }
}
