//! CLI definition for the Blockwright command-line interface.
//!
//! This module only depends on `clap` and `std`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Default workspace directory, relative to the current directory.
pub const DEFAULT_ROOT: &str = ".blockwright";

/// Blockwright - declarative content and layout materialization
///
/// Imports nested block specs as content records and assembles them into
/// page layouts.
#[derive(Parser, Debug)]
#[command(name = "blockwright")]
#[command(version)]
#[command(about = "Materialize declarative blocks and page layouts")]
pub struct Cli {
    /// Enable debug output to stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Workspace directory holding types/ and store.json
    #[arg(long, global = true, default_value = DEFAULT_ROOT)]
    pub root: PathBuf,

    /// Settings file, merged over discovered config files
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the workspace, seed built-in types and an empty store
    Init,
    /// List registered types and their fields
    Types,
    /// Manage layout nodes
    Node {
        #[command(subcommand)]
        action: NodeCommands,
    },
    /// Import the `blocks` list of a migration document
    Import {
        /// Migration document (.yaml, .yml, .json or .toml)
        file: PathBuf,
    },
    /// Apply the layout of a migration document to a node
    Layout {
        /// Migration document (.yaml, .yml, .json or .toml)
        file: PathBuf,
        /// Target node id
        #[arg(long)]
        node: u64,
    },
}

#[derive(Subcommand, Debug)]
pub enum NodeCommands {
    /// Register a node with an empty layout
    Add {
        /// Node id
        id: u64,
    },
    /// List registered nodes and their section counts
    List,
}
