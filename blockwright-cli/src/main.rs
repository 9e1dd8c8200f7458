//! Blockwright CLI - declarative content and layout materialization.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Error (including any failed row during import)

use blockwright::{import, init, layout, node, types};
use blockwright::{Cli, CliError, Commands, NodeCommands, Workspace};
use blockwright_common::log_error;
use blockwright_engine::NodeId;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Crates whose logs `--debug` turns up.
const WORKSPACE_CRATES: &[&str] = &[
    "blockwright",
    "blockwright_common",
    "blockwright_config",
    "blockwright_engine",
    "blockwright_fields",
];

fn debug_directives() -> String {
    WORKSPACE_CRATES
        .iter()
        .map(|name| format!("{name}=debug"))
        .collect::<Vec<_>>()
        .join(",")
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing with appropriate level
    let filter = if cli.debug {
        EnvFilter::new(debug_directives())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = result_to_exit(run(cli).await);
    std::process::exit(exit_code);
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let ws = Workspace::load(&cli.root, cli.config.as_deref())?;
    match cli.command {
        Commands::Init => {
            let count = init::run_init(&ws).await?;
            println!(
                "Initialized {} with {} types",
                ws.root().display(),
                count
            );
        }
        Commands::Types => {
            println!("{}", types::run_types(&ws).await?);
        }
        Commands::Node { action } => match action {
            NodeCommands::Add { id } => {
                node::run_node_add(&ws, NodeId(id)).await?;
                println!("Added node {}", id);
            }
            NodeCommands::List => {
                for (node, sections) in node::run_node_list(&ws).await? {
                    println!("{}\t{} sections", node, sections);
                }
            }
        },
        Commands::Import { file } => {
            let report = import::run_import(&ws, &file).await?;
            println!(
                "created: {}, skipped: {}, errors: {}",
                report.created,
                report.skipped,
                report.errors.len()
            );
            for error in &report.errors {
                eprintln!("  {}", error);
            }
            if !report.is_success() {
                return Err(CliError::ImportFailed {
                    failed: report.errors.len(),
                });
            }
        }
        Commands::Layout { file, node } => {
            let sections = layout::run_layout(&ws, &file, NodeId(node)).await?;
            println!("Node {} now has {} sections", node, sections.len());
        }
    }
    Ok(())
}

/// Convert a command result to an exit code.
fn result_to_exit(result: Result<(), CliError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            log_error(&e);
            eprintln!("Error: {}", e);
            1
        }
    }
}
