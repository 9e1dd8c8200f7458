//! Blockwright command-line interface.
//!
//! Every command works on a workspace directory (`--root`, default
//! `.blockwright`) holding the type registry and the record/layout store:
//!
//! - `blockwright init`: create the workspace and seed built-in types
//! - `blockwright types`: list registered types
//! - `blockwright node add <id>` / `node list`: manage layout nodes
//! - `blockwright import <file>`: import the blocks of a migration document
//! - `blockwright layout <file> --node <id>`: apply a document's layout to a node

pub mod cli;
pub mod error;
pub mod import;
pub mod init;
pub mod layout;
pub mod node;
pub mod types;
pub mod workspace;

pub use cli::{Cli, Commands, NodeCommands};
pub use error::{CliError, Result};
pub use workspace::Workspace;
