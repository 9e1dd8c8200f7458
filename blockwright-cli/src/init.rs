//! `blockwright init` - create a workspace.

use crate::error::Result;
use crate::workspace::Workspace;

/// Create the workspace directories, seed built-in types and an empty store.
///
/// Existing type definitions and records are kept. Returns the number of
/// registered types.
pub async fn run_init(ws: &Workspace) -> Result<usize> {
    let (registry, _store) = ws.init().await?;
    Ok(registry.all_types().len())
}
