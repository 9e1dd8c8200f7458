//! `blockwright node` - manage layout nodes.

use blockwright_engine::{LayoutStore, NodeId};

use crate::error::Result;
use crate::workspace::Workspace;

/// Register `node` with an empty layout. An existing layout is kept.
pub async fn run_node_add(ws: &Workspace, node: NodeId) -> Result<()> {
    let file = ws.store().await?;
    file.store().add_node(node)?;
    file.save().await?;
    Ok(())
}

/// Registered nodes with their section counts.
pub async fn run_node_list(ws: &Workspace) -> Result<Vec<(NodeId, usize)>> {
    let file = ws.store().await?;
    let store = file.store();
    let mut nodes = Vec::new();
    for node in store.nodes()? {
        nodes.push((node, store.load_layout(node)?.len()));
    }
    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::run_init;
    use blockwright_config::EngineSettings;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_add_and_list_nodes() {
        let tmp = TempDir::new().unwrap();
        let ws = Workspace::with_settings(tmp.path(), EngineSettings::default());
        run_init(&ws).await.unwrap();

        run_node_add(&ws, NodeId(7)).await.unwrap();
        run_node_add(&ws, NodeId(2)).await.unwrap();
        run_node_add(&ws, NodeId(7)).await.unwrap();

        assert_eq!(
            run_node_list(&ws).await.unwrap(),
            vec![(NodeId(2), 0), (NodeId(7), 0)]
        );
    }
}
