//! `blockwright layout` - apply a migration document's layout to a node.

use std::path::Path;

use blockwright_config::load_document;
use blockwright_engine::{
    ids::UlidGenerator, LayoutAssembler, Materializer, MigrationDocument, NodeId, Section,
};

use crate::error::Result;
use crate::workspace::Workspace;

/// Assemble the document's sections against `node`, then save the store.
///
/// The `blocks` list of the document is not imported here; existing-block
/// components must reference blocks imported earlier.
pub async fn run_layout(ws: &Workspace, file: &Path, node: NodeId) -> Result<Vec<Section>> {
    let doc: MigrationDocument = load_document(file)?;
    let registry = ws.registry().await?;
    let store = ws.store().await?;
    let settings = ws.settings();
    let ids = UlidGenerator;

    let assembler = LayoutAssembler::new(
        Materializer::new(&registry, store.store(), settings),
        store.store(),
        store.store(),
        &ids,
        settings,
    );
    let sections = assembler.apply(node, &doc.layout)?;
    store.save().await?;
    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::run_import;
    use crate::init::run_init;
    use crate::node::run_node_add;
    use crate::CliError;
    use blockwright_config::EngineSettings;
    use blockwright_engine::EngineError;
    use tempfile::TempDir;

    const DOC: &str = r#"{
  "blocks": [{"type": "text", "id": "intro", "fields": {"title": "Welcome"}}],
  "sections": [{
    "layout": "layout_onecol",
    "layout_settings": {"label": "Content Section"},
    "regions": {"content": [
      {"source": "existing", "type": "text", "block_id": "intro"},
      {"source": "inline", "type": "cta", "fields": {"link": "https://example.com"}}
    ]}
  }],
  "target_section": "Content Section",
  "append_mode": true
}"#;

    #[tokio::test]
    async fn test_layout_appends_on_each_run() {
        let tmp = TempDir::new().unwrap();
        let ws = Workspace::with_settings(tmp.path().join("site"), EngineSettings::default());
        run_init(&ws).await.unwrap();
        run_node_add(&ws, NodeId(1)).await.unwrap();

        let doc = tmp.path().join("migration.json");
        std::fs::write(&doc, DOC).unwrap();
        run_import(&ws, &doc).await.unwrap();

        let first = run_layout(&ws, &doc, NodeId(1)).await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].components.len(), 2);
        assert_eq!(first[0].components[0].block_id(), Some("block_content:1"));

        let second = run_layout(&ws, &doc, NodeId(1)).await.unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].components.len(), 4);
    }

    #[tokio::test]
    async fn test_unknown_node() {
        let tmp = TempDir::new().unwrap();
        let ws = Workspace::with_settings(tmp.path().join("site"), EngineSettings::default());
        run_init(&ws).await.unwrap();
        let doc = tmp.path().join("migration.json");
        std::fs::write(&doc, DOC).unwrap();
        run_import(&ws, &doc).await.unwrap();

        let err = run_layout(&ws, &doc, NodeId(42)).await.unwrap_err();
        assert!(matches!(
            err,
            CliError::Engine(EngineError::NoLayoutField { node: NodeId(42) })
        ));
    }
}
