//! `blockwright import` - import the blocks of a migration document.

use std::path::Path;

use blockwright_config::load_document;
use blockwright_engine::{BlockImporter, BlockSource, ImportReport, Materializer, MigrationDocument};
use tracing::info;

use crate::error::Result;
use crate::workspace::Workspace;

/// Materialize every block of the document at `file` and save the store.
///
/// Rows that fail are listed in the report; rows that succeeded are saved
/// regardless.
pub async fn run_import(ws: &Workspace, file: &Path) -> Result<ImportReport> {
    let doc: MigrationDocument = load_document(file)?;
    let registry = ws.registry().await?;
    let store = ws.store().await?;
    let settings = ws.settings();

    let source = BlockSource::new(&doc.blocks).with_prefix(settings.row_id_prefix.as_str());
    let importer = BlockImporter::new(
        Materializer::new(&registry, store.store(), settings),
        store.store(),
    );
    let report = importer.import(source.rows());

    if report.created > 0 {
        store.save().await?;
    }
    info!(file = %file.display(), created = report.created, "imported blocks");
    Ok(report)
}
