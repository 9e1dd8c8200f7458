//! Batch block import.

use blockwright_common::log_error;
use serde::Serialize;
use tracing::{debug, info};

use crate::materialize::Materializer;
use crate::source::NormalizedRow;
use crate::spec::BlockSpec;
use crate::store::{MaterializedRef, RecordStore};

/// Outcome of an import run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportReport {
    pub created: usize,
    /// Rows with an explicit id that already exists in the store.
    pub skipped: usize,
    /// One message per failed row, prefixed with the row id.
    pub errors: Vec<String>,
    /// Row id and reference of every created block, in input order.
    pub refs: Vec<(String, MaterializedRef)>,
}

impl ImportReport {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Materializes rows one at a time, skipping explicit ids that were imported
/// before. Rows with position-derived ids are always created.
///
/// A failed row is recorded in the report and the run moves on.
pub struct BlockImporter<'a> {
    materializer: Materializer<'a>,
    records: &'a dyn RecordStore,
}

impl<'a> BlockImporter<'a> {
    pub fn new(materializer: Materializer<'a>, records: &'a dyn RecordStore) -> Self {
        Self {
            materializer,
            records,
        }
    }

    pub fn import<I>(&self, rows: I) -> ImportReport
    where
        I: IntoIterator<Item = NormalizedRow>,
    {
        let mut report = ImportReport::default();
        for row in rows {
            let existing = if row.explicit_id {
                self.records.find_by_key(&row.id)
            } else {
                Ok(None)
            };
            match existing {
                Ok(Some(existing)) => {
                    debug!(row = %row.id, record = %existing.record_id, "already imported");
                    report.skipped += 1;
                    continue;
                }
                Ok(None) => {}
                Err(e) => {
                    log_error(&e);
                    report.errors.push(format!("{}: {e}", row.id));
                    continue;
                }
            }

            let id = row.id.clone();
            match self.materializer.materialize_spec(&BlockSpec::from(row)) {
                Ok(created) => {
                    report.created += 1;
                    report.refs.push((id, created));
                }
                Err(e) => {
                    log_error(&e);
                    report.errors.push(format!("{id}: {e}"));
                }
            }
        }
        info!(
            created = report.created,
            skipped = report.skipped,
            errors = report.errors.len(),
            "import finished"
        );
        report
    }
}
