//! Block materializer.
//!
//! Materialization runs in two phases. Planning resolves schemas, coerces
//! every scalar and validates every nested spec without touching the store.
//! Committing then creates records depth-first in input order, children
//! before their parent. A planning failure therefore creates nothing; a store
//! failure during commit deletes the records created so far.

use blockwright_config::EngineSettings;
use blockwright_fields::{coerce, CoerceHints, FieldKind, FieldValue, RecordId, SchemaProvider};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{EngineError, Result};
use crate::spec::BlockSpec;
use crate::store::{MaterializedRef, NewRecord, RecordStore};

/// A validated block tree waiting to be committed.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlannedRecord {
    type_name: String,
    key: Option<String>,
    info: Option<String>,
    reusable: bool,
    fields: IndexMap<String, PlannedValue>,
}

#[derive(Debug, Clone, PartialEq)]
enum PlannedValue {
    Scalar(FieldValue),
    Children(Vec<PlannedRecord>),
}

/// Turns block specs into persisted records.
pub struct Materializer<'a> {
    schema: &'a dyn SchemaProvider,
    store: &'a dyn RecordStore,
    hints: CoerceHints,
    max_depth: usize,
}

impl<'a> Materializer<'a> {
    pub fn new(
        schema: &'a dyn SchemaProvider,
        store: &'a dyn RecordStore,
        settings: &EngineSettings,
    ) -> Self {
        Self {
            schema,
            store,
            hints: settings.coerce_hints(),
            max_depth: settings.max_depth,
        }
    }

    /// Materialize a record of `type_name` from raw field values.
    pub fn materialize(
        &self,
        type_name: &str,
        fields: &IndexMap<String, Value>,
    ) -> Result<MaterializedRef> {
        let spec = BlockSpec {
            type_name: type_name.to_string(),
            id: None,
            info: None,
            reusable: None,
            fields: fields.clone(),
        };
        self.materialize_spec(&spec)
    }

    /// Materialize a whole block spec, including nested children.
    pub fn materialize_spec(&self, spec: &BlockSpec) -> Result<MaterializedRef> {
        let plan = self.plan(spec)?;
        let mut created = Vec::new();
        self.commit_into(plan, &mut created).inspect_err(|_| {
            self.rollback(&created);
        })
    }

    /// Validate `spec` and coerce all of its values. No side effects.
    ///
    /// Error paths start at the spec's type name (`accordion.items[1].title`).
    pub(crate) fn plan(&self, spec: &BlockSpec) -> Result<PlannedRecord> {
        self.plan_at(spec, 1).map_err(|e| {
            if matches!(&e, EngineError::UnknownType { path, .. } if path.is_empty()) {
                e
            } else {
                e.nested(&spec.type_name)
            }
        })
    }

    fn plan_at(&self, spec: &BlockSpec, depth: usize) -> Result<PlannedRecord> {
        if depth > self.max_depth {
            return Err(EngineError::configuration(
                "",
                format!("nesting exceeds the maximum depth of {}", self.max_depth),
            ));
        }
        let schema = self
            .schema
            .fields_of(&spec.type_name)
            .map_err(|e| EngineError::from_fields(e, ""))?;

        let mut fields = IndexMap::with_capacity(spec.fields.len());
        for (name, raw) in &spec.fields {
            let field = schema.iter().find(|f| &f.name == name).ok_or_else(|| {
                EngineError::configuration(
                    name.as_str(),
                    format!("type '{}' has no field '{name}'", spec.type_name),
                )
            })?;
            let value = match &field.kind {
                FieldKind::ReferenceList { .. } => self
                    .plan_children(raw, &field.kind, depth)
                    .map(PlannedValue::Children),
                kind => coerce(raw, kind, &self.hints)
                    .map(PlannedValue::Scalar)
                    .map_err(|e| EngineError::from_fields(e, "")),
            }
            .map_err(|e| e.nested(name))?;
            fields.insert(name.clone(), value);
        }

        Ok(PlannedRecord {
            type_name: spec.type_name.clone(),
            key: spec.id.clone(),
            info: spec.info.clone(),
            reusable: spec.reusable.unwrap_or(false),
            fields,
        })
    }

    fn plan_children(
        &self,
        raw: &Value,
        kind: &FieldKind,
        depth: usize,
    ) -> Result<Vec<PlannedRecord>> {
        let items = match raw {
            Value::Null => return Ok(Vec::new()),
            Value::Array(items) => items,
            other => {
                return Err(EngineError::configuration(
                    "",
                    format!("reference_list expects a sequence of block specs, got {other}"),
                ))
            }
        };

        let mut children = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let segment = format!("[{index}]");
            let child: BlockSpec = serde_json::from_value(item.clone()).map_err(|e| {
                EngineError::configuration(segment.as_str(), format!("malformed block spec: {e}"))
            })?;
            if !kind.accepts_child(&child.type_name) {
                return Err(EngineError::invalid_value(
                    segment,
                    format!("type '{}' is not allowed here", child.type_name),
                ));
            }
            let planned = self
                .plan_at(&child, depth + 1)
                .map_err(|e| e.nested(&segment))?;
            children.push(planned);
        }
        Ok(children)
    }

    /// Create the planned records, children first. Every created id is pushed
    /// onto `created` so the caller can roll back.
    pub(crate) fn commit_into(
        &self,
        plan: PlannedRecord,
        created: &mut Vec<RecordId>,
    ) -> Result<MaterializedRef> {
        let mut fields = IndexMap::with_capacity(plan.fields.len());
        for (name, value) in plan.fields {
            let value = match value {
                PlannedValue::Scalar(value) => value,
                PlannedValue::Children(children) => {
                    let mut refs = Vec::with_capacity(children.len());
                    for child in children {
                        refs.push(self.commit_into(child, created)?.as_record_ref());
                    }
                    FieldValue::References(refs)
                }
            };
            fields.insert(name, value);
        }

        let type_name = plan.type_name;
        let record = self.store.create(NewRecord {
            type_name: type_name.clone(),
            key: plan.key,
            info: plan.info,
            reusable: plan.reusable,
            fields,
        })?;
        created.push(record.record_id);
        debug!(type_name = %type_name, record = %record.record_id, "created record");
        Ok(record)
    }

    /// Delete `created` in reverse order. Failures are logged, not returned.
    pub(crate) fn rollback(&self, created: &[RecordId]) {
        for id in created.iter().rev() {
            if let Err(e) = self.store.delete(*id) {
                warn!(record = %id, error = %e, "rollback could not delete record");
            }
        }
        if !created.is_empty() {
            debug!(count = created.len(), "rolled back records");
        }
    }
}
