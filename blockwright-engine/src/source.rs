//! Declarative block source.
//!
//! Projects configured [`BlockSpec`]s into [`NormalizedRow`]s with defaults
//! applied. Rows are computed on demand and the projection is pure, so
//! iterating the same source twice yields identical rows.
//!
//! A position-derived id only names the row within its source. It is used as
//! the default label but never stored as a record key.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::spec::BlockSpec;

/// Default prefix for position-derived row ids.
pub const DEFAULT_ROW_PREFIX: &str = "block";

/// A block spec with every optional attribute resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRow {
    pub id: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub info: String,
    pub reusable: bool,
    pub fields: IndexMap<String, Value>,
    /// Whether `id` came from the spec rather than its position.
    #[serde(skip)]
    pub explicit_id: bool,
}

impl NormalizedRow {
    fn from_spec(spec: &BlockSpec, position: usize, prefix: &str) -> Self {
        let id = spec
            .id
            .clone()
            .unwrap_or_else(|| format!("{prefix}_{position}"));
        let info = spec.info.clone().unwrap_or_else(|| id.clone());
        Self {
            info,
            id,
            explicit_id: spec.id.is_some(),
            type_name: spec.type_name.clone(),
            reusable: spec.reusable.unwrap_or(false),
            fields: spec.fields.clone(),
        }
    }
}

impl From<NormalizedRow> for BlockSpec {
    fn from(row: NormalizedRow) -> Self {
        BlockSpec {
            type_name: row.type_name,
            id: row.explicit_id.then_some(row.id),
            info: Some(row.info),
            reusable: Some(row.reusable),
            fields: row.fields,
        }
    }
}

/// Borrowed list of block specs to normalize.
#[derive(Debug, Clone)]
pub struct BlockSource<'a> {
    specs: &'a [BlockSpec],
    prefix: String,
}

impl<'a> BlockSource<'a> {
    pub fn new(specs: &'a [BlockSpec]) -> Self {
        Self {
            specs,
            prefix: DEFAULT_ROW_PREFIX.to_string(),
        }
    }

    /// Prefix used for ids derived from a spec's position (`<prefix>_<index>`).
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// One row per spec, in input order.
    pub fn rows(&self) -> impl Iterator<Item = NormalizedRow> + Clone + '_ {
        self.specs
            .iter()
            .enumerate()
            .map(move |(position, spec)| NormalizedRow::from_spec(spec, position, &self.prefix))
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
