//! Content type schemas and field value coercion
//!
//! `blockwright-fields` owns the *shape* of materializable content: which
//! fields a block or paragraph type has and what kind each field is. It also
//! owns the canonical stored representation of field values and the pure
//! coercer that turns raw configuration values into that representation.
//!
//! # Architecture
//!
//! - **Closed field kinds**: [`FieldKind`] is an enum; every kind has exactly one
//!   coercion handler, so an unhandled kind is a compile error
//! - **YAML on disk**: [`SchemaRegistry`] keeps one `.yaml` file per type under `types/`
//! - **Provider trait**: the engine only sees [`SchemaProvider`], so hosts can plug
//!   in their own field-definition registry
//! - **Default seeding**: `with_defaults()` writes defaults that don't exist, preserves customizations

pub mod coerce;
pub mod defaults;
pub mod error;
pub mod registry;
pub mod types;
pub mod value;

pub use coerce::{coerce, CoerceHints, DEFAULT_TEXT_FORMAT};
pub use defaults::builtin_types;
pub use error::{FieldsError, Result};
pub use registry::{SchemaProvider, SchemaRegistry, SchemaRegistryBuilder, TypeDefaults};
pub use types::{FieldKind, FieldSpec, TypeDef};
pub use value::{FieldValue, LinkValue, RecordId, RecordRef, RevisionId};
