//! Declarative content and layout materialization
//!
//! Turns nested block specs into persisted records, then places
//! references to those records into page layouts.
//!
//! ## Overview
//!
//! - [`source::BlockSource`] normalizes configured block specs into rows with defaults applied
//! - [`materialize::Materializer`] coerces field values, recursively creates child
//!   records for reference lists, and creates the record itself (all or nothing)
//! - [`layout::LayoutAssembler`] builds sections from section specs, either as a
//!   full rebuild or merged into a labelled section of a node's existing layout
//! - [`import::BlockImporter`] runs a batch of rows, skipping already-imported keys
//!
//! The engine is synchronous and holds no state between runs. Storage, schema
//! and id allocation are collaborators passed in explicitly ([`store::RecordStore`],
//! [`store::LayoutStore`], [`blockwright_fields::SchemaProvider`], [`ids::IdGenerator`]).
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use blockwright_config::EngineSettings;
//! use blockwright_engine::{
//!     layout::LayoutAssembler, materialize::Materializer, ids::UlidGenerator,
//!     spec::MigrationDocument, store::MemoryStore, NodeId,
//! };
//! use blockwright_fields::{builtin_types, SchemaRegistry};
//!
//! # fn example(doc: MigrationDocument) -> Result<(), Box<dyn std::error::Error>> {
//! let schema = SchemaRegistry::from_types(builtin_types().types().to_vec())?;
//! let store = MemoryStore::new();
//! store.add_node(NodeId(1))?;
//! let settings = EngineSettings::default();
//! let ids = UlidGenerator;
//!
//! let materializer = Materializer::new(&schema, &store, &settings);
//! let assembler = LayoutAssembler::new(materializer, &store, &store, &ids, &settings);
//! let sections = assembler.apply(NodeId(1), &doc.layout)?;
//! println!("node 1 now has {} sections", sections.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod ids;
pub mod import;
pub mod layout;
pub mod materialize;
pub mod source;
pub mod spec;
pub mod store;

pub use error::{EngineError, Result};
pub use ids::{IdGenerator, NodeId};
pub use import::{BlockImporter, ImportReport};
pub use layout::{merge_section, Component, LayoutAssembler, MergePolicy, Section};
pub use materialize::Materializer;
pub use source::{BlockSource, NormalizedRow};
pub use spec::{BlockRef, BlockSpec, ComponentSpec, LayoutPlan, MigrationDocument, SectionSpec};
pub use store::{LayoutStore, MaterializedRef, NewRecord, RecordHandle, RecordStore};
