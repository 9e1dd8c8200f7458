use blockwright_common::Pretty;
use blockwright_config::EngineSettings;
use blockwright_fields::RecordId;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use super::{merge_section, Component, MergePolicy, Section};
use crate::error::{EngineError, Result};
use crate::ids::{IdGenerator, NodeId};
use crate::materialize::{Materializer, PlannedRecord};
use crate::spec::{BlockRef, ComponentSpec, LayoutPlan, SectionSpec};
use crate::store::{LayoutStore, MaterializedRef, RecordStore};

/// A section whose components are resolved or planned but not yet created.
struct PlannedSection {
    layout_id: String,
    layout_settings: Map<String, Value>,
    components: Vec<(String, PlannedComponent)>,
}

enum PlannedComponent {
    Existing(MaterializedRef),
    Inline(PlannedRecord),
}

/// Builds sections from section specs and fits them into a node's layout.
///
/// Every `assemble` call is all or nothing: all components of all sections
/// are planned before any record is created, and a failed create removes the
/// records made earlier in the same call. `apply` also removes them when the
/// layout save fails.
pub struct LayoutAssembler<'a> {
    materializer: Materializer<'a>,
    records: &'a dyn RecordStore,
    layouts: &'a dyn LayoutStore,
    ids: &'a dyn IdGenerator,
    component_source: String,
}

impl<'a> LayoutAssembler<'a> {
    pub fn new(
        materializer: Materializer<'a>,
        records: &'a dyn RecordStore,
        layouts: &'a dyn LayoutStore,
        ids: &'a dyn IdGenerator,
        settings: &EngineSettings,
    ) -> Self {
        Self {
            materializer,
            records,
            layouts,
            ids,
            component_source: settings.component_source.clone(),
        }
    }

    /// Assemble the sections of `node`.
    ///
    /// Without `target`, every spec becomes a new section and the node's
    /// current layout is not read. With `target`, only the first spec is used:
    /// it is merged into the first section labelled `target` (appended when
    /// `append_mode`, replaced otherwise), or added after the last section.
    pub fn assemble(
        &self,
        node: NodeId,
        specs: &[SectionSpec],
        target: Option<&str>,
        append_mode: bool,
    ) -> Result<Vec<Section>> {
        self.tracked(|created| self.assemble_into(node, specs, target, append_mode, created))
    }

    /// Build one new section per spec, in order.
    pub fn build_sections(&self, specs: &[SectionSpec]) -> Result<Vec<Section>> {
        self.tracked(|created| self.build_sections_into(specs, created))
    }

    /// Assemble `plan` against `node` and save the result in a single write.
    ///
    /// Records created for inline components are removed again when the
    /// save fails.
    pub fn apply(&self, node: NodeId, plan: &LayoutPlan) -> Result<Vec<Section>> {
        let sections = self.tracked(|created| {
            let sections = self.assemble_into(
                node,
                &plan.sections,
                plan.target_section.as_deref(),
                plan.append_mode,
                created,
            )?;
            self.layouts.save_layout(node, &sections)?;
            Ok(sections)
        })?;
        debug!(node = %node, "saved layout: {}", Pretty(&sections));
        Ok(sections)
    }

    /// Run `op`, deleting every record it created if it fails.
    fn tracked<T>(&self, op: impl FnOnce(&mut Vec<RecordId>) -> Result<T>) -> Result<T> {
        let mut created = Vec::new();
        let result = op(&mut created);
        if result.is_err() {
            self.materializer.rollback(&created);
        }
        result
    }

    fn assemble_into(
        &self,
        node: NodeId,
        specs: &[SectionSpec],
        target: Option<&str>,
        append_mode: bool,
        created: &mut Vec<RecordId>,
    ) -> Result<Vec<Section>> {
        let Some(label) = target else {
            return self.build_sections_into(specs, created);
        };

        let spec = match specs {
            [] => {
                return Err(EngineError::configuration(
                    "sections",
                    format!("target section '{label}' needs one section spec"),
                ))
            }
            [first, rest @ ..] => {
                if !rest.is_empty() {
                    warn!(
                        node = %node,
                        ignored = rest.len(),
                        "only the first section spec is merged into the target section"
                    );
                }
                first
            }
        };

        let existing = self.layouts.load_layout(node).inspect_err(|e| {
            if matches!(e, EngineError::NoLayoutField { .. }) {
                warn!(node = %node, "node has no layout field");
            }
        })?;

        let mut planned = self
            .plan_section(spec)
            .map_err(|e| e.nested("sections[0]"))?;
        planned
            .layout_settings
            .entry("label")
            .or_insert_with(|| Value::String(label.to_string()));

        let incoming = self
            .commit(vec![planned], created)?
            .pop()
            .ok_or_else(|| EngineError::configuration("sections[0]", "section was not built"))?;

        let policy = if append_mode {
            MergePolicy::Append
        } else {
            MergePolicy::Replace
        };
        let sections = merge_section(&existing, label, incoming, policy);
        debug!(node = %node, target = label, sections = sections.len(), "merged section");
        Ok(sections)
    }

    fn build_sections_into(
        &self,
        specs: &[SectionSpec],
        created: &mut Vec<RecordId>,
    ) -> Result<Vec<Section>> {
        let mut planned = Vec::with_capacity(specs.len());
        for (index, spec) in specs.iter().enumerate() {
            planned.push(
                self.plan_section(spec)
                    .map_err(|e| e.nested(&format!("sections[{index}]")))?,
            );
        }
        self.commit(planned, created)
    }

    fn plan_section(&self, spec: &SectionSpec) -> Result<PlannedSection> {
        let mut components = Vec::new();
        for (region, specs) in &spec.regions {
            for (index, component) in specs.iter().enumerate() {
                let planned = self
                    .plan_component(component)
                    .map_err(|e| e.nested(&format!("{region}[{index}]")))?;
                components.push((region.clone(), planned));
            }
        }
        Ok(PlannedSection {
            layout_id: spec.layout_id.clone(),
            layout_settings: spec.layout_settings.clone(),
            components,
        })
    }

    fn plan_component(&self, spec: &ComponentSpec) -> Result<PlannedComponent> {
        match spec {
            ComponentSpec::Inline(block) => {
                self.materializer.plan(block).map(PlannedComponent::Inline)
            }
            ComponentSpec::Existing {
                block_id,
                type_name,
            } => {
                let handle = match block_id {
                    BlockRef::Id(id) => self.records.load(RecordId(*id))?,
                    BlockRef::Key(key) => self.records.find_by_key(key)?,
                }
                .ok_or_else(|| EngineError::NotFound {
                    resource: "block",
                    id: block_id.to_string(),
                })?;
                if let Some(expected) = type_name {
                    if &handle.type_name != expected {
                        return Err(EngineError::configuration(
                            "",
                            format!(
                                "block {block_id} is a '{}', expected '{expected}'",
                                handle.type_name
                            ),
                        ));
                    }
                }
                Ok(PlannedComponent::Existing(handle.to_ref()))
            }
        }
    }

    /// Create the planned records and wrap every component.
    fn commit(
        &self,
        planned: Vec<PlannedSection>,
        created: &mut Vec<RecordId>,
    ) -> Result<Vec<Section>> {
        let mut sections = Vec::with_capacity(planned.len());
        for plan in planned {
            let mut section = Section::new(plan.layout_id, plan.layout_settings);
            for (region, component) in plan.components {
                let reference = match component {
                    PlannedComponent::Existing(reference) => reference,
                    PlannedComponent::Inline(record) => {
                        self.materializer.commit_into(record, created)?
                    }
                };
                section.push(self.component(region, &reference));
            }
            sections.push(section);
        }
        Ok(sections)
    }

    fn component(&self, region: String, reference: &MaterializedRef) -> Component {
        let mut configuration = Map::new();
        configuration.insert(
            "id".into(),
            json!(format!("{}:{}", self.component_source, reference.record_id)),
        );
        configuration.insert("revision_id".into(), json!(reference.revision_id));
        configuration.insert("label".into(), json!(reference.label));
        configuration.insert("label_display".into(), json!(false));
        Component {
            uuid: self.ids.generate(),
            region,
            weight: 0,
            configuration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use crate::spec::BlockSpec;
    use crate::store::MemoryStore;
    use blockwright_fields::{builtin_types, SchemaRegistry};

    fn registry() -> SchemaRegistry {
        SchemaRegistry::from_types(builtin_types().types().to_vec()).unwrap()
    }

    fn inline_text(title: &str) -> ComponentSpec {
        ComponentSpec::Inline(BlockSpec::new("text").with_field("title", json!(title)))
    }

    #[test]
    fn test_full_rebuild_preserves_order() {
        let schema = registry();
        let store = MemoryStore::new();
        let settings = EngineSettings::default();
        let ids = SequentialIds::new("uuid");
        let assembler = LayoutAssembler::new(
            Materializer::new(&schema, &store, &settings),
            &store,
            &store,
            &ids,
            &settings,
        );

        let specs = vec![
            SectionSpec::new("layout_onecol")
                .with_label("Top")
                .with_component("content", inline_text("one"))
                .with_component("content", inline_text("two")),
            SectionSpec::new("layout_twocol")
                .with_component("first", inline_text("three"))
                .with_component("second", inline_text("four")),
        ];
        let sections = assembler.assemble(NodeId(1), &specs, None, false).unwrap();

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].label(), Some("Top"));
        let ids: Vec<Option<&str>> = sections[0].components.iter().map(|c| c.block_id()).collect();
        assert_eq!(ids, [Some("block_content:1"), Some("block_content:2")]);
        assert_eq!(sections[1].components[1].region, "second");
        assert_eq!(sections[1].components[1].weight, 0);
        assert_eq!(sections[0].components[0].uuid, "uuid-1");
    }

    #[test]
    fn test_component_configuration() {
        let schema = registry();
        let store = MemoryStore::new();
        let settings = EngineSettings::default();
        let ids = SequentialIds::new("uuid");
        let assembler = LayoutAssembler::new(
            Materializer::new(&schema, &store, &settings),
            &store,
            &store,
            &ids,
            &settings,
        );

        let specs = [SectionSpec::new("layout_onecol").with_component(
            "content",
            ComponentSpec::Inline(BlockSpec::new("text").with_info("Welcome")),
        )];
        let sections = assembler.build_sections(&specs).unwrap();
        assert_eq!(
            Value::Object(sections[0].components[0].configuration.clone()),
            json!({
                "id": "block_content:1",
                "revision_id": 1,
                "label": "Welcome",
                "label_display": false
            })
        );
    }

    #[test]
    fn test_existing_block_by_key_and_type_check() {
        let schema = registry();
        let store = MemoryStore::new();
        let settings = EngineSettings::default();
        let ids = SequentialIds::new("uuid");
        let materializer = Materializer::new(&schema, &store, &settings);
        materializer
            .materialize_spec(&BlockSpec::new("text").with_id("intro"))
            .unwrap();
        let assembler = LayoutAssembler::new(materializer, &store, &store, &ids, &settings);

        let by_key = [SectionSpec::new("layout_onecol").with_component(
            "content",
            ComponentSpec::Existing {
                block_id: BlockRef::Key("intro".into()),
                type_name: Some("text".into()),
            },
        )];
        let sections = assembler.build_sections(&by_key).unwrap();
        assert_eq!(sections[0].components[0].block_id(), Some("block_content:1"));

        let wrong_type = [SectionSpec::new("layout_onecol").with_component(
            "content",
            ComponentSpec::Existing {
                block_id: BlockRef::Id(1),
                type_name: Some("cta".into()),
            },
        )];
        let err = assembler.build_sections(&wrong_type).unwrap_err();
        assert_eq!(err.path(), Some("sections[0].content[0]"));

        let missing = [SectionSpec::new("layout_onecol").with_component(
            "content",
            ComponentSpec::Existing {
                block_id: BlockRef::Id(99),
                type_name: None,
            },
        )];
        assert!(matches!(
            assembler.build_sections(&missing),
            Err(EngineError::NotFound { resource: "block", .. })
        ));
    }

    #[test]
    fn test_failed_section_creates_nothing() {
        let schema = registry();
        let store = MemoryStore::new();
        let settings = EngineSettings::default();
        let ids = SequentialIds::new("uuid");
        let assembler = LayoutAssembler::new(
            Materializer::new(&schema, &store, &settings),
            &store,
            &store,
            &ids,
            &settings,
        );

        let specs = [
            SectionSpec::new("layout_onecol").with_component("content", inline_text("fine")),
            SectionSpec::new("layout_onecol").with_component(
                "content",
                ComponentSpec::Inline(
                    BlockSpec::new("cta").with_field("new_window", json!("sometimes")),
                ),
            ),
        ];
        let err = assembler.build_sections(&specs).unwrap_err();
        assert_eq!(err.path(), Some("sections[1].content[0].cta.new_window"));
        assert!(store.records().unwrap().is_empty());
    }

    #[test]
    fn test_targeted_without_specs_is_configuration_error() {
        let schema = registry();
        let store = MemoryStore::new();
        store.add_node(NodeId(1)).unwrap();
        let settings = EngineSettings::default();
        let ids = SequentialIds::new("uuid");
        let assembler = LayoutAssembler::new(
            Materializer::new(&schema, &store, &settings),
            &store,
            &store,
            &ids,
            &settings,
        );
        assert!(matches!(
            assembler.assemble(NodeId(1), &[], Some("Content"), true),
            Err(EngineError::Configuration { .. })
        ));
    }

    #[test]
    fn test_targeted_fills_missing_label() {
        let schema = registry();
        let store = MemoryStore::new();
        store.add_node(NodeId(1)).unwrap();
        let settings = EngineSettings::default();
        let ids = SequentialIds::new("uuid");
        let assembler = LayoutAssembler::new(
            Materializer::new(&schema, &store, &settings),
            &store,
            &store,
            &ids,
            &settings,
        );

        let specs = [SectionSpec::new("layout_onecol").with_component("content", inline_text("x"))];
        let first = assembler
            .apply(
                NodeId(1),
                &LayoutPlan {
                    sections: specs.to_vec(),
                    target_section: Some("Content".into()),
                    append_mode: true,
                },
            )
            .unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].label(), Some("Content"));

        // a second run finds the section created by the first
        let second = assembler
            .assemble(NodeId(1), &specs, Some("Content"), true)
            .unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].components.len(), 2);
    }
}
