//! Declarative input specs.
//!
//! These mirror the migration document format:
//!
//! ```yaml
//! blocks:
//!   - type: text
//!     id: intro
//!     fields:
//!       title: Welcome
//! sections:
//!   - layout: layout_onecol
//!     layout_settings:
//!       label: Content Section
//!     regions:
//!       content:
//!         - source: existing
//!           type: text
//!           block_id: intro
//!         - source: inline
//!           type: cta
//!           fields:
//!             link: https://example.com
//! target_section: Content Section
//! append_mode: true
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Declarative description of one content unit to materialize.
///
/// A `reference_list` field's raw value is itself a list of `BlockSpec`s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSpec {
    #[serde(rename = "type")]
    pub type_name: String,
    /// Stable key used for idempotency and lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Administrative label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reusable: Option<bool>,
    #[serde(default)]
    pub fields: IndexMap<String, Value>,
}

impl BlockSpec {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            id: None,
            info: None,
            reusable: None,
            fields: IndexMap::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }
}

/// Reference to an already-persisted block: numeric record id or stable key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockRef {
    Id(u64),
    Key(String),
}

impl std::fmt::Display for BlockRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockRef::Id(id) => write!(f, "{id}"),
            BlockRef::Key(key) => write!(f, "{key}"),
        }
    }
}

/// One placed block inside a section region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ComponentSpec {
    /// Reference a block that already exists.
    Existing {
        block_id: BlockRef,
        /// Expected type of the referenced block, checked when given.
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        type_name: Option<String>,
    },
    /// Materialize a new block tree in place.
    Inline(BlockSpec),
}

/// One section to build: template, settings, and regions of components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSpec {
    #[serde(rename = "layout")]
    pub layout_id: String,
    /// Opaque template settings. Must hold `label` when used as a merge target.
    #[serde(default)]
    pub layout_settings: Map<String, Value>,
    /// Region name to ordered components, in document order.
    #[serde(default)]
    pub regions: IndexMap<String, Vec<ComponentSpec>>,
}

impl SectionSpec {
    pub fn new(layout_id: impl Into<String>) -> Self {
        Self {
            layout_id: layout_id.into(),
            layout_settings: Map::new(),
            regions: IndexMap::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.layout_settings
            .insert("label".into(), Value::String(label.into()));
        self
    }

    pub fn with_component(mut self, region: impl Into<String>, component: ComponentSpec) -> Self {
        self.regions.entry(region.into()).or_default().push(component);
        self
    }

    /// The `label` setting, if present and a string.
    pub fn label(&self) -> Option<&str> {
        self.layout_settings.get("label").and_then(Value::as_str)
    }
}

/// Layout half of a migration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutPlan {
    #[serde(default)]
    pub sections: Vec<SectionSpec>,
    /// Label of the section to merge into. Absent means full rebuild.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_section: Option<String>,
    /// Append to the target section instead of replacing it.
    #[serde(default)]
    pub append_mode: bool,
}

/// A whole migration document: blocks to import and a layout to assemble.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MigrationDocument {
    #[serde(default)]
    pub blocks: Vec<BlockSpec>,
    #[serde(flatten)]
    pub layout: LayoutPlan,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_existing_component_from_config() {
        let spec: ComponentSpec =
            serde_json::from_value(json!({"type": "text", "source": "existing", "block_id": 123}))
                .unwrap();
        assert_eq!(
            spec,
            ComponentSpec::Existing {
                block_id: BlockRef::Id(123),
                type_name: Some("text".into())
            }
        );
    }

    #[test]
    fn test_existing_component_by_key() {
        let spec: ComponentSpec =
            serde_json::from_value(json!({"source": "existing", "block_id": "intro"})).unwrap();
        assert!(matches!(
            spec,
            ComponentSpec::Existing { block_id: BlockRef::Key(ref k), type_name: None } if k == "intro"
        ));
    }

    #[test]
    fn test_inline_component_carries_block_spec() {
        let spec: ComponentSpec = serde_json::from_value(json!({
            "source": "inline",
            "type": "cta",
            "id": "signup",
            "fields": {"title": "Join", "link": "https://example.com"}
        }))
        .unwrap();
        let ComponentSpec::Inline(block) = spec else {
            panic!("expected inline component");
        };
        assert_eq!(block.type_name, "cta");
        assert_eq!(block.id.as_deref(), Some("signup"));
        let keys: Vec<&str> = block.fields.keys().map(String::as_str).collect();
        assert_eq!(keys, ["title", "link"]);
    }

    #[test]
    fn test_unknown_source_rejected() {
        let result: Result<ComponentSpec, _> =
            serde_json::from_value(json!({"source": "remote", "block_id": 1}));
        assert!(result.is_err());
    }

    #[test]
    fn test_migration_document_example() {
        let doc: MigrationDocument = serde_json::from_value(json!({
            "sections": [
                { "layout": "layout_onecol",
                  "layout_settings": { "label": "Content Section" },
                  "regions": { "content": [
                    { "type": "text", "source": "existing", "block_id": 123 }
                  ]}
                }
            ],
            "target_section": "Content Section",
            "append_mode": true
        }))
        .unwrap();

        assert!(doc.blocks.is_empty());
        assert_eq!(doc.layout.target_section.as_deref(), Some("Content Section"));
        assert!(doc.layout.append_mode);
        assert_eq!(doc.layout.sections[0].label(), Some("Content Section"));
        assert_eq!(doc.layout.sections[0].regions["content"].len(), 1);
    }

    #[test]
    fn test_section_builder() {
        let section = SectionSpec::new("layout_twocol")
            .with_label("Split")
            .with_component("first", ComponentSpec::Inline(BlockSpec::new("text")))
            .with_component("second", ComponentSpec::Inline(BlockSpec::new("text")))
            .with_component("first", ComponentSpec::Inline(BlockSpec::new("cta")));
        assert_eq!(section.label(), Some("Split"));
        let regions: Vec<&str> = section.regions.keys().map(String::as_str).collect();
        assert_eq!(regions, ["first", "second"]);
        assert_eq!(section.regions["first"].len(), 2);
    }
}
