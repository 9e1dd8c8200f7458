//! Page layouts: sections of placed components.

mod assemble;
mod merge;

pub use assemble::LayoutAssembler;
pub use merge::{merge_section, MergePolicy};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One layout row on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(rename = "layout")]
    pub layout_id: String,
    #[serde(default)]
    pub layout_settings: Map<String, Value>,
    /// Components of every region, in placement order.
    #[serde(default)]
    pub components: Vec<Component>,
}

impl Section {
    pub fn new(layout_id: impl Into<String>, layout_settings: Map<String, Value>) -> Self {
        Self {
            layout_id: layout_id.into(),
            layout_settings,
            components: Vec::new(),
        }
    }

    /// The `label` setting used to find this section on merge.
    pub fn label(&self) -> Option<&str> {
        self.layout_settings.get("label").and_then(Value::as_str)
    }

    /// Weight for a component appended to `region`: one past the current highest.
    pub fn next_weight(&self, region: &str) -> i64 {
        self.components_in(region)
            .map(|c| c.weight)
            .max()
            .map_or(0, |w| w + 1)
    }

    pub fn components_in<'a>(&'a self, region: &'a str) -> impl Iterator<Item = &'a Component> {
        self.components.iter().filter(move |c| c.region == region)
    }

    /// Place `component` at the end of its region.
    pub fn push(&mut self, mut component: Component) {
        component.weight = self.next_weight(&component.region);
        self.components.push(component);
    }
}

/// One placed block reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub uuid: String,
    pub region: String,
    pub weight: i64,
    /// Carries `id` (`<source>:<record id>`), `revision_id`, `label` and `label_display`.
    pub configuration: Map<String, Value>,
}

impl Component {
    /// The type-qualified block id from the configuration.
    pub fn block_id(&self) -> Option<&str> {
        self.configuration.get("id").and_then(Value::as_str)
    }
}
