//! Core schema types.
//!
//! A [`TypeDef`] names a materializable content type (a block or paragraph
//! bundle) and lists its fields in order. Each [`FieldSpec`] carries a
//! [`FieldKind`], which decides how raw values for that field are stored.

use serde::{Deserialize, Serialize};

/// The kind of a field. Determines the shape of the stored value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    PlainText,
    RichText {
        /// Text format used when the raw value does not name one.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default_format: Option<String>,
    },
    Boolean,
    Link,
    /// Ordered references to child records materialized from nested specs.
    ReferenceList {
        /// Child type names accepted by this field. Empty accepts any type.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        allowed: Vec<String>,
    },
}

impl FieldKind {
    /// Stable snake_case name of the kind, as written in YAML.
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::PlainText => "plain_text",
            FieldKind::RichText { .. } => "rich_text",
            FieldKind::Boolean => "boolean",
            FieldKind::Link => "link",
            FieldKind::ReferenceList { .. } => "reference_list",
        }
    }

    /// Whether `type_name` may be materialized as a child of this field.
    ///
    /// Always false for non-reference kinds.
    pub fn accepts_child(&self, type_name: &str) -> bool {
        match self {
            FieldKind::ReferenceList { allowed } => {
                allowed.is_empty() || allowed.iter().any(|a| a == type_name)
            }
            _ => false,
        }
    }
}

/// Declared shape of one field on a materializable type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            description: None,
        }
    }
}

/// A type definition: the schema for one block or paragraph bundle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TypeDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

impl TypeDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    /// Append a field, builder style.
    pub fn with_field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldSpec::new(name, kind));
        self
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}
