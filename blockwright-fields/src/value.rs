//! Stored field values and record identifiers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Permanent id of a persisted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

/// Version of a record, distinct from its permanent id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RevisionId(pub u64);

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for RevisionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One entry of a reference list: a child record pinned to a revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRef {
    pub target_id: RecordId,
    pub target_revision_id: RevisionId,
}

/// Stored link value. Keys other than `uri` and `title` are kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkValue {
    pub uri: String,
    #[serde(default)]
    pub title: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LinkValue {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            title: String::new(),
            extra: Map::new(),
        }
    }
}

/// Canonical stored representation of a field value.
///
/// Serialized untagged, so the stored JSON is exactly the shape each kind
/// documents (`{value}`, `{value, format}`, `true`, `{uri, title}`, or a list
/// of `{target_id, target_revision_id}`). Variant order matters for
/// deserialization: rich text must be tried before plain text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    RichText { value: String, format: String },
    PlainText { value: String },
    Link(LinkValue),
    Boolean(bool),
    References(Vec<RecordRef>),
}

impl FieldValue {
    /// Convert to the JSON shape handed to the store.
    pub fn to_json(&self) -> Value {
        // Every variant is built from strings, bools and integers.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// References held by this value, in order. Empty for scalar values.
    pub fn references(&self) -> &[RecordRef] {
        match self {
            FieldValue::References(refs) => refs,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_untagged_shapes() {
        assert_eq!(
            FieldValue::PlainText {
                value: "Hello".into()
            }
            .to_json(),
            json!({"value": "Hello"})
        );
        assert_eq!(FieldValue::Boolean(true).to_json(), json!(true));
        assert_eq!(
            FieldValue::Link(LinkValue::new("https://example.com")).to_json(),
            json!({"uri": "https://example.com", "title": ""})
        );
    }

    #[test]
    fn test_rich_text_deserializes_before_plain_text() {
        let v: FieldValue =
            serde_json::from_value(json!({"value": "<p>x</p>", "format": "full_html"})).unwrap();
        assert!(matches!(v, FieldValue::RichText { .. }));
        let v: FieldValue = serde_json::from_value(json!({"value": "x"})).unwrap();
        assert!(matches!(v, FieldValue::PlainText { .. }));
    }

    #[test]
    fn test_link_keeps_extra_keys() {
        let raw = json!({"uri": "https://x.com", "title": "X", "options": {"target": "_blank"}});
        let link: LinkValue = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(link.extra.len(), 1);
        assert_eq!(serde_json::to_value(&link).unwrap(), raw);
    }

    #[test]
    fn test_references_json() {
        let v = FieldValue::References(vec![RecordRef {
            target_id: RecordId(4),
            target_revision_id: RevisionId(9),
        }]);
        assert_eq!(
            v.to_json(),
            json!([{"target_id": 4, "target_revision_id": 9}])
        );
        assert_eq!(v.references().len(), 1);
        assert!(FieldValue::Boolean(false).references().is_empty());
    }
}
