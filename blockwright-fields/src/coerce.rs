//! Field value coercion.
//!
//! [`coerce`] maps a raw configuration value onto the canonical stored shape
//! for a scalar [`FieldKind`]. It is pure: no I/O, no record creation, and on
//! failure nothing is returned but the error. Reference lists are rejected
//! with [`FieldsError::NotScalar`]; building them needs child records and is
//! the materializer's job.

use serde_json::{Map, Value};

use crate::error::{FieldsError, Result};
use crate::types::FieldKind;
use crate::value::{FieldValue, LinkValue};

/// Text format applied to rich text when neither the value nor the field names one.
pub const DEFAULT_TEXT_FORMAT: &str = "basic_html";

/// Engine-wide hints consulted during coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoerceHints {
    pub default_format: String,
}

impl Default for CoerceHints {
    fn default() -> Self {
        Self {
            default_format: DEFAULT_TEXT_FORMAT.to_string(),
        }
    }
}

/// Coerce `raw` into the stored representation for `kind`.
pub fn coerce(raw: &Value, kind: &FieldKind, hints: &CoerceHints) -> Result<FieldValue> {
    match kind {
        FieldKind::PlainText => coerce_plain_text(raw),
        FieldKind::RichText { default_format } => {
            let format = default_format.as_deref().unwrap_or(&hints.default_format);
            coerce_rich_text(raw, format)
        }
        FieldKind::Boolean => coerce_boolean(raw),
        FieldKind::Link => coerce_link(raw),
        FieldKind::ReferenceList { .. } => Err(FieldsError::NotScalar { kind: kind.name() }),
    }
}

fn coerce_plain_text(raw: &Value) -> Result<FieldValue> {
    let value = match raw {
        Value::Object(map) => match map.get("value") {
            Some(inner) => scalar_text(inner).ok_or_else(|| {
                FieldsError::invalid("plain_text", format!("'value' must be a scalar, got {inner}"))
            })?,
            None => {
                return Err(FieldsError::invalid(
                    "plain_text",
                    "map values must carry a 'value' key",
                ))
            }
        },
        other => scalar_text(other).ok_or_else(|| {
            FieldsError::invalid("plain_text", format!("expected a scalar, got {other}"))
        })?,
    };
    Ok(FieldValue::PlainText { value })
}

fn coerce_rich_text(raw: &Value, format: &str) -> Result<FieldValue> {
    match raw {
        Value::Object(map) => {
            let value = match map.get("value") {
                Some(inner) => scalar_text(inner).ok_or_else(|| {
                    FieldsError::invalid(
                        "rich_text",
                        format!("'value' must be a scalar, got {inner}"),
                    )
                })?,
                None => {
                    return Err(FieldsError::invalid(
                        "rich_text",
                        "map values must carry a 'value' key",
                    ))
                }
            };
            let format = match map.get("format") {
                Some(Value::String(f)) => f.clone(),
                Some(other) => {
                    return Err(FieldsError::invalid(
                        "rich_text",
                        format!("'format' must be a string, got {other}"),
                    ))
                }
                None => format.to_string(),
            };
            Ok(FieldValue::RichText { value, format })
        }
        other => {
            let value = scalar_text(other).ok_or_else(|| {
                FieldsError::invalid("rich_text", format!("expected text, got {other}"))
            })?;
            Ok(FieldValue::RichText {
                value,
                format: format.to_string(),
            })
        }
    }
}

fn coerce_boolean(raw: &Value) -> Result<FieldValue> {
    let parsed = match raw {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(s) => match s.trim() {
            "1" | "true" => Some(true),
            "0" | "false" => Some(false),
            _ => None,
        },
        _ => None,
    };
    parsed.map(FieldValue::Boolean).ok_or_else(|| {
        FieldsError::invalid("boolean", format!("expected true/false or 1/0, got {raw}"))
    })
}

fn coerce_link(raw: &Value) -> Result<FieldValue> {
    match raw {
        Value::String(uri) if !uri.trim().is_empty() => Ok(FieldValue::Link(LinkValue::new(uri))),
        Value::Object(map) if map.get("uri").is_some_and(Value::is_string) => {
            link_from_map(map).map(FieldValue::Link)
        }
        other => Err(FieldsError::invalid(
            "link",
            format!("expected a URL or a map with 'uri', got {other}"),
        )),
    }
}

fn link_from_map(map: &Map<String, Value>) -> Result<LinkValue> {
    serde_json::from_value(Value::Object(map.clone()))
        .map_err(|e| FieldsError::invalid("link", e.to_string()))
}

/// Stringify a JSON scalar. `null` becomes the empty string; arrays and maps are rejected.
fn scalar_text(raw: &Value) -> Option<String> {
    match raw {
        Value::Null => Some(String::new()),
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rich() -> FieldKind {
        FieldKind::RichText {
            default_format: None,
        }
    }

    #[test]
    fn plain_text_wraps_scalars() {
        let hints = CoerceHints::default();
        assert_eq!(
            coerce(&json!("Hello"), &FieldKind::PlainText, &hints).unwrap(),
            FieldValue::PlainText {
                value: "Hello".into()
            }
        );
        assert_eq!(
            coerce(&json!(42), &FieldKind::PlainText, &hints).unwrap(),
            FieldValue::PlainText { value: "42".into() }
        );
    }

    #[test]
    fn plain_text_accepts_missing_value() {
        let hints = CoerceHints::default();
        let empty = FieldValue::PlainText {
            value: String::new(),
        };
        assert_eq!(
            coerce(&Value::Null, &FieldKind::PlainText, &hints).unwrap(),
            empty
        );
        assert_eq!(
            coerce(&json!(""), &FieldKind::PlainText, &hints).unwrap(),
            empty
        );
    }

    #[test]
    fn plain_text_rejects_lists() {
        let err = coerce(&json!(["a"]), &FieldKind::PlainText, &CoerceHints::default());
        assert!(matches!(
            err,
            Err(FieldsError::InvalidFieldValue {
                kind: "plain_text",
                ..
            })
        ));
    }

    #[test]
    fn rich_text_uses_engine_default_format() {
        let v = coerce(&json!("<p>Hi</p>"), &rich(), &CoerceHints::default()).unwrap();
        assert_eq!(
            v,
            FieldValue::RichText {
                value: "<p>Hi</p>".into(),
                format: DEFAULT_TEXT_FORMAT.into()
            }
        );
    }

    #[test]
    fn rich_text_prefers_field_format_hint() {
        let kind = FieldKind::RichText {
            default_format: Some("full_html".into()),
        };
        let v = coerce(&json!("<p>Hi</p>"), &kind, &CoerceHints::default()).unwrap();
        assert!(matches!(v, FieldValue::RichText { ref format, .. } if format == "full_html"));
    }

    #[test]
    fn rich_text_passes_wrapped_value_through() {
        let raw = json!({"value": "<b>x</b>", "format": "restricted_html"});
        let v = coerce(&raw, &rich(), &CoerceHints::default()).unwrap();
        assert_eq!(v.to_json(), raw);
    }

    #[test]
    fn rich_text_coercion_is_idempotent() {
        let hints = CoerceHints::default();
        for raw in [
            json!("plain"),
            json!(""),
            Value::Null,
            json!(7),
            json!({"value": "v"}),
            json!({"value": "v", "format": "full_html"}),
        ] {
            let once = coerce(&raw, &rich(), &hints).unwrap();
            let twice = coerce(&once.to_json(), &rich(), &hints).unwrap();
            assert_eq!(once, twice, "not idempotent for {raw}");
        }
    }

    #[test]
    fn boolean_accepts_truthy_and_falsy() {
        let hints = CoerceHints::default();
        for (raw, expected) in [
            (json!(true), true),
            (json!(false), false),
            (json!(1), true),
            (json!(0), false),
            (json!("1"), true),
            (json!("0"), false),
            (json!("true"), true),
            (json!("false"), false),
        ] {
            assert_eq!(
                coerce(&raw, &FieldKind::Boolean, &hints).unwrap(),
                FieldValue::Boolean(expected),
                "for {raw}"
            );
        }
    }

    #[test]
    fn boolean_rejects_anything_else() {
        let hints = CoerceHints::default();
        for raw in [json!("yes"), json!(2), Value::Null, json!({"value": true})] {
            assert!(
                matches!(
                    coerce(&raw, &FieldKind::Boolean, &hints),
                    Err(FieldsError::InvalidFieldValue {
                        kind: "boolean",
                        ..
                    })
                ),
                "accepted {raw}"
            );
        }
    }

    #[test]
    fn link_from_bare_url() {
        let v = coerce(
            &json!("https://example.com"),
            &FieldKind::Link,
            &CoerceHints::default(),
        )
        .unwrap();
        assert_eq!(v.to_json(), json!({"uri": "https://example.com", "title": ""}));
    }

    #[test]
    fn link_map_passes_through() {
        let raw = json!({"uri": "https://x.com/a", "title": "A"});
        let v = coerce(&raw, &FieldKind::Link, &CoerceHints::default()).unwrap();
        assert_eq!(v.to_json(), raw);
    }

    #[test]
    fn link_rejects_other_shapes() {
        let hints = CoerceHints::default();
        for raw in [json!({"title": "A"}), json!(3), json!(""), Value::Null] {
            assert!(coerce(&raw, &FieldKind::Link, &hints).is_err(), "accepted {raw}");
        }
    }

    #[test]
    fn reference_list_is_not_coerced() {
        let kind = FieldKind::ReferenceList { allowed: vec![] };
        assert!(matches!(
            coerce(&json!([]), &kind, &CoerceHints::default()),
            Err(FieldsError::NotScalar {
                kind: "reference_list"
            })
        ));
    }
}
