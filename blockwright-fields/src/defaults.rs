//! Built-in content types seeded by `blockwright init`.

use crate::registry::TypeDefaults;
use crate::types::{FieldKind, TypeDef};

fn rich_text() -> FieldKind {
    FieldKind::RichText {
        default_format: None,
    }
}

fn children(allowed: &[&str]) -> FieldKind {
    FieldKind::ReferenceList {
        allowed: allowed.iter().map(|s| s.to_string()).collect(),
    }
}

/// The default set of paragraph and block types.
pub fn builtin_types() -> TypeDefaults {
    TypeDefaults::new()
        .type_def(
            TypeDef::new("text")
                .with_field("title", FieldKind::PlainText)
                .with_field("body", rich_text()),
        )
        .type_def(
            TypeDef::new("cta")
                .with_field("title", FieldKind::PlainText)
                .with_field("link", FieldKind::Link)
                .with_field("new_window", FieldKind::Boolean),
        )
        .type_def(
            TypeDef::new("accordion_item")
                .with_field("title", FieldKind::PlainText)
                .with_field("body", rich_text())
                .with_field("expanded", FieldKind::Boolean),
        )
        .type_def(
            TypeDef::new("accordion")
                .with_field("title", FieldKind::PlainText)
                .with_field("items", children(&["accordion_item"])),
        )
        .type_def(
            TypeDef::new("card")
                .with_field("title", FieldKind::PlainText)
                .with_field("body", rich_text())
                .with_field("link", FieldKind::Link),
        )
        .type_def(
            TypeDef::new("card_group")
                .with_field("title", FieldKind::PlainText)
                .with_field("cards", children(&["card"])),
        )
}
