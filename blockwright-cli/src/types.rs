//! `blockwright types` - list registered types.

use blockwright_fields::{FieldKind, SchemaRegistry};
use comfy_table::{presets::UTF8_FULL, Table};

use crate::error::Result;
use crate::workspace::Workspace;

/// Load the registry and render it as a table.
pub async fn run_types(ws: &Workspace) -> Result<Table> {
    let registry = ws.registry().await?;
    Ok(types_table(&registry))
}

/// One row per type: name and its fields as `name: kind`.
pub fn types_table(registry: &SchemaRegistry) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Type", "Fields"]);

    for def in registry.all_types() {
        let fields: Vec<String> = def
            .fields
            .iter()
            .map(|f| format!("{}: {}", f.name, describe(&f.kind)))
            .collect();
        table.add_row(vec![def.name.clone(), fields.join("\n")]);
    }
    table
}

fn describe(kind: &FieldKind) -> String {
    match kind {
        FieldKind::RichText {
            default_format: Some(format),
        } => format!("rich_text ({format})"),
        FieldKind::ReferenceList { allowed } if !allowed.is_empty() => {
            format!("reference_list [{}]", allowed.join(", "))
        }
        other => other.name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockwright_fields::builtin_types;

    #[test]
    fn test_table_lists_fields() {
        let registry = SchemaRegistry::from_types(builtin_types().types().to_vec()).unwrap();
        let rendered = types_table(&registry).to_string();
        assert!(rendered.contains("accordion_item"));
        assert!(rendered.contains("items: reference_list [accordion_item]"));
        assert!(rendered.contains("new_window: boolean"));
    }

    #[test]
    fn test_describe_format_hint() {
        let kind = FieldKind::RichText {
            default_format: Some("full_html".into()),
        };
        assert_eq!(describe(&kind), "rich_text (full_html)");
    }
}
