//! Integration tests for migration document loading

use blockwright_config::{load_document, ConfigError};
use indexmap::IndexMap;
use serde::Deserialize;
use tempfile::TempDir;

#[derive(Debug, Deserialize)]
struct Doc {
    name: String,
    fields: IndexMap<String, serde_json::Value>,
}

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_yaml_document_keeps_key_order() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "doc.yaml",
        "name: hero\nfields:\n  zeta: 1\n  alpha: 2\n  mid: 3\n",
    );
    let doc: Doc = load_document(&path).unwrap();
    assert_eq!(doc.name, "hero");
    let keys: Vec<&str> = doc.fields.keys().map(String::as_str).collect();
    assert_eq!(keys, ["zeta", "alpha", "mid"]);
}

#[test]
fn test_json_and_toml_documents() {
    let dir = TempDir::new().unwrap();
    let json = write(&dir, "doc.json", r#"{"name": "j", "fields": {"b": true, "a": "x"}}"#);
    let toml = write(&dir, "doc.toml", "name = \"t\"\n[fields]\nb = 1\na = \"x\"\n");

    let doc: Doc = load_document(&json).unwrap();
    assert_eq!(doc.fields.keys().next().unwrap(), "b");
    let doc: Doc = load_document(&toml).unwrap();
    assert_eq!(doc.name, "t");
    assert_eq!(doc.fields.keys().next().unwrap(), "b");
}

#[test]
fn test_document_errors() {
    let dir = TempDir::new().unwrap();
    let ini = write(&dir, "doc.ini", "name=x");
    assert!(matches!(
        load_document::<Doc>(&ini),
        Err(ConfigError::UnsupportedFormat { format }) if format == "ini"
    ));

    assert!(matches!(
        load_document::<Doc>(&dir.path().join("missing.yaml")),
        Err(ConfigError::FileNotFound { .. })
    ));

    let bad = write(&dir, "bad.yaml", "name: [unclosed");
    assert!(matches!(
        load_document::<Doc>(&bad),
        Err(ConfigError::Document { .. })
    ));
}
