//! SchemaRegistry: type definitions on disk, indexed in memory.
//!
//! Type definitions live as one YAML file per type under `<root>/types/`.
//! The registry is the ready-made [`SchemaProvider`]; hosts with their own
//! field-definition store implement the trait instead.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;
use ulid::Ulid;

use crate::error::{FieldsError, Result};
use crate::types::{FieldSpec, TypeDef};

/// Source of field schemas for materializable types.
pub trait SchemaProvider {
    /// Ordered fields of `type_name`. Fails with `UnknownType` if it is not registered.
    fn fields_of(&self, type_name: &str) -> Result<&[FieldSpec]>;
}

/// A collection of default type definitions.
///
/// Consumers build this to pass to `SchemaRegistryBuilder::with_defaults()`.
/// On open, defaults that don't already exist on disk are written.
pub struct TypeDefaults {
    types: Vec<TypeDef>,
}

impl TypeDefaults {
    pub fn new() -> Self {
        Self { types: Vec::new() }
    }

    /// Add a default type definition.
    pub fn type_def(mut self, def: TypeDef) -> Self {
        self.types.push(def);
        self
    }

    /// Access the type definitions.
    pub fn types(&self) -> &[TypeDef] {
        &self.types
    }
}

impl Default for TypeDefaults {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `SchemaRegistry`. Created by `SchemaRegistry::open()`.
pub struct SchemaRegistryBuilder {
    root: PathBuf,
    defaults: Option<TypeDefaults>,
}

impl SchemaRegistryBuilder {
    /// Provide default type definitions.
    /// Defaults are seeded on first open; existing definitions are preserved.
    pub fn with_defaults(mut self, defaults: TypeDefaults) -> Self {
        self.defaults = Some(defaults);
        self
    }

    /// Build the registry: create directories, seed defaults, load from disk.
    pub async fn build(self) -> Result<SchemaRegistry> {
        let types_dir = self.root.join("types");
        fs::create_dir_all(&types_dir).await?;

        if let Some(defaults) = &self.defaults {
            seed_defaults(&types_dir, defaults).await?;
        }

        let mut registry = SchemaRegistry {
            root: Some(self.root),
            types: Vec::new(),
            index: HashMap::new(),
        };
        registry.load_types(&types_dir).await?;

        debug!(types = registry.types.len(), "schema registry opened");
        Ok(registry)
    }
}

/// Seed default type definitions that don't already exist on disk (name-matched).
async fn seed_defaults(types_dir: &Path, defaults: &TypeDefaults) -> Result<()> {
    for def in defaults.types() {
        let path = types_dir.join(format!("{}.yaml", def.name));
        if !path.exists() {
            let yaml = serde_yaml::to_string(def)?;
            atomic_write(&path, yaml.as_bytes()).await?;
            debug!(name = %def.name, "seeded default type");
        }
    }
    Ok(())
}

/// Registry of type definitions.
///
/// ```text
/// <root>/
///   types/    ← one .yaml per block or paragraph type
/// ```
pub struct SchemaRegistry {
    root: Option<PathBuf>,
    types: Vec<TypeDef>,
    index: HashMap<String, usize>,
}

impl SchemaRegistry {
    /// Open or create a schema directory. Returns a builder for optional configuration.
    ///
    /// ```rust,ignore
    /// let registry = SchemaRegistry::open(path)
    ///     .with_defaults(builtin_types())
    ///     .build()
    ///     .await?;
    /// ```
    pub fn open(root: impl Into<PathBuf>) -> SchemaRegistryBuilder {
        SchemaRegistryBuilder {
            root: root.into(),
            defaults: None,
        }
    }

    /// Build an in-memory registry with no backing directory.
    pub fn from_types(types: impl IntoIterator<Item = TypeDef>) -> Result<Self> {
        let mut registry = Self {
            root: None,
            types: Vec::new(),
            index: HashMap::new(),
        };
        for def in types {
            if registry.index.contains_key(&def.name) {
                return Err(FieldsError::DuplicateType { name: def.name });
            }
            registry.insert(def);
        }
        Ok(registry)
    }

    /// Get a type definition by name.
    pub fn get_type(&self, name: &str) -> Option<&TypeDef> {
        self.index.get(name).map(|&i| &self.types[i])
    }

    /// All type definitions, sorted by name for registries loaded from disk.
    pub fn all_types(&self) -> &[TypeDef] {
        &self.types
    }

    /// Write (create or update) a type definition. Persists to YAML when the
    /// registry has a backing directory.
    pub async fn write_type(&mut self, def: &TypeDef) -> Result<()> {
        if let Some(root) = &self.root {
            let yaml = serde_yaml::to_string(def)?;
            let path = root.join("types").join(format!("{}.yaml", def.name));
            atomic_write(&path, yaml.as_bytes()).await?;
        }

        match self.index.get(&def.name) {
            Some(&idx) => self.types[idx] = def.clone(),
            None => self.insert(def.clone()),
        }
        Ok(())
    }

    /// The root directory path, if any.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    // --- Internal ---

    fn insert(&mut self, def: TypeDef) {
        self.index.insert(def.name.clone(), self.types.len());
        self.types.push(def);
    }

    async fn load_types(&mut self, types_dir: &Path) -> Result<()> {
        if !types_dir.is_dir() {
            return Err(FieldsError::NotInitialized {
                path: types_dir.to_path_buf(),
            });
        }

        let mut loaded = Vec::new();
        let mut entries = fs::read_dir(types_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
                continue;
            }
            let content = fs::read_to_string(&path).await?;
            match serde_yaml::from_str::<TypeDef>(&content) {
                Ok(def) => loaded.push(def),
                Err(e) => {
                    tracing::warn!(?path, %e, "skipping invalid type definition");
                }
            }
        }

        loaded.sort_by(|a, b| a.name.cmp(&b.name));
        for def in loaded {
            if self.index.contains_key(&def.name) {
                tracing::warn!(name = %def.name, "skipping duplicate type definition");
                continue;
            }
            self.insert(def);
        }
        Ok(())
    }
}

impl SchemaProvider for SchemaRegistry {
    fn fields_of(&self, type_name: &str) -> Result<&[FieldSpec]> {
        self.get_type(type_name)
            .map(|def| def.fields.as_slice())
            .ok_or_else(|| FieldsError::UnknownType {
                name: type_name.to_string(),
            })
    }
}

/// Write to a temp file then rename for atomic persistence.
async fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, "no parent dir"))?;
    let tmp = dir.join(format!(".tmp_{}", Ulid::new()));
    fs::write(&tmp, data).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}
