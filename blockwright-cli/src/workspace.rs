//! Workspace directory shared by all commands.

use std::path::{Path, PathBuf};

use blockwright_config::EngineSettings;
use blockwright_engine::store::FileStore;
use blockwright_fields::{builtin_types, SchemaRegistry};
use tracing::debug;

use crate::error::{CliError, Result};

/// A workspace root plus the settings commands run with.
///
/// ```text
/// <root>/
///   types/        ← one .yaml per block type
///   store.json    ← records and node layouts
/// ```
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    settings: EngineSettings,
}

impl Workspace {
    /// Open `root`, loading settings from discovered files and `explicit`.
    pub fn load(root: impl Into<PathBuf>, explicit: Option<&Path>) -> Result<Self> {
        let settings = blockwright_config::load_settings(explicit)?;
        Ok(Self::with_settings(root, settings))
    }

    pub fn with_settings(root: impl Into<PathBuf>, settings: EngineSettings) -> Self {
        Self {
            root: root.into(),
            settings,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn is_initialized(&self) -> bool {
        self.root.join("types").is_dir()
    }

    /// Create directories and seed built-in types.
    pub async fn init(&self) -> Result<(SchemaRegistry, FileStore)> {
        let registry = SchemaRegistry::open(&self.root)
            .with_defaults(builtin_types())
            .build()
            .await?;
        let store = FileStore::open(&self.root).await?;
        if !store.path().exists() {
            store.save().await?;
        }
        debug!(root = %self.root.display(), "initialized workspace");
        Ok((registry, store))
    }

    /// Type registry of an initialized workspace.
    pub async fn registry(&self) -> Result<SchemaRegistry> {
        self.ensure_initialized()?;
        Ok(SchemaRegistry::open(&self.root).build().await?)
    }

    /// Record and layout store of an initialized workspace.
    pub async fn store(&self) -> Result<FileStore> {
        self.ensure_initialized()?;
        Ok(FileStore::open(&self.root).await?)
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(CliError::NotInitialized {
                root: self.root.clone(),
            })
        }
    }
}
