use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;
use ulid::Ulid;

use super::memory::{MemoryStore, StoreSnapshot};
use crate::error::Result;

/// A [`MemoryStore`] persisted as `<root>/store.json`.
///
/// ```text
/// <root>/
///   store.json   ← records, layouts and id counters
///   types/       ← schema registry
/// ```
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    store: MemoryStore,
}

impl FileStore {
    pub const FILE_NAME: &'static str = "store.json";

    /// Load the store under `root`. A missing file opens an empty store.
    pub async fn open(root: impl AsRef<Path>) -> Result<Self> {
        let path = root.as_ref().join(Self::FILE_NAME);
        let snapshot = if path.exists() {
            let content = fs::read_to_string(&path).await?;
            serde_json::from_str(&content)?
        } else {
            StoreSnapshot::default()
        };
        debug!(?path, "opened file store");
        Ok(Self {
            path,
            store: MemoryStore::from_snapshot(snapshot),
        })
    }

    /// The in-memory store. Changes are not on disk until [`FileStore::save`].
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the current state to disk.
    pub async fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.store.snapshot()?)?;
        atomic_write(&self.path, json.as_bytes()).await?;
        debug!(path = ?self.path, "saved file store");
        Ok(())
    }
}

/// Write to a temp file then rename for atomic persistence.
async fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, "no parent dir"))?;
    fs::create_dir_all(dir).await?;
    let tmp = dir.join(format!(".tmp_{}", Ulid::new()));
    fs::write(&tmp, data).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}
