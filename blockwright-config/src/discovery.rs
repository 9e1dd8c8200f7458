//! Configuration file discovery
//!
//! Finds `blockwright.{toml,yaml,yml,json}` in the global (`~/.blockwright/`)
//! and project (`./.blockwright/`) directories, ordered so that project files
//! override global ones when merged by figment.

use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// Name of the configuration directory in both scopes
pub const CONFIG_DIR_NAME: &str = ".blockwright";

const FILE_STEM: &str = "blockwright";

/// A discovered configuration file
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub path: PathBuf,
    pub format: ConfigFormat,
    pub scope: ConfigScope,
}

/// Format detected from file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Detect format from a path's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// Where a configuration file was discovered
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigScope {
    Global,
    Project,
}

/// File discovery service for finding configuration files
pub struct FileDiscovery {
    /// Explicit directories; `None` resolves the standard locations at discovery time.
    dirs: Option<Vec<(PathBuf, ConfigScope)>>,
}

impl FileDiscovery {
    /// Discover in `./.blockwright/` and `~/.blockwright/`.
    pub fn new() -> Self {
        Self { dirs: None }
    }

    /// Discover in explicit directories instead of the standard locations.
    pub fn with_dirs(project_dir: Option<PathBuf>, global_dir: Option<PathBuf>) -> Self {
        let dirs = global_dir
            .map(|d| (d, ConfigScope::Global))
            .into_iter()
            .chain(project_dir.map(|d| (d, ConfigScope::Project)))
            .collect();
        Self { dirs: Some(dirs) }
    }

    /// Discover all configuration files, lowest precedence first.
    pub fn discover_all(&self) -> Vec<ConfigFile> {
        let dirs = match &self.dirs {
            Some(dirs) => dirs.clone(),
            None => Self::standard_dirs(),
        };

        let mut files: Vec<ConfigFile> = dirs
            .iter()
            .flat_map(|(dir, scope)| self.search_directory(dir, *scope))
            .collect();
        files.sort_by_key(|f| f.scope);

        debug!(count = files.len(), "discovered configuration files");
        files
    }

    fn standard_dirs() -> Vec<(PathBuf, ConfigScope)> {
        let global = dirs::home_dir().map(|home| (home.join(CONFIG_DIR_NAME), ConfigScope::Global));
        let project = std::env::current_dir()
            .ok()
            .map(|cwd| (cwd.join(CONFIG_DIR_NAME), ConfigScope::Project));
        global.into_iter().chain(project).collect()
    }

    fn search_directory(&self, dir: &Path, scope: ConfigScope) -> Vec<ConfigFile> {
        if !dir.exists() {
            trace!("Directory does not exist: {}", dir.display());
            return Vec::new();
        }
        if !dir.is_dir() {
            warn!("Path exists but is not a directory: {}", dir.display());
            return Vec::new();
        }

        ["toml", "yaml", "yml", "json"]
            .iter()
            .map(|ext| dir.join(format!("{FILE_STEM}.{ext}")))
            .filter(|candidate| candidate.is_file())
            .filter_map(|path| {
                let format = ConfigFormat::from_path(&path)?;
                Some(ConfigFile {
                    path,
                    format,
                    scope,
                })
            })
            .collect()
    }
}

impl Default for FileDiscovery {
    fn default() -> Self {
        Self::new()
    }
}
