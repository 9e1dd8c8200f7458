//! Migration document loading
//!
//! Documents are parsed with the format's own serde implementation rather
//! than through figment, because figment's dictionaries are key-sorted and
//! field order in a block spec is meaningful.

use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::discovery::ConfigFormat;
use crate::error::{ConfigError, ConfigResult};

/// Read and deserialize a YAML, JSON or TOML document, chosen by extension.
pub fn load_document<T: DeserializeOwned>(path: &Path) -> ConfigResult<T> {
    let format = ConfigFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
        format: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("<none>")
            .to_string(),
    })?;

    let content = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ConfigError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::FileRead {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    debug!(path = %path.display(), ?format, "loading document");
    parse_document(&content, format).map_err(|message| ConfigError::Document {
        path: path.to_path_buf(),
        message,
    })
}

fn parse_document<T: DeserializeOwned>(content: &str, format: ConfigFormat) -> Result<T, String> {
    match format {
        ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        ConfigFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        ConfigFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
    }
}
