//! Settings provider using Figment

use std::path::Path;

use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use blockwright_common::Pretty;
use tracing::{debug, trace};

use crate::discovery::{ConfigFile, ConfigFormat, FileDiscovery};
use crate::error::{ConfigError, ConfigResult};
use crate::settings::EngineSettings;

/// Prefix of environment variables that override settings
pub const ENV_PREFIX: &str = "BLOCKWRIGHT_";

/// Loads [`EngineSettings`] from every source in precedence order.
///
/// No caching is performed; settings are read fresh on each call.
pub struct ConfigProvider {
    discovery: FileDiscovery,
}

impl ConfigProvider {
    /// Provider using the standard discovery locations
    pub fn new() -> Self {
        Self {
            discovery: FileDiscovery::new(),
        }
    }

    /// Provider using a custom discovery (tests, embedded hosts)
    pub fn with_discovery(discovery: FileDiscovery) -> Self {
        Self { discovery }
    }

    /// Load and validate settings.
    ///
    /// Sources, later overriding earlier:
    /// 1. Defaults
    /// 2. Discovered files (global, then project)
    /// 3. `explicit`, when given
    /// 4. `BLOCKWRIGHT_*` environment variables
    pub fn load_settings(&self, explicit: Option<&Path>) -> ConfigResult<EngineSettings> {
        let mut figment = Figment::from(Serialized::defaults(EngineSettings::default()));

        for file in self.discovery.discover_all() {
            trace!("Loading config file: {} ({:?})", file.path.display(), file.format);
            figment = figment.merge(Self::file_provider(&file));
        }

        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(ConfigError::FileNotFound {
                    path: path.to_path_buf(),
                });
            }
            let format =
                ConfigFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
                    format: path.display().to_string(),
                })?;
            figment = figment.merge(Self::file_provider(&ConfigFile {
                path: path.to_path_buf(),
                format,
                scope: crate::discovery::ConfigScope::Project,
            }));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX));

        let settings: EngineSettings = figment.extract()?;
        settings.validate()?;
        debug!("engine settings loaded: {}", Pretty(&settings));
        Ok(settings)
    }

    fn file_provider(file: &ConfigFile) -> Figment {
        match file.format {
            ConfigFormat::Toml => Figment::from(Toml::file(&file.path)),
            ConfigFormat::Yaml => Figment::from(Yaml::file(&file.path)),
            ConfigFormat::Json => Figment::from(Json::file(&file.path)),
        }
    }
}

impl Default for ConfigProvider {
    fn default() -> Self {
        Self::new()
    }
}
