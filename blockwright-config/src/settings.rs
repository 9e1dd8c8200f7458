//! Engine settings

use blockwright_fields::{CoerceHints, DEFAULT_TEXT_FORMAT};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Knobs that shape a materialization run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Deepest nesting of child specs accepted before failing the spec.
    pub max_depth: usize,
    /// Rich-text format used when neither the value nor the field names one.
    pub default_text_format: String,
    /// Prefix of component ids in assembled layouts (`<source>:<record id>`).
    pub component_source: String,
    /// Prefix of position-derived ids given to blocks without an explicit `id`.
    pub row_id_prefix: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_depth: 8,
            default_text_format: DEFAULT_TEXT_FORMAT.to_string(),
            component_source: "block_content".to_string(),
            row_id_prefix: "block".to_string(),
        }
    }
}

impl EngineSettings {
    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_depth == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_depth".into(),
                message: "must be at least 1".into(),
            });
        }
        for (key, value) in [
            ("default_text_format", &self.default_text_format),
            ("component_source", &self.component_source),
            ("row_id_prefix", &self.row_id_prefix),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: key.into(),
                    message: "must not be empty".into(),
                });
            }
        }
        Ok(())
    }

    /// Hints handed to the field value coercer.
    pub fn coerce_hints(&self) -> CoerceHints {
        CoerceHints {
            default_format: self.default_text_format.clone(),
        }
    }
}
