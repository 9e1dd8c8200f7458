//! Blockwright configuration management using Figment
//!
//! Two kinds of input are handled here:
//!
//! - **Engine settings** ([`EngineSettings`]): knobs such as the recursion bound
//!   and the default rich-text format. Loaded by [`ConfigProvider`] with the
//!   precedence defaults → global file → project file → explicit file → env.
//! - **Migration documents**: the YAML / JSON / TOML files describing blocks and
//!   layout sections. [`load_document`] picks the parser from the file extension
//!   and keeps map key order, which decides the order fields are processed in.
//!
//! # Configuration Files
//!
//! - Global: `~/.blockwright/blockwright.{toml,yaml,yml,json}`
//! - Project: `./.blockwright/blockwright.{toml,yaml,yml,json}`
//!
//! ```yaml
//! max_depth: 6
//! default_text_format: full_html
//! component_source: block_content
//! ```
//!
//! Environment variables use the `BLOCKWRIGHT_` prefix, e.g. `BLOCKWRIGHT_MAX_DEPTH=4`.

pub mod discovery;
pub mod document;
pub mod error;
pub mod provider;
pub mod settings;

pub use discovery::{ConfigFile, ConfigFormat, ConfigScope, FileDiscovery};
pub use document::load_document;
pub use error::{ConfigError, ConfigResult};
pub use provider::ConfigProvider;
pub use settings::EngineSettings;

/// Load engine settings from all discovered sources plus an optional explicit file.
pub fn load_settings(explicit: Option<&std::path::Path>) -> ConfigResult<EngineSettings> {
    ConfigProvider::new().load_settings(explicit)
}
