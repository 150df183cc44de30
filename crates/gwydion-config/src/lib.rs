//! Configuration system for the Gwydion scheduling backend.
//!
//! Provides TOML-based configuration with:
//! - Config file layering (XDG user config + project-local overrides)
//! - Environment fallbacks for secrets (`GOOGLE_APPLICATION_CREDENTIALS`,
//!   `OPENAI_API_KEY`)
//! - Endpoint overrides so tests can point the Google, OpenAI, and Wikipedia
//!   clients at a local server

pub mod discovery;
pub mod error;
pub mod types;

pub use discovery::{
    ConfigSource, LoadedConfig, load_config, load_config_file, load_config_with_options,
    save_config, xdg_config_dir, xdg_config_path,
};
pub use error::{ConfigError, Result};
pub use types::*;
