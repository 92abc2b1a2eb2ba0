//! splitsync configuration.
//!
//! TOML-based configuration with validation. Every section uses
//! `serde(default)`, so a partial file (or none at all) works.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use splitsync_config::{load_config, config_to_json};
//!
//! let config = load_config().expect("failed to load config");
//! println!("{}", config_to_json(&config));
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    ConnectionConfig, DistributionMode, InitialSync, LogLevel, LoggingConfig, SyncConfig,
    SyncSection, CONFIG_SCHEMA_VERSION,
};

use splitsync_common::ConfigError;

/// Load config from the platform default path, creating it if missing.
///
/// Out-of-range values do not fail the load: the parsed config is
/// returned as-is. Run [`validation::validate`] to report them.
pub fn load_config() -> Result<SyncConfig, ConfigError> {
    toml_loader::load_default()
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &SyncConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
