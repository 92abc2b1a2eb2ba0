//! Core TOML config loading: read from path or platform default.

use std::io::ErrorKind;
use std::path::Path;

use splitsync_common::ConfigError;
use tracing::{info, warn};

use super::paths::{create_default_config, default_config_path};
use crate::schema::SyncConfig;
use crate::validation;

/// Parse config from TOML text, filling missing fields with defaults.
pub fn load_from_str(content: &str) -> Result<SyncConfig, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))
}

/// Load config from a specific TOML file path.
///
/// If validation fails a warning is logged and the parsed config is
/// returned as-is.
pub fn load_from_path(path: &Path) -> Result<SyncConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ConfigError::FileNotFound(path.to_path_buf()),
        _ => ConfigError::ParseError(format!("failed to read {}: {e}", path.display())),
    })?;

    let config = load_from_str(&content)?;

    if let Err(e) = validation::validate(&config) {
        warn!("config validation warning: {e}; using parsed values anyway");
    }

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from the platform-specific default path.
///
/// On Linux: `~/.config/splitsync/config.toml`
/// On macOS: `~/Library/Application Support/splitsync/config.toml`
pub fn load_default() -> Result<SyncConfig, ConfigError> {
    load_or_create(&default_config_path()?)
}

/// Load config from `path`. If the file does not exist, a commented
/// default is written there and the defaults are returned.
pub fn load_or_create(path: &Path) -> Result<SyncConfig, ConfigError> {
    match load_from_path(path) {
        Ok(config) => Ok(config),
        Err(ConfigError::FileNotFound(_)) => {
            info!("no config found at {}, creating default", path.display());
            create_default_config(path)?;
            Ok(SyncConfig::default())
        }
        Err(e) => Err(e),
    }
}
