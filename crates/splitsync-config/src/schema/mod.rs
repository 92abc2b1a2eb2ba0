//! Configuration schema types.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod connection;
mod logging;
mod sync;

pub use connection::*;
pub use logging::*;
pub use sync::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Schema the file was written for. Files newer than
    /// [`CONFIG_SCHEMA_VERSION`] fail validation.
    pub schema_version: u32,
    pub connection: ConnectionConfig,
    pub sync: SyncSection,
    pub logging: LoggingConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            schema_version: CONFIG_SCHEMA_VERSION,
            connection: ConnectionConfig::default(),
            sync: SyncSection::default(),
            logging: LoggingConfig::default(),
        }
    }
}
