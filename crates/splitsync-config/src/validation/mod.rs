//! Full configuration validation.
//!
//! Checks numeric ranges and that every ignore pattern compiles. Errors
//! from all sections are collected into a single `ConfigError`.

mod helpers;
mod sections;

#[cfg(test)]
mod tests;

use crate::schema::SyncConfig;
use splitsync_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &SyncConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    sections::validate_schema_version(&mut errors, config);
    sections::validate_connection(&mut errors, config);
    sections::validate_sync(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
