//! Validation for the connection and sync sections.

use regex::Regex;

use crate::schema::{SyncConfig, CONFIG_SCHEMA_VERSION};

use super::helpers::{validate_range, validate_range_f64};

pub(crate) fn validate_schema_version(errors: &mut Vec<String>, config: &SyncConfig) {
    if config.schema_version > CONFIG_SCHEMA_VERSION {
        errors.push(format!(
            "schema_version {} is newer than the supported version {CONFIG_SCHEMA_VERSION}",
            config.schema_version
        ));
    }
}

pub(crate) fn validate_connection(errors: &mut Vec<String>, config: &SyncConfig) {
    validate_range(
        errors,
        "connection.reconnect_backoff_ms",
        config.connection.reconnect_backoff_ms,
        100,
        60_000,
    );
    validate_range(
        errors,
        "connection.max_frame_bytes",
        config.connection.max_frame_bytes as u64,
        1024,
        64 * 1024 * 1024,
    );
}

pub(crate) fn validate_sync(errors: &mut Vec<String>, config: &SyncConfig) {
    validate_range(
        errors,
        "sync.echo_cooldown_ms",
        config.sync.echo_cooldown_ms,
        0,
        5000,
    );
    validate_range_f64(
        errors,
        "sync.size_tolerance",
        config.sync.size_tolerance,
        0.0,
        0.5,
    );
    for pattern in &config.sync.ignore_patterns {
        if let Err(e) = Regex::new(pattern) {
            errors.push(format!("sync.ignore_patterns: invalid regex '{pattern}': {e}"));
        }
    }
}
