//! Tests for the full validation pipeline.

use super::*;
use crate::schema::CONFIG_SCHEMA_VERSION;

#[test]
fn default_config_validates() {
    assert!(validate(&SyncConfig::default()).is_ok());
}

#[test]
fn catches_backoff_too_small() {
    let mut config = SyncConfig::default();
    config.connection.reconnect_backoff_ms = 10;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("connection.reconnect_backoff_ms"));
}

#[test]
fn catches_frame_limit_too_large() {
    let mut config = SyncConfig::default();
    config.connection.max_frame_bytes = 128 * 1024 * 1024;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("connection.max_frame_bytes"));
}

#[test]
fn catches_cooldown_too_long() {
    let mut config = SyncConfig::default();
    config.sync.echo_cooldown_ms = 6000;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("sync.echo_cooldown_ms"));
}

#[test]
fn zero_cooldown_is_allowed() {
    let mut config = SyncConfig::default();
    config.sync.echo_cooldown_ms = 0;
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_size_tolerance_out_of_range() {
    let mut config = SyncConfig::default();
    config.sync.size_tolerance = 0.9;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("sync.size_tolerance"));
}

#[test]
fn catches_nan_size_tolerance() {
    let mut config = SyncConfig::default();
    config.sync.size_tolerance = f64::NAN;
    assert!(validate(&config).is_err());
}

#[test]
fn catches_invalid_ignore_pattern() {
    let mut config = SyncConfig::default();
    config.sync.ignore_patterns = vec![r"\.git/".into(), "(unclosed".into()];
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("(unclosed"));
    assert!(!err.contains(r"\.git/"));
}

#[test]
fn collects_every_error() {
    let mut config = SyncConfig::default();
    config.connection.reconnect_backoff_ms = 0;
    config.sync.echo_cooldown_ms = 10_000;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("connection.reconnect_backoff_ms"));
    assert!(err.contains("sync.echo_cooldown_ms"));
}

#[test]
fn catches_newer_schema_version() {
    let mut config = SyncConfig::default();
    config.schema_version = CONFIG_SCHEMA_VERSION + 1;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("schema_version"));
}
