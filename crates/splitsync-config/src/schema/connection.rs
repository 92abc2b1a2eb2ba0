use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// File name of the socket when no path is configured.
pub const DEFAULT_SOCKET_NAME: &str = "splitsync.sock";

/// Local socket connection between the two peers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Socket path. Defaults to the runtime directory (or the temp dir).
    pub socket_path: Option<PathBuf>,
    /// Delay between reconnect attempts on the connecting side (100-60000).
    pub reconnect_backoff_ms: u64,
    /// Largest accepted frame in bytes (1 KiB - 64 MiB).
    pub max_frame_bytes: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            socket_path: None,
            reconnect_backoff_ms: 1000,
            max_frame_bytes: 4 * 1024 * 1024,
        }
    }
}

impl ConnectionConfig {
    /// The configured socket path, or the platform default.
    pub fn resolved_socket_path(&self) -> PathBuf {
        self.socket_path.clone().unwrap_or_else(|| {
            dirs::runtime_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join(DEFAULT_SOCKET_NAME)
        })
    }
}
