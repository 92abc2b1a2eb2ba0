//! Sync behavior: echo suppression, buffer distribution, change detection.

use serde::{Deserialize, Serialize};

/// How open files are spread over the panes of an outbound layout.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DistributionMode {
    #[default]
    RoundRobin,
    AllToEveryLeaf,
    VisibleOnly,
}

/// Which side pushes its layout as soon as a connection is up.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum InitialSync {
    #[default]
    Listener,
    Connector,
    Both,
    None,
}

impl InitialSync {
    pub fn sends_from(self, is_listener: bool) -> bool {
        match self {
            InitialSync::Listener => is_listener,
            InitialSync::Connector => !is_listener,
            InitialSync::Both => true,
            InitialSync::None => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSection {
    /// Outbound syncs are dropped for this long after an inbound apply (0-5000).
    pub echo_cooldown_ms: u64,
    pub distribution: DistributionMode,
    /// Pane size differences up to this fraction do not count as a change (0.0-0.5).
    pub size_tolerance: f64,
    /// Regexes; matching buffer paths are never sent or compared.
    pub ignore_patterns: Vec<String>,
    pub initial_sync: InitialSync,
}

impl Default for SyncSection {
    fn default() -> Self {
        Self {
            echo_cooldown_ms: 100,
            distribution: DistributionMode::RoundRobin,
            size_tolerance: 0.01,
            ignore_patterns: Vec::new(),
            initial_sync: InitialSync::Listener,
        }
    }
}
