//! Host events that may trigger an outbound sync attempt.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Something changed in the local editor.
///
/// Every variant except `Shutdown` is a trigger for an outbound sync
/// attempt; whether anything is actually sent is up to the session's
/// echo guard and change detector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum HostEvent {
    FocusChanged,
    LayoutChanged,
    BufferOpened { path: String },
    BufferClosed { path: String },
    BufferSaved { path: String },
    ViewChanged { path: String },
    Shutdown,
    #[serde(other)]
    Unknown,
}

impl HostEvent {
    pub fn triggers_sync(&self) -> bool {
        !matches!(self, HostEvent::Shutdown | HostEvent::Unknown)
    }
}

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<HostEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<HostEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: HostEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
