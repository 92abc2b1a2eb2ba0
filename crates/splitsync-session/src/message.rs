//! Wire messages and their JSON form.
//!
//! On the wire every message is `{"kind": ..., "payload": ..., "origin": ...}`.
//! `origin` is the sending session's id and may be absent in frames from
//! older peers.

use serde::{Deserialize, Serialize};
use splitsync_common::{FrameParseError, SessionId};
use splitsync_layout::{LayoutNode, ViewState};

pub const KIND_LAYOUT_SYNC: &str = "LayoutSync";
pub const KIND_BUFFER_CHANGED: &str = "BufferChanged";
pub const KIND_VIEW_CHANGED: &str = "ViewChanged";

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Full layout of the sender's current tab.
    LayoutSync(LayoutNode),
    /// Sender switched the focused window to `path`.
    BufferChanged { path: String },
    /// Cursor or scroll moved in `path`.
    ViewChanged { path: String, view_state: ViewState },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub payload: Payload,
    pub origin: Option<String>,
    /// Set on receipt when `origin` is the receiving session. Not sent.
    pub originated_locally: bool,
}

#[derive(Serialize, Deserialize)]
struct WireMessage {
    kind: String,
    payload: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    origin: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct BufferChangedPayload {
    path: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ViewChangedPayload {
    path: String,
    view_state: ViewState,
}

impl Message {
    pub fn new(payload: Payload, origin: &SessionId) -> Self {
        Self {
            payload,
            origin: Some(origin.as_str().to_owned()),
            originated_locally: false,
        }
    }

    pub fn layout_sync(tree: LayoutNode, origin: &SessionId) -> Self {
        Self::new(Payload::LayoutSync(tree), origin)
    }

    pub fn kind(&self) -> &'static str {
        match self.payload {
            Payload::LayoutSync(_) => KIND_LAYOUT_SYNC,
            Payload::BufferChanged { .. } => KIND_BUFFER_CHANGED,
            Payload::ViewChanged { .. } => KIND_VIEW_CHANGED,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        let payload = match &self.payload {
            Payload::LayoutSync(tree) => serde_json::to_value(tree)?,
            Payload::BufferChanged { path } => {
                serde_json::to_value(BufferChangedPayload { path: path.clone() })?
            }
            Payload::ViewChanged { path, view_state } => serde_json::to_value(ViewChangedPayload {
                path: path.clone(),
                view_state: *view_state,
            })?,
        };
        serde_json::to_vec(&WireMessage {
            kind: self.kind().to_owned(),
            payload,
            origin: self.origin.clone(),
        })
    }

    /// Parse one frame body (without its delimiter).
    pub fn from_json(bytes: &[u8]) -> Result<Self, FrameParseError> {
        let text = std::str::from_utf8(bytes).map_err(|_| FrameParseError::InvalidUtf8)?;
        let wire: WireMessage = serde_json::from_str(text)
            .map_err(|e| FrameParseError::InvalidJson(e.to_string()))?;

        let invalid = |e: serde_json::Error| FrameParseError::InvalidPayload {
            kind: wire.kind.clone(),
            reason: e.to_string(),
        };
        let payload = match wire.kind.as_str() {
            KIND_LAYOUT_SYNC => {
                Payload::LayoutSync(serde_json::from_value(wire.payload.clone()).map_err(invalid)?)
            }
            KIND_BUFFER_CHANGED => {
                let p: BufferChangedPayload =
                    serde_json::from_value(wire.payload.clone()).map_err(invalid)?;
                Payload::BufferChanged { path: p.path }
            }
            KIND_VIEW_CHANGED => {
                let p: ViewChangedPayload =
                    serde_json::from_value(wire.payload.clone()).map_err(invalid)?;
                Payload::ViewChanged {
                    path: p.path,
                    view_state: p.view_state,
                }
            }
            other => return Err(FrameParseError::UnknownKind(other.to_owned())),
        };

        Ok(Self {
            payload,
            origin: wire.origin,
            originated_locally: false,
        })
    }
}
