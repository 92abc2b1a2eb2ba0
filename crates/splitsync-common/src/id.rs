use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of one synchronization session.
///
/// Stamped on outbound messages as their `origin` so a session can
/// recognise (and drop) its own traffic if the channel echoes it back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when `origin` names this session.
    pub fn is_origin_of(&self, origin: Option<&str>) -> bool {
        origin == Some(self.0.as_str())
    }

    /// First eight characters, for log lines.
    pub fn short(&self) -> &str {
        self.0.get(..8).unwrap_or(&self.0)
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
