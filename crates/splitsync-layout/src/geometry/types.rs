//! Window geometry as reported by a host, in integer cell units.

use serde::{Deserialize, Serialize};

use crate::tree::{Axis, ViewState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowId(pub u64);

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "win-{}", self.0)
    }
}

/// Size of a viewport (or any region) in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

impl Extent {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn along(&self, axis: Axis) -> u32 {
        match axis {
            Axis::Columns => self.width,
            Axis::Rows => self.height,
        }
    }

    /// Copy of this extent with the length along `axis` replaced.
    pub fn with_len(&self, axis: Axis, len: u32) -> Self {
        match axis {
            Axis::Columns => Self::new(len, self.height),
            Axis::Rows => Self::new(self.width, len),
        }
    }
}

/// One visible window: where it is, what it shows, and whether it has focus.
///
/// Produced fresh for every sync and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowRect {
    pub id: WindowId,
    pub column: u32,
    pub row: u32,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub buffer_path: Option<String>,
    #[serde(default)]
    pub is_focused: bool,
    #[serde(default)]
    pub view_state: Option<ViewState>,
}

impl WindowRect {
    /// A rect showing nothing, for tests and fixtures.
    pub fn new(id: u64, column: u32, row: u32, width: u32, height: u32) -> Self {
        Self {
            id: WindowId(id),
            column,
            row,
            width,
            height,
            buffer_path: None,
            is_focused: false,
            view_state: None,
        }
    }

    pub fn showing(mut self, path: impl Into<String>) -> Self {
        self.buffer_path = Some(path.into());
        self
    }

    pub fn start(&self, axis: Axis) -> u32 {
        match axis {
            Axis::Columns => self.column,
            Axis::Rows => self.row,
        }
    }

    pub fn len(&self, axis: Axis) -> u32 {
        match axis {
            Axis::Columns => self.width,
            Axis::Rows => self.height,
        }
    }

    /// One past the far edge along `axis`.
    pub fn end(&self, axis: Axis) -> u32 {
        self.start(axis).saturating_add(self.len(axis))
    }
}
