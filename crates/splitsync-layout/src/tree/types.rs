//! Core types for the layout tree: orientation, buffers, leaves and splits.

use serde::{Deserialize, Serialize};

/// How a split arranges its children.
///
/// `SideBySide` lays children out left to right along the column axis;
/// `Stacked` lays them out top to bottom along the row axis. Both peers
/// use this mapping, so a tree never changes orientation in transit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Orientation {
    SideBySide,
    Stacked,
}

impl Orientation {
    /// The axis along which children are placed.
    pub fn axis(self) -> Axis {
        match self {
            Orientation::SideBySide => Axis::Columns,
            Orientation::Stacked => Axis::Rows,
        }
    }
}

/// A coordinate axis in cell units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Axis {
    Columns,
    Rows,
}

impl Axis {
    pub fn cross(self) -> Axis {
        match self {
            Axis::Columns => Axis::Rows,
            Axis::Rows => Axis::Columns,
        }
    }
}

/// Cursor and scroll position of a buffer, all zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub cursor_line: u32,
    pub cursor_char: u32,
    pub scroll_top_line: u32,
    pub scroll_bottom_line: u32,
}

/// One file attached to a pane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferRef {
    pub path: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_state: Option<ViewState>,
}

impl BufferRef {
    /// The buffer shown in its pane.
    pub fn active(path: impl Into<String>, view_state: Option<ViewState>) -> Self {
        Self {
            path: path.into(),
            active: true,
            view_state,
        }
    }

    /// A buffer open in the pane but not shown. Carries no view state.
    pub fn background(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            active: false,
            view_state: None,
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeafNode {
    #[serde(default)]
    pub buffers: Vec<BufferRef>,
    #[serde(default)]
    pub size: Option<f64>,
    /// Set on the one leaf holding the globally focused pane.
    #[serde(default, skip_serializing_if = "is_false")]
    pub focused: bool,
}

impl LeafNode {
    pub fn active_buffer(&self) -> Option<&BufferRef> {
        self.buffers.iter().find(|b| b.active)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitNode {
    pub orientation: Orientation,
    pub children: Vec<LayoutNode>,
    #[serde(default)]
    pub size: Option<f64>,
}

/// A node of the layout tree. Splits own their children outright.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LayoutNode {
    Leaf(LeafNode),
    Split(SplitNode),
}

impl Default for LayoutNode {
    fn default() -> Self {
        LayoutNode::Leaf(LeafNode::default())
    }
}

impl LayoutNode {
    pub fn leaf(buffers: Vec<BufferRef>) -> Self {
        LayoutNode::Leaf(LeafNode {
            buffers,
            size: None,
            focused: false,
        })
    }

    /// A leaf showing `path` as its only, active buffer.
    pub fn leaf_showing(path: impl Into<String>) -> Self {
        Self::leaf(vec![BufferRef::active(path, None)])
    }

    /// Build a split with equal child sizes.
    ///
    /// A single child is returned as-is and no children yields an empty
    /// leaf, so the result never violates the two-children minimum.
    pub fn split(orientation: Orientation, mut children: Vec<LayoutNode>) -> Self {
        match children.len() {
            0 => LayoutNode::default(),
            1 => {
                let mut only = children.remove(0);
                only.set_size(None);
                only
            }
            n => {
                let share = 1.0 / n as f64;
                for child in &mut children {
                    child.set_size(Some(share));
                }
                LayoutNode::Split(SplitNode {
                    orientation,
                    children,
                    size: None,
                })
            }
        }
    }

    pub fn side_by_side(children: Vec<LayoutNode>) -> Self {
        Self::split(Orientation::SideBySide, children)
    }

    pub fn stacked(children: Vec<LayoutNode>) -> Self {
        Self::split(Orientation::Stacked, children)
    }

    /// Replace the child sizes of a split. Ignored on leaves or when the
    /// number of sizes does not match the number of children.
    pub fn with_sizes(mut self, sizes: &[f64]) -> Self {
        if let LayoutNode::Split(split) = &mut self {
            if split.children.len() == sizes.len() {
                for (child, size) in split.children.iter_mut().zip(sizes) {
                    child.set_size(Some(*size));
                }
            }
        }
        self
    }

    /// Mark this node (a leaf) as holding the focused pane.
    pub fn focused(mut self) -> Self {
        if let LayoutNode::Leaf(leaf) = &mut self {
            leaf.focused = true;
        }
        self
    }

    pub fn size(&self) -> Option<f64> {
        match self {
            LayoutNode::Leaf(leaf) => leaf.size,
            LayoutNode::Split(split) => split.size,
        }
    }

    pub fn set_size(&mut self, size: Option<f64>) {
        match self {
            LayoutNode::Leaf(leaf) => leaf.size = size,
            LayoutNode::Split(split) => split.size = size,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, LayoutNode::Leaf(_))
    }
}
