//! Depth-first traversal of the layout tree.
//!
//! Leaves are always visited in the same order: children of a split in
//! sequence, recursively. For side-by-side splits that is left to right,
//! for stacked splits top to bottom.

use super::{BufferRef, LayoutNode, LeafNode};

impl LayoutNode {
    pub fn leaf_count(&self) -> usize {
        match self {
            LayoutNode::Leaf(_) => 1,
            LayoutNode::Split(split) => split.children.iter().map(LayoutNode::leaf_count).sum(),
        }
    }

    /// Collect all leaves in traversal order.
    pub fn leaves(&self) -> Vec<&LeafNode> {
        let mut out = Vec::new();
        self.collect_leaves_into(&mut out);
        out
    }

    fn collect_leaves_into<'a>(&'a self, out: &mut Vec<&'a LeafNode>) {
        match self {
            LayoutNode::Leaf(leaf) => out.push(leaf),
            LayoutNode::Split(split) => {
                for child in &split.children {
                    child.collect_leaves_into(out);
                }
            }
        }
    }

    pub fn for_each_leaf_mut(&mut self, f: &mut impl FnMut(&mut LeafNode)) {
        match self {
            LayoutNode::Leaf(leaf) => f(leaf),
            LayoutNode::Split(split) => {
                for child in &mut split.children {
                    child.for_each_leaf_mut(f);
                }
            }
        }
    }

    /// Every buffer reference in the tree, flattened across leaves.
    pub fn buffer_refs(&self) -> Vec<&BufferRef> {
        self.leaves()
            .into_iter()
            .flat_map(|leaf| leaf.buffers.iter())
            .collect()
    }

    /// Index (in traversal order) of the leaf holding the focused pane.
    pub fn focused_leaf(&self) -> Option<usize> {
        self.leaves().iter().position(|leaf| leaf.focused)
    }
}
