//! Structural comparison and normalization of layout trees.

use super::{LayoutNode, SplitNode};

/// Default tolerance applied to `size` fractions when comparing trees.
pub const SIZE_TOLERANCE: f64 = 0.01;

impl SplitNode {
    /// Child sizes with missing entries filled in, scaled to sum to 1.
    pub fn effective_sizes(&self) -> Vec<f64> {
        let n = self.children.len();
        if n == 0 {
            return Vec::new();
        }
        let known: f64 = self.children.iter().filter_map(LayoutNode::size).sum();
        let missing = self.children.iter().filter(|c| c.size().is_none()).count();
        let fill = if missing == 0 {
            0.0
        } else {
            ((1.0 - known).max(0.0) / missing as f64).max(f64::EPSILON)
        };
        let raw: Vec<f64> = self
            .children
            .iter()
            .map(|c| c.size().unwrap_or(fill).max(0.0))
            .collect();
        let total: f64 = raw.iter().sum();
        if total <= 0.0 {
            return vec![1.0 / n as f64; n];
        }
        raw.into_iter().map(|s| s / total).collect()
    }
}

impl LayoutNode {
    /// Same split shape: orientations and child counts agree at every
    /// position. Buffers and sizes are ignored.
    pub fn same_shape(&self, other: &LayoutNode) -> bool {
        match (self, other) {
            (LayoutNode::Leaf(_), LayoutNode::Leaf(_)) => true,
            (LayoutNode::Split(a), LayoutNode::Split(b)) => {
                a.orientation == b.orientation
                    && a.children.len() == b.children.len()
                    && a
                        .children
                        .iter()
                        .zip(&b.children)
                        .all(|(x, y)| x.same_shape(y))
            }
            _ => false,
        }
    }

    /// Structural equality: same shape, child sizes within `tolerance`,
    /// and identical buffers (path, active flag, view state) and focus
    /// on every leaf. The root's own size is ignored.
    pub fn same_layout(&self, other: &LayoutNode, tolerance: f64) -> bool {
        match (self, other) {
            (LayoutNode::Leaf(a), LayoutNode::Leaf(b)) => {
                a.buffers == b.buffers && a.focused == b.focused
            }
            (LayoutNode::Split(a), LayoutNode::Split(b)) => {
                if a.orientation != b.orientation || a.children.len() != b.children.len() {
                    return false;
                }
                let sizes_match = a
                    .effective_sizes()
                    .iter()
                    .zip(b.effective_sizes())
                    .all(|(x, y)| (x - y).abs() <= tolerance);
                sizes_match
                    && a
                        .children
                        .iter()
                        .zip(&b.children)
                        .all(|(x, y)| x.same_layout(y, tolerance))
            }
            _ => false,
        }
    }

    /// Canonical form of the tree.
    ///
    /// Splits with a single child collapse into that child, empty splits
    /// become empty leaves, a child split with its parent's orientation is
    /// merged into the parent (its sizes scaled by its own share), and
    /// every split's child sizes are rescaled to sum to 1.
    pub fn normalized(&self) -> LayoutNode {
        let mut node = self.normalize_inner();
        node.set_size(None);
        node
    }

    fn normalize_inner(&self) -> LayoutNode {
        let split = match self {
            LayoutNode::Leaf(leaf) => return LayoutNode::Leaf(leaf.clone()),
            LayoutNode::Split(split) => split,
        };

        let sizes = split.effective_sizes();
        let mut children = Vec::with_capacity(split.children.len());
        for (child, share) in split.children.iter().zip(sizes) {
            let mut child = child.normalize_inner();
            match child {
                LayoutNode::Split(inner) if inner.orientation == split.orientation => {
                    let inner_sizes = inner.effective_sizes();
                    for (mut grandchild, inner_share) in inner.children.into_iter().zip(inner_sizes)
                    {
                        grandchild.set_size(Some(share * inner_share));
                        children.push(grandchild);
                    }
                }
                _ => {
                    child.set_size(Some(share));
                    children.push(child);
                }
            }
        }

        match children.len() {
            0 => LayoutNode::Leaf(Default::default()),
            1 => {
                let mut only = children.remove(0);
                only.set_size(split.size);
                only
            }
            _ => LayoutNode::Split(SplitNode {
                orientation: split.orientation,
                children,
                size: split.size,
            }),
        }
    }
}
