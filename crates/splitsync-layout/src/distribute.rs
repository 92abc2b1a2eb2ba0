//! Attach the full set of open files to the leaves of an inferred tree.
//!
//! Inference only knows the one file each window shows. Distribution
//! spreads every open path over the leaves according to a pluggable
//! strategy, while each leaf keeps its active buffer and view state.

use crate::tree::{BufferRef, LayoutNode, LeafNode};

/// Assign `paths` to `leaf_count` leaves, one list per leaf in traversal order.
pub type DistributionFn<'a> = dyn Fn(&[String], usize) -> Vec<Vec<String>> + 'a;

/// Built-in distribution strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistributionPolicy {
    /// Path `i` goes to leaf `i % leaf_count`.
    #[default]
    RoundRobin,
    /// Every leaf receives every path.
    AllToEveryLeaf,
    /// Leaves keep only the file they already show.
    VisibleOnly,
}

impl DistributionPolicy {
    pub fn assign(self, paths: &[String], leaf_count: usize) -> Vec<Vec<String>> {
        match self {
            DistributionPolicy::RoundRobin => round_robin(paths, leaf_count),
            DistributionPolicy::AllToEveryLeaf => all_to_every_leaf(paths, leaf_count),
            DistributionPolicy::VisibleOnly => vec![Vec::new(); leaf_count],
        }
    }
}

pub fn round_robin(paths: &[String], leaf_count: usize) -> Vec<Vec<String>> {
    let mut out = vec![Vec::new(); leaf_count];
    if leaf_count == 0 {
        return out;
    }
    for (i, path) in paths.iter().enumerate() {
        out[i % leaf_count].push(path.clone());
    }
    out
}

pub fn all_to_every_leaf(paths: &[String], leaf_count: usize) -> Vec<Vec<String>> {
    vec![paths.to_vec(); leaf_count]
}

/// Distribute with one of the built-in policies.
pub fn distribute_with(
    tree: &LayoutNode,
    all_open: &[String],
    policy: DistributionPolicy,
) -> LayoutNode {
    distribute(tree, all_open, &|paths: &[String], n: usize| policy.assign(paths, n))
}

/// Return a copy of `tree` whose leaves carry the paths chosen by `strategy`.
///
/// Each leaf's active buffer survives with its view state even if the
/// strategy did not assign it there. All other entries are inactive and
/// carry no view state. The input tree is not modified.
pub fn distribute(
    tree: &LayoutNode,
    all_open: &[String],
    strategy: &DistributionFn<'_>,
) -> LayoutNode {
    let mut out = tree.clone();
    let leaf_count = out.leaf_count();
    let mut assigned = strategy(all_open, leaf_count).into_iter();

    out.for_each_leaf_mut(&mut |leaf| {
        let paths = assigned.next().unwrap_or_default();
        leaf.buffers = merge_leaf(leaf, paths);
    });
    out
}

fn merge_leaf(leaf: &LeafNode, paths: Vec<String>) -> Vec<BufferRef> {
    let active = leaf.active_buffer();
    let mut buffers: Vec<BufferRef> = Vec::with_capacity(paths.len() + 1);

    for path in paths {
        if buffers.iter().any(|b| b.path == path) {
            continue;
        }
        match active {
            Some(active) if active.path == path => buffers.push(active.clone()),
            _ => buffers.push(BufferRef::background(path)),
        }
    }

    if let Some(active) = active {
        if !buffers.iter().any(|b| b.path == active.path) {
            buffers.push(active.clone());
        }
    }
    buffers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::ViewState;

    fn paths(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn leaf_paths(tree: &LayoutNode) -> Vec<Vec<String>> {
        tree.leaves()
            .iter()
            .map(|leaf| leaf.buffers.iter().map(|b| b.path.clone()).collect())
            .collect()
    }

    fn two_panes() -> LayoutNode {
        let view = ViewState {
            cursor_line: 5,
            cursor_char: 2,
            scroll_top_line: 0,
            scroll_bottom_line: 30,
        };
        LayoutNode::side_by_side(vec![
            LayoutNode::leaf(vec![BufferRef::active("a.rs", Some(view))]),
            LayoutNode::leaf_showing("d.rs"),
        ])
    }

    #[test]
    fn round_robin_assignment() {
        let out = round_robin(&paths(&["1", "2", "3", "4", "5"]), 2);
        assert_eq!(out, vec![paths(&["1", "3", "5"]), paths(&["2", "4"])]);
    }

    #[test]
    fn round_robin_zero_leaves() {
        assert!(round_robin(&paths(&["1"]), 0).is_empty());
    }

    #[test]
    fn single_leaf_receives_everything() {
        let tree = LayoutNode::leaf_showing("b.rs");
        let all = paths(&["a.rs", "b.rs", "c.rs"]);
        let out = distribute_with(&tree, &all, DistributionPolicy::RoundRobin);
        assert_eq!(leaf_paths(&out), vec![all]);
        let active: Vec<_> = out.buffer_refs().iter().map(|b| b.active).collect();
        assert_eq!(active, vec![false, true, false]);
    }

    #[test]
    fn active_buffer_and_view_state_survive() {
        let tree = two_panes();
        let all = paths(&["a.rs", "b.rs", "c.rs", "d.rs"]);
        let out = distribute_with(&tree, &all, DistributionPolicy::RoundRobin);

        // Leaf 0 gets a, c; leaf 1 gets b, d.
        assert_eq!(
            leaf_paths(&out),
            vec![paths(&["a.rs", "c.rs"]), paths(&["b.rs", "d.rs"])]
        );
        let leaves = out.leaves();
        let a = leaves[0].active_buffer().unwrap();
        assert_eq!(a.path, "a.rs");
        assert_eq!(a.view_state.unwrap().cursor_line, 5);
        assert_eq!(leaves[1].active_buffer().unwrap().path, "d.rs");
    }

    #[test]
    fn non_active_entries_have_no_view_state() {
        let out = distribute_with(
            &two_panes(),
            &paths(&["a.rs", "b.rs", "c.rs"]),
            DistributionPolicy::AllToEveryLeaf,
        );
        for buffer in out.buffer_refs() {
            if !buffer.active {
                assert!(buffer.view_state.is_none());
            }
        }
    }

    #[test]
    fn active_path_not_assigned_is_appended() {
        let tree = two_panes();
        // d.rs would land on leaf 0 but leaf 1 shows it.
        let out = distribute_with(&tree, &paths(&["d.rs"]), DistributionPolicy::RoundRobin);
        assert_eq!(
            leaf_paths(&out),
            vec![paths(&["d.rs", "a.rs"]), paths(&["d.rs"])]
        );
        assert!(!out.leaves()[0].buffers[0].active);
    }

    #[test]
    fn visible_only_keeps_shown_file() {
        let out = distribute_with(
            &two_panes(),
            &paths(&["a.rs", "b.rs", "c.rs"]),
            DistributionPolicy::VisibleOnly,
        );
        assert_eq!(leaf_paths(&out), vec![paths(&["a.rs"]), paths(&["d.rs"])]);
    }

    #[test]
    fn strategy_can_borrow_caller_state() {
        let pinned = String::from("scratch.rs");
        let pin_everywhere = |_: &[String], n: usize| vec![vec![pinned.clone()]; n];
        let out = distribute(&two_panes(), &paths(&["x.rs"]), &pin_everywhere);
        assert_eq!(
            leaf_paths(&out),
            vec![paths(&["scratch.rs", "a.rs"]), paths(&["scratch.rs", "d.rs"])]
        );
    }

    #[test]
    fn custom_strategy_is_used() {
        let last_leaf_only = |paths: &[String], n: usize| {
            let mut out = vec![Vec::new(); n];
            if let Some(last) = out.last_mut() {
                *last = paths.to_vec();
            }
            out
        };
        let out = distribute(&two_panes(), &paths(&["x.rs"]), &last_leaf_only);
        assert_eq!(
            leaf_paths(&out),
            vec![paths(&["a.rs"]), paths(&["x.rs", "d.rs"])]
        );
    }

    #[test]
    fn input_tree_is_untouched() {
        let tree = two_panes();
        let before = tree.clone();
        let _ = distribute_with(&tree, &paths(&["z.rs"]), DistributionPolicy::AllToEveryLeaf);
        assert_eq!(tree, before);
    }

    #[test]
    fn duplicate_paths_collapse() {
        let tree = LayoutNode::default();
        let out = distribute_with(&tree, &paths(&["a.rs", "a.rs"]), DistributionPolicy::RoundRobin);
        assert_eq!(leaf_paths(&out), vec![paths(&["a.rs"])]);
    }
}
