//! Infer a layout tree from flat window geometry.
//!
//! A *through-line* is a boundary on one axis that does not cut through
//! the interior of any window. Through-lines partition the windows into
//! groups; each group becomes one child of a split and is inferred
//! recursively. Side-by-side is tried before stacked at every level.

use tracing::warn;

use crate::tree::{BufferRef, LayoutNode, LeafNode, Orientation, SplitNode};

use super::{WindowId, WindowRect};

/// Windows that could not be expressed as nested splits.
///
/// Only `kept` made it into the tree; the rest were dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DegenerateLayout {
    pub kept: WindowId,
    pub dropped: Vec<WindowId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InferredLayout {
    pub root: LayoutNode,
    /// Window behind each leaf, in leaf traversal order.
    pub windows: Vec<WindowId>,
    pub degenerate: Vec<DegenerateLayout>,
}

impl InferredLayout {
    pub fn is_degenerate(&self) -> bool {
        !self.degenerate.is_empty()
    }
}

/// Infer the layout tree for one viewport.
///
/// Rects are ordered top-left first before grouping so both peers pick
/// the same window when an arrangement has to be approximated.
pub fn infer_layout(rects: &[WindowRect]) -> InferredLayout {
    let mut ordered: Vec<&WindowRect> = rects.iter().collect();
    ordered.sort_by_key(|r| (r.row, r.column, r.id));

    let mut windows = Vec::with_capacity(ordered.len());
    let mut degenerate = Vec::new();
    let mut root = infer_group(&ordered, &mut windows, &mut degenerate);
    root.set_size(None);

    InferredLayout {
        root,
        windows,
        degenerate,
    }
}

/// Tree-only form of [`infer_layout`].
pub fn infer(rects: &[WindowRect]) -> LayoutNode {
    infer_layout(rects).root
}

fn infer_group(
    rects: &[&WindowRect],
    windows: &mut Vec<WindowId>,
    degenerate: &mut Vec<DegenerateLayout>,
) -> LayoutNode {
    match rects {
        [] => LayoutNode::default(),
        [only] => {
            windows.push(only.id);
            leaf_from_rect(only)
        }
        _ => {
            for orientation in [Orientation::SideBySide, Orientation::Stacked] {
                if let Some(groups) = partition(rects, orientation) {
                    let total: u64 = groups.iter().map(|g| u64::from(g.extent)).sum();
                    let children = groups
                        .iter()
                        .map(|group| {
                            let mut child = infer_group(&group.rects, windows, degenerate);
                            let share = if total == 0 {
                                1.0 / groups.len() as f64
                            } else {
                                f64::from(group.extent) / total as f64
                            };
                            child.set_size(Some(share));
                            child
                        })
                        .collect();
                    return LayoutNode::Split(SplitNode {
                        orientation,
                        children,
                        size: None,
                    });
                }
            }

            let kept = rects[0];
            let dropped: Vec<WindowId> = rects[1..].iter().map(|r| r.id).collect();
            warn!(
                kept = %kept.id,
                dropped = dropped.len(),
                "window arrangement has no through-line; approximating with a single pane"
            );
            degenerate.push(DegenerateLayout {
                kept: kept.id,
                dropped,
            });
            windows.push(kept.id);
            leaf_from_rect(kept)
        }
    }
}

struct Group<'a> {
    rects: Vec<&'a WindowRect>,
    extent: u32,
}

/// Split `rects` along the placement axis of `orientation`, or `None`
/// if fewer than two non-empty groups result.
fn partition<'a>(rects: &[&'a WindowRect], orientation: Orientation) -> Option<Vec<Group<'a>>> {
    let groups = through_line_groups(rects, orientation);
    (groups.len() >= 2).then_some(groups)
}

/// Every non-empty group between consecutive through-lines, in order.
fn through_line_groups<'a>(rects: &[&'a WindowRect], orientation: Orientation) -> Vec<Group<'a>> {
    let axis = orientation.axis();

    let mut candidates: Vec<u32> = rects.iter().map(|r| r.end(axis)).collect();
    candidates.sort_unstable();
    candidates.dedup();

    let through_lines: Vec<u32> = candidates
        .into_iter()
        .filter(|&b| !rects.iter().any(|r| r.start(axis) < b && b < r.end(axis)))
        .collect();

    let mut buckets: Vec<Vec<&'a WindowRect>> = vec![Vec::new(); through_lines.len() + 1];
    for rect in rects {
        let index = through_lines
            .iter()
            .take_while(|&&b| b <= rect.start(axis))
            .count();
        buckets[index].push(*rect);
    }

    buckets
        .into_iter()
        .filter(|bucket| !bucket.is_empty())
        .map(|rects| {
            let start = rects.iter().map(|r| r.start(axis)).min().unwrap_or(0);
            let end = rects.iter().map(|r| r.end(axis)).max().unwrap_or(start);
            Group {
                rects,
                extent: end - start,
            }
        })
        .collect()
}

/// Match window geometry against the shape of `target`.
///
/// Succeeds when the rects can be grouped split by split exactly as
/// `target` is nested: every split's children separated by through-lines
/// on its own axis, every leaf covering one window. Returns the window
/// for each leaf in traversal order. Unlike [`infer_layout`] this never
/// has to pick an orientation, so ambiguous grids match either reading.
pub fn match_shape(target: &LayoutNode, rects: &[WindowRect]) -> Option<Vec<WindowId>> {
    let ordered: Vec<&WindowRect> = rects.iter().collect();
    let mut windows = Vec::with_capacity(rects.len());
    fit(target, &ordered, &mut windows).then_some(windows)
}

fn fit(node: &LayoutNode, rects: &[&WindowRect], windows: &mut Vec<WindowId>) -> bool {
    match node {
        LayoutNode::Leaf(_) => match rects {
            [only] => {
                windows.push(only.id);
                true
            }
            _ => false,
        },
        LayoutNode::Split(split) => {
            let groups = through_line_groups(rects, split.orientation);
            fit_children(&split.children, &groups, windows)
        }
    }
}

/// Assign consecutive runs of groups to children, backtracking when a
/// run does not fit. Several fine-grained groups may belong to one child
/// when its own sub-splits happen to line up.
fn fit_children(children: &[LayoutNode], groups: &[Group<'_>], windows: &mut Vec<WindowId>) -> bool {
    let Some((first, rest)) = children.split_first() else {
        return groups.is_empty();
    };
    if groups.len() < children.len() {
        return false;
    }
    for take in 1..=groups.len() - rest.len() {
        let mark = windows.len();
        let run: Vec<&WindowRect> = groups[..take]
            .iter()
            .flat_map(|g| g.rects.iter().copied())
            .collect();
        if fit(first, &run, windows) && fit_children(rest, &groups[take..], windows) {
            return true;
        }
        windows.truncate(mark);
    }
    false
}

fn leaf_from_rect(rect: &WindowRect) -> LayoutNode {
    let buffers = rect
        .buffer_path
        .as_ref()
        .map(|path| vec![BufferRef::active(path.clone(), rect.view_state)])
        .unwrap_or_default();
    LayoutNode::Leaf(LeafNode {
        buffers,
        size: None,
        focused: rect.is_focused,
    })
}
