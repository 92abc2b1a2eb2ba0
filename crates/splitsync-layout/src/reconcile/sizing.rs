//! Best-effort size application.
//!
//! Each child's share is converted to cells with `floor`; the last child
//! of a split is never resized and absorbs whatever is left.

use tracing::debug;

use crate::geometry::{Extent, WindowId};
use crate::host::HostAdapter;
use crate::tree::{Axis, LayoutNode};

pub(super) fn apply_sizes<H: HostAdapter + ?Sized>(
    target: &LayoutNode,
    slots: &[Option<WindowId>],
    host: &mut H,
) {
    let viewport = host.viewport();
    apply(target, viewport, 0, slots, host);
}

fn apply<H: HostAdapter + ?Sized>(
    node: &LayoutNode,
    extent: Extent,
    first_leaf: usize,
    slots: &[Option<WindowId>],
    host: &mut H,
) {
    let LayoutNode::Split(split) = node else {
        return;
    };
    let axis = split.orientation.axis();
    let total = extent.along(axis);
    let cells = to_cells(&split.effective_sizes(), total);

    let mut leaf_index = first_leaf;
    let last = split.children.len().saturating_sub(1);
    for (i, (child, len)) in split.children.iter().zip(cells).enumerate() {
        if i < last {
            match anchor(child, axis, leaf_index, slots) {
                Some(window) => {
                    if let Err(err) = host.resize_window(window, axis, len) {
                        debug!(%window, error = %err, "resize rejected");
                    }
                }
                None => debug!(child = i, "no window to resize along {axis:?}"),
            }
        }
        apply(child, extent.with_len(axis, len), leaf_index, slots, host);
        leaf_index += child.leaf_count();
    }
}

/// Floor each share to whole cells; the last entry takes the remainder.
pub(crate) fn to_cells(shares: &[f64], total: u32) -> Vec<u32> {
    let mut out = Vec::with_capacity(shares.len());
    let mut used = 0u32;
    for (i, share) in shares.iter().enumerate() {
        let len = if i + 1 == shares.len() {
            total.saturating_sub(used)
        } else {
            ((share * f64::from(total)) + 1e-6).floor() as u32
        };
        let len = len.min(total.saturating_sub(used));
        used += len;
        out.push(len);
    }
    out
}

/// A window whose innermost split along `axis` is the one holding `node`.
///
/// Hosts resize the nearest enclosing split on the requested axis, so the
/// path down to the chosen leaf must not cross another split on `axis`.
fn anchor(
    node: &LayoutNode,
    axis: Axis,
    first_leaf: usize,
    slots: &[Option<WindowId>],
) -> Option<WindowId> {
    match node {
        LayoutNode::Leaf(_) => slots.get(first_leaf).copied().flatten(),
        LayoutNode::Split(split) if split.orientation.axis() == axis => None,
        LayoutNode::Split(split) => {
            let mut index = first_leaf;
            for child in &split.children {
                if let Some(window) = anchor(child, axis, index, slots) {
                    return Some(window);
                }
                index += child.leaf_count();
            }
            None
        }
    }
}
