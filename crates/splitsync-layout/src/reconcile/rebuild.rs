//! Full rebuild: collapse to one window, then split top-down.

use tracing::warn;

use crate::geometry::WindowId;
use crate::host::HostAdapter;
use crate::tree::LayoutNode;

use super::ReconcileReport;

/// Close every window but the first and recreate `target`'s splits.
///
/// Returns the window for each leaf in traversal order.
pub(super) fn rebuild<H: HostAdapter + ?Sized>(
    target: &LayoutNode,
    host: &mut H,
    report: &mut ReconcileReport,
) -> Vec<Option<WindowId>> {
    let windows = host.list_windows();
    let Some((&keep, rest)) = windows.split_first() else {
        warn!("host reported no windows; nothing to rebuild into");
        return vec![None; target.leaf_count()];
    };

    for &window in rest {
        match host.close_window(window) {
            Ok(()) => report.closed += 1,
            Err(err) => warn!(%window, error = %err, "failed to close window during rebuild"),
        }
    }

    let mut slots = Vec::with_capacity(target.leaf_count());
    build(target, Some(keep), host, report, &mut slots);
    slots
}

/// Create all of a split's siblings before descending into any of them.
///
/// Splitting a window that already sits inside a nested split would put
/// the new sibling in the nested split instead of this one.
fn build<H: HostAdapter + ?Sized>(
    node: &LayoutNode,
    window: Option<WindowId>,
    host: &mut H,
    report: &mut ReconcileReport,
    slots: &mut Vec<Option<WindowId>>,
) {
    let split = match node {
        LayoutNode::Leaf(_) => {
            slots.push(window);
            return;
        }
        LayoutNode::Split(split) => split,
    };

    let mut windows: Vec<Option<WindowId>> = Vec::with_capacity(split.children.len());
    windows.push(window);
    for _ in 1..split.children.len() {
        let anchor = windows.iter().rev().find_map(|w| *w);
        let created = match anchor {
            Some(anchor) => match host.create_split(anchor, split.orientation) {
                Ok(new) => {
                    report.created += 1;
                    Some(new)
                }
                Err(err) => {
                    warn!(window = %anchor, error = %err, "failed to create split");
                    report.split_failures += 1;
                    None
                }
            },
            None => None,
        };
        windows.push(created);
    }

    for (child, window) in split.children.iter().zip(windows) {
        build(child, window, host, report, slots);
    }
}
