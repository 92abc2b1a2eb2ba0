//! Drive a host's windows toward a target layout tree.
//!
//! If the host's geometry already has the target's shape the existing
//! windows are reused in traversal order (patch). Otherwise every window
//! but one is closed and the tree is rebuilt with splits. Either way each
//! leaf's buffers are bound, sizes are applied and focus is restored last.
//! Failures on individual buffers or splits are logged and skipped.

mod bind;
mod rebuild;
mod sizing;
mod types;

pub use types::*;

use tracing::{debug, info};

use crate::geometry::match_shape;
use crate::host::HostAdapter;
use crate::tree::LayoutNode;

pub fn reconcile<H: HostAdapter + ?Sized>(target: &LayoutNode, host: &mut H) -> ReconcileReport {
    let target = target.normalized();
    let mut report = ReconcileReport::default();

    let rects = host.list_window_rects();
    let matched = match_shape(&target, &rects)
        .filter(|windows| windows.len() == host.list_windows().len());

    let windows = match matched {
        Some(windows) => windows.into_iter().map(Some).collect(),
        None => {
            debug!(
                target_leaves = target.leaf_count(),
                host_windows = rects.len(),
                "layout shape differs; rebuilding"
            );
            report.mode = ReconcileMode::Rebuild;
            rebuild::rebuild(&target, host, &mut report)
        }
    };

    bind::bind_leaves(&target, &windows, host, &mut report);
    sizing::apply_sizes(&target, &windows, host);

    if let Some(window) = target
        .focused_leaf()
        .and_then(|i| windows.get(i).copied().flatten())
    {
        if let Err(err) = host.focus_window(window) {
            debug!(%window, error = %err, "could not restore focus");
        }
    }
    report.windows = windows;

    info!(
        mode = ?report.mode,
        created = report.created,
        closed = report.closed,
        split_failures = report.split_failures,
        buffer_failures = report.buffer_failures.len(),
        "reconciled layout"
    );
    report
}
