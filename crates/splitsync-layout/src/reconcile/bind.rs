//! Attach each leaf's buffers to its window.

use tracing::{debug, warn};

use crate::geometry::WindowId;
use crate::host::HostAdapter;
use crate::tree::{BufferRef, LayoutNode, LeafNode};

use super::{BufferFailure, ReconcileReport};

pub(super) fn bind_leaves<H: HostAdapter + ?Sized>(
    target: &LayoutNode,
    slots: &[Option<WindowId>],
    host: &mut H,
    report: &mut ReconcileReport,
) {
    for (leaf, slot) in target.leaves().into_iter().zip(slots) {
        if let Some(window) = *slot {
            bind_leaf(leaf, window, host, report);
        }
    }
}

/// Background entries first, the active one last, so the window ends up
/// showing the active buffer without passing focus around.
fn bind_leaf<H: HostAdapter + ?Sized>(
    leaf: &LeafNode,
    window: WindowId,
    host: &mut H,
    report: &mut ReconcileReport,
) {
    let active = leaf.active_buffer();
    let background = leaf
        .buffers
        .iter()
        .filter(|b| !active.is_some_and(|a| std::ptr::eq(*b, a)));

    for buffer in background.chain(active) {
        if let Err(failure) = bind_buffer(buffer, window, host) {
            warn!(
                %window,
                path = %failure.path,
                error = %failure.error,
                "skipping buffer"
            );
            report.buffer_failures.push(failure);
        }
    }
}

fn bind_buffer<H: HostAdapter + ?Sized>(
    buffer: &BufferRef,
    window: WindowId,
    host: &mut H,
) -> Result<(), BufferFailure> {
    let fail = |error| BufferFailure {
        window,
        path: buffer.path.clone(),
        error,
    };

    let handle = host.open_buffer(&buffer.path).map_err(fail)?;
    host.set_buffer(window, handle).map_err(fail)?;
    if let Some(view) = buffer.view_state {
        host.set_cursor_and_scroll(window, view).map_err(fail)?;
    }
    debug!(%window, path = %buffer.path, active = buffer.active, "bound buffer");
    Ok(())
}
