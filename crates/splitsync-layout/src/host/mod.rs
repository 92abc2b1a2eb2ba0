//! The seam between the sync engine and a concrete editor.
//!
//! The engine never calls editor APIs directly. Everything it reads or
//! mutates goes through [`HostAdapter`], so a test can substitute the
//! in-memory [`MemoryHost`].

use serde::{Deserialize, Serialize};
use splitsync_common::{HostError, Notification};

use crate::geometry::{Extent, WindowId, WindowRect};
use crate::tree::{Axis, Orientation, ViewState};

pub mod memory;

pub use memory::{HostOp, MemoryHost};

pub type Result<T> = std::result::Result<T, HostError>;

/// Opaque handle to an open buffer, issued by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BufferHandle(pub u64);

/// Editor operations used by geometry inference and the reconciler.
///
/// Each call is one blocking step from the engine's point of view: an
/// implementation may wait on I/O internally, but must have completed or
/// failed by the time it returns.
pub trait HostAdapter {
    /// Size of the viewport that holds all windows.
    fn viewport(&self) -> Extent;

    /// Window ids in layout order.
    fn list_windows(&self) -> Vec<WindowId>;

    fn list_window_rects(&self) -> Vec<WindowRect>;

    /// Paths of every open buffer, in the order they were opened.
    fn list_open_paths(&self) -> Vec<String>;

    /// Open `path`, or return the existing handle if it is already open.
    fn open_buffer(&mut self, path: &str) -> Result<BufferHandle>;

    /// Show `buffer` in `window` without moving global focus.
    fn set_buffer(&mut self, window: WindowId, buffer: BufferHandle) -> Result<()>;

    /// Apply cursor and scroll position to the buffer shown in `window`.
    fn set_cursor_and_scroll(&mut self, window: WindowId, view: ViewState) -> Result<()>;

    /// Split `window`; the new window lands after it (right or below).
    fn create_split(&mut self, window: WindowId, orientation: Orientation) -> Result<WindowId>;

    fn close_window(&mut self, window: WindowId) -> Result<()>;

    /// Set the length of `window`'s region along `axis`, in cells.
    fn resize_window(&mut self, window: WindowId, axis: Axis, cells: u32) -> Result<()>;

    fn focus_window(&mut self, window: WindowId) -> Result<()>;

    /// Surface a message to the user. Hosts without a UI may ignore it.
    fn notify(&mut self, _notification: Notification) {}
}
