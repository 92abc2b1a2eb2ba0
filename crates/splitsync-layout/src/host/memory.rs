//! In-memory host: a headless editor with real split geometry.
//!
//! Windows live in a split tree whose child lengths are integer weights,
//! scaled to the available cells at layout time (floor, remainder to the
//! last child). Every successful mutation is recorded as a [`HostOp`] so
//! tests can count what the reconciler did.

use std::collections::{HashMap, HashSet};

use splitsync_common::{HostError, Notification, NotificationQueue};
use tracing::debug;

use super::{BufferHandle, HostAdapter, Result};
use crate::geometry::{Extent, WindowId, WindowRect};
use crate::tree::{Axis, Orientation, ViewState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostOp {
    OpenBuffer(String),
    SetBuffer(WindowId, BufferHandle),
    SetView(WindowId, ViewState),
    CreateSplit(WindowId, Orientation),
    CloseWindow(WindowId),
    Resize(WindowId, Axis, u32),
    Focus(WindowId),
}

impl HostOp {
    /// Window creation or removal.
    pub fn is_structural(&self) -> bool {
        matches!(self, HostOp::CreateSplit(..) | HostOp::CloseWindow(_))
    }
}

/// Total a split's weights are rescaled to once one of them can no
/// longer be halved.
const WEIGHT_BASE: u64 = 1 << 20;

#[derive(Debug, Clone)]
enum Region {
    Window(WindowId),
    Split {
        orientation: Orientation,
        children: Vec<Region>,
        weights: Vec<u64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Area {
    column: u32,
    row: u32,
    width: u32,
    height: u32,
}

impl Area {
    fn len(&self, axis: Axis) -> u32 {
        match axis {
            Axis::Columns => self.width,
            Axis::Rows => self.height,
        }
    }

    fn slice(&self, axis: Axis, offset: u32, len: u32) -> Area {
        match axis {
            Axis::Columns => Area {
                column: self.column + offset,
                width: len,
                ..*self
            },
            Axis::Rows => Area {
                row: self.row + offset,
                height: len,
                ..*self
            },
        }
    }
}

#[derive(Debug, Default)]
struct WindowState {
    tabs: Vec<BufferHandle>,
    shown: Option<BufferHandle>,
    views: HashMap<BufferHandle, ViewState>,
}

#[derive(Debug)]
pub struct MemoryHost {
    viewport: Extent,
    root: Region,
    windows: HashMap<WindowId, WindowState>,
    buffers: Vec<(BufferHandle, String)>,
    unreadable: HashSet<String>,
    focused: WindowId,
    next_window: u64,
    next_buffer: u64,
    ops: Vec<HostOp>,
    notifications: NotificationQueue,
}

impl MemoryHost {
    /// A host with one empty window filling `viewport`.
    pub fn new(viewport: Extent) -> Self {
        let first = WindowId(1);
        let mut windows = HashMap::new();
        windows.insert(first, WindowState::default());
        Self {
            viewport,
            root: Region::Window(first),
            windows,
            buffers: Vec::new(),
            unreadable: HashSet::new(),
            focused: first,
            next_window: 2,
            next_buffer: 1,
            ops: Vec::new(),
            notifications: NotificationQueue::default(),
        }
    }

    /// Make `open_buffer` fail for `path`.
    pub fn mark_unreadable(&mut self, path: impl Into<String>) {
        self.unreadable.insert(path.into());
    }

    pub fn set_viewport(&mut self, viewport: Extent) {
        self.viewport = viewport;
    }

    pub fn ops(&self) -> &[HostOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<HostOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    pub fn focused_window(&self) -> WindowId {
        self.focused
    }

    /// Path of the buffer shown in `window`.
    pub fn shown_path(&self, window: WindowId) -> Option<&str> {
        let handle = self.windows.get(&window)?.shown?;
        self.path_of(handle)
    }

    /// Paths of every buffer attached to `window`, in attach order.
    pub fn tab_paths(&self, window: WindowId) -> Vec<&str> {
        self.windows
            .get(&window)
            .map(|state| {
                state
                    .tabs
                    .iter()
                    .filter_map(|h| self.path_of(*h))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Split the focused window and focus the new one.
    pub fn split_focused(&mut self, orientation: Orientation) -> Result<WindowId> {
        let new = self.create_split(self.focused, orientation)?;
        self.focus_window(new)?;
        Ok(new)
    }

    pub fn close_focused(&mut self) -> Result<()> {
        self.close_window(self.focused)
    }

    /// Focus the `n`th window in layout order (zero-based).
    pub fn focus_nth(&mut self, n: usize) -> Result<WindowId> {
        let window = self
            .list_windows()
            .get(n)
            .copied()
            .ok_or(HostError::UnknownWindow(n as u64))?;
        self.focus_window(window)?;
        Ok(window)
    }

    /// Open `path` and show it in the focused window.
    pub fn open_in_focused(&mut self, path: &str) -> Result<BufferHandle> {
        let handle = self.open_buffer(path)?;
        self.set_buffer(self.focused, handle)?;
        Ok(handle)
    }

    /// Move the cursor in the focused window, scrolling to keep it centred.
    pub fn move_cursor(&mut self, line: u32, character: u32) -> Result<()> {
        let height = self
            .layout()
            .into_iter()
            .find(|(id, _)| *id == self.focused)
            .map(|(_, area)| area.height)
            .unwrap_or(self.viewport.height);
        let top = line.saturating_sub(height / 2);
        let view = ViewState {
            cursor_line: line,
            cursor_char: character,
            scroll_top_line: top,
            scroll_bottom_line: top + height.saturating_sub(1),
        };
        self.set_cursor_and_scroll(self.focused, view)
    }

    /// One line per window, for logs and the interactive console.
    pub fn describe(&self) -> String {
        let mut lines = Vec::new();
        for rect in self.list_window_rects() {
            let marker = if rect.is_focused { "*" } else { " " };
            let tabs = self.tab_paths(rect.id).join(", ");
            lines.push(format!(
                "{marker} {} [{},{} {}x{}] {} (tabs: {tabs})",
                rect.id,
                rect.column,
                rect.row,
                rect.width,
                rect.height,
                rect.buffer_path.as_deref().unwrap_or("-"),
            ));
        }
        lines.join("\n")
    }

    fn path_of(&self, handle: BufferHandle) -> Option<&str> {
        self.buffers
            .iter()
            .find(|(h, _)| *h == handle)
            .map(|(_, path)| path.as_str())
    }

    fn full_area(&self) -> Area {
        Area {
            column: 0,
            row: 0,
            width: self.viewport.width,
            height: self.viewport.height,
        }
    }

    fn layout(&self) -> Vec<(WindowId, Area)> {
        let mut out = Vec::new();
        layout_region(&self.root, self.full_area(), &mut out);
        out
    }

    fn window_mut(&mut self, window: WindowId) -> Result<&mut WindowState> {
        self.windows
            .get_mut(&window)
            .ok_or(HostError::UnknownWindow(window.0))
    }
}

impl HostAdapter for MemoryHost {
    fn viewport(&self) -> Extent {
        self.viewport
    }

    fn list_windows(&self) -> Vec<WindowId> {
        self.layout().into_iter().map(|(id, _)| id).collect()
    }

    fn list_window_rects(&self) -> Vec<WindowRect> {
        self.layout()
            .into_iter()
            .map(|(id, area)| {
                let state = self.windows.get(&id);
                let shown = state.and_then(|s| s.shown);
                WindowRect {
                    id,
                    column: area.column,
                    row: area.row,
                    width: area.width,
                    height: area.height,
                    buffer_path: shown.and_then(|h| self.path_of(h)).map(str::to_owned),
                    is_focused: id == self.focused,
                    view_state: shown.and_then(|h| state.and_then(|s| s.views.get(&h).copied())),
                }
            })
            .collect()
    }

    fn list_open_paths(&self) -> Vec<String> {
        self.buffers.iter().map(|(_, path)| path.clone()).collect()
    }

    fn open_buffer(&mut self, path: &str) -> Result<BufferHandle> {
        if let Some((handle, _)) = self.buffers.iter().find(|(_, p)| p == path) {
            return Ok(*handle);
        }
        if self.unreadable.contains(path) {
            return Err(HostError::BufferOpen {
                path: path.to_owned(),
                reason: "file is not readable".into(),
            });
        }
        let handle = BufferHandle(self.next_buffer);
        self.next_buffer += 1;
        self.buffers.push((handle, path.to_owned()));
        self.ops.push(HostOp::OpenBuffer(path.to_owned()));
        Ok(handle)
    }

    fn set_buffer(&mut self, window: WindowId, buffer: BufferHandle) -> Result<()> {
        if self.path_of(buffer).is_none() {
            return Err(HostError::Unsupported(format!(
                "unknown buffer handle {}",
                buffer.0
            )));
        }
        let state = self.window_mut(window)?;
        if !state.tabs.contains(&buffer) {
            state.tabs.push(buffer);
        }
        state.shown = Some(buffer);
        self.ops.push(HostOp::SetBuffer(window, buffer));
        Ok(())
    }

    fn set_cursor_and_scroll(&mut self, window: WindowId, view: ViewState) -> Result<()> {
        let state = self.window_mut(window)?;
        let shown = state
            .shown
            .ok_or_else(|| HostError::Unsupported(format!("{window} shows no buffer")))?;
        state.views.insert(shown, view);
        self.ops.push(HostOp::SetView(window, view));
        Ok(())
    }

    fn create_split(&mut self, window: WindowId, orientation: Orientation) -> Result<WindowId> {
        if !self.windows.contains_key(&window) {
            return Err(HostError::UnknownWindow(window.0));
        }
        let new = WindowId(self.next_window);
        if !split_region(&mut self.root, window, new, orientation) {
            return Err(HostError::UnknownWindow(window.0));
        }
        self.next_window += 1;
        self.windows.insert(new, WindowState::default());
        self.ops.push(HostOp::CreateSplit(window, orientation));
        debug!(%window, %new, ?orientation, "split window");
        Ok(new)
    }

    fn close_window(&mut self, window: WindowId) -> Result<()> {
        if !self.windows.contains_key(&window) {
            return Err(HostError::UnknownWindow(window.0));
        }
        if self.windows.len() <= 1 {
            return Err(HostError::LastWindow);
        }
        remove_region(&mut self.root, window);
        let area = self.full_area();
        flatten_region(&mut self.root, area);
        self.windows.remove(&window);
        if self.focused == window {
            if let Some(first) = self.list_windows().first() {
                self.focused = *first;
            }
        }
        self.ops.push(HostOp::CloseWindow(window));
        debug!(%window, "closed window");
        Ok(())
    }

    fn resize_window(&mut self, window: WindowId, axis: Axis, cells: u32) -> Result<()> {
        if !self.windows.contains_key(&window) {
            return Err(HostError::UnknownWindow(window.0));
        }
        let area = self.full_area();
        resize_region(&mut self.root, area, window, axis, cells);
        self.ops.push(HostOp::Resize(window, axis, cells));
        Ok(())
    }

    fn focus_window(&mut self, window: WindowId) -> Result<()> {
        if !self.windows.contains_key(&window) {
            return Err(HostError::UnknownWindow(window.0));
        }
        self.focused = window;
        self.ops.push(HostOp::Focus(window));
        Ok(())
    }

    fn notify(&mut self, notification: Notification) {
        debug!(level = ?notification.level, message = %notification.message, "host notification");
        self.notifications.push(notification);
    }
}

/// Scale `weights` to `total` cells: floor for all but the last child,
/// which takes the remainder.
fn scale(weights: &[u64], total: u32) -> Vec<u32> {
    let n = weights.len();
    let sum = weights.iter().fold(0u128, |acc, w| acc + u128::from(*w));
    let mut out = Vec::with_capacity(n);
    let mut used = 0u32;
    for (i, weight) in weights.iter().enumerate() {
        let len = if i + 1 == n {
            total - used
        } else if sum == 0 {
            total / n as u32
        } else {
            (u128::from(total) * u128::from(*weight) / sum) as u32
        };
        let len = len.min(total - used);
        used += len;
        out.push(len);
    }
    out
}

fn layout_region(region: &Region, area: Area, out: &mut Vec<(WindowId, Area)>) {
    match region {
        Region::Window(id) => out.push((*id, area)),
        Region::Split {
            orientation,
            children,
            weights,
        } => {
            let axis = orientation.axis();
            let lens = scale(weights, area.len(axis));
            let mut offset = 0;
            for (child, len) in children.iter().zip(lens) {
                layout_region(child, area.slice(axis, offset, len), out);
                offset += len;
            }
        }
    }
}

fn is_window(region: &Region, target: WindowId) -> bool {
    matches!(region, Region::Window(id) if *id == target)
}

fn split_region(region: &mut Region, target: WindowId, new: WindowId, orientation: Orientation) -> bool {
    match region {
        Region::Window(id) if *id == target => {
            *region = Region::Split {
                orientation,
                children: vec![Region::Window(target), Region::Window(new)],
                weights: vec![1, 1],
            };
            true
        }
        Region::Window(_) => false,
        Region::Split {
            orientation: own,
            children,
            weights,
        } => {
            if *own == orientation {
                if let Some(i) = children.iter().position(|c| is_window(c, target)) {
                    if weights[i] < 2 {
                        rebase(weights);
                    }
                    let half = weights[i] / 2;
                    weights[i] -= half;
                    weights.insert(i + 1, half);
                    children.insert(i + 1, Region::Window(new));
                    return true;
                }
            }
            children
                .iter_mut()
                .any(|child| split_region(child, target, new, orientation))
        }
    }
}

/// Rescale `weights` to sum to about [`WEIGHT_BASE`], keeping every
/// weight at two or more so it can still be halved.
fn rebase(weights: &mut [u64]) {
    let sum = weights.iter().fold(0u128, |acc, w| acc + u128::from(*w));
    for w in weights.iter_mut() {
        let share = if sum == 0 {
            0
        } else {
            u128::from(*w) * u128::from(WEIGHT_BASE) / sum
        };
        *w = (share as u64).max(2);
    }
}

/// Remove a window; its space goes to the previous sibling (or the next
/// one for a first child) and a split left with one child collapses.
fn remove_region(region: &mut Region, target: WindowId) -> bool {
    let Region::Split {
        children, weights, ..
    } = region
    else {
        return false;
    };

    if let Some(i) = children.iter().position(|c| is_window(c, target)) {
        children.remove(i);
        let freed = weights.remove(i);
        if let Some(w) = weights.get_mut(i.saturating_sub(1)) {
            *w += freed;
        }
        if children.len() == 1 {
            if let Some(only) = children.pop() {
                *region = only;
            }
        }
        return true;
    }

    children
        .iter_mut()
        .any(|child| remove_region(child, target))
}

/// Merge child splits that share their parent's orientation. Weights of
/// the affected split are rewritten as cell lengths within `area`.
fn flatten_region(region: &mut Region, area: Area) {
    let Region::Split {
        orientation,
        children,
        weights,
    } = region
    else {
        return;
    };
    let orientation = *orientation;
    let axis = orientation.axis();
    let lens = scale(weights, area.len(axis));

    let mut offset = 0;
    for (child, len) in children.iter_mut().zip(&lens) {
        flatten_region(child, area.slice(axis, offset, *len));
        offset += len;
    }

    if !children
        .iter()
        .any(|c| matches!(c, Region::Split { orientation: o, .. } if *o == orientation))
    {
        return;
    }

    let mut merged_children = Vec::with_capacity(children.len());
    let mut merged_weights = Vec::with_capacity(children.len());
    for (child, len) in children.drain(..).zip(lens) {
        match child {
            Region::Split {
                orientation: inner_orientation,
                children: inner_children,
                weights: inner_weights,
            } if inner_orientation == orientation => {
                let inner_lens = scale(&inner_weights, len);
                merged_children.extend(inner_children);
                merged_weights.extend(inner_lens.into_iter().map(u64::from));
            }
            other => {
                merged_children.push(other);
                merged_weights.push(u64::from(len));
            }
        }
    }
    *children = merged_children;
    *weights = merged_weights;
}

/// Resize the innermost split along `axis` that contains `target`.
///
/// Returns `None` if `target` is not under `region`, `Some(false)` if it
/// is but no matching split was found yet, `Some(true)` once applied.
fn resize_region(
    region: &mut Region,
    area: Area,
    target: WindowId,
    axis: Axis,
    cells: u32,
) -> Option<bool> {
    match region {
        Region::Window(id) => (*id == target).then_some(false),
        Region::Split {
            orientation,
            children,
            weights,
        } => {
            let own_axis = orientation.axis();
            let lens = scale(weights, area.len(own_axis));
            let mut offset = 0;
            for (i, child) in children.iter_mut().enumerate() {
                let child_area = area.slice(own_axis, offset, lens[i]);
                offset += lens[i];
                match resize_region(child, child_area, target, axis, cells) {
                    Some(true) => return Some(true),
                    Some(false) if own_axis == axis => {
                        *weights = resized(&lens, i, cells)
                            .into_iter()
                            .map(u64::from)
                            .collect();
                        return Some(true);
                    }
                    Some(false) => return Some(false),
                    None => {}
                }
            }
            None
        }
    }
}

/// Set child `k` to `cells`, taking or giving space from the following
/// siblings (or the preceding ones for the last child). Every child keeps
/// at least one cell.
fn resized(lens: &[u32], k: usize, cells: u32) -> Vec<u32> {
    let mut out = lens.to_vec();
    let n = out.len();
    let total: u32 = lens.iter().sum();
    let ceiling = total.saturating_sub(n as u32 - 1).max(1);
    let target = cells.clamp(1, ceiling);
    let current = out[k];

    let donors: Vec<usize> = if k + 1 < n {
        (k + 1..n).collect()
    } else {
        (0..k).rev().collect()
    };

    if target > current {
        let mut need = target - current;
        for j in donors {
            let give = need.min(out[j].saturating_sub(1));
            out[j] -= give;
            need -= give;
            if need == 0 {
                break;
            }
        }
        out[k] = target - need;
    } else if let Some(&j) = donors.first() {
        out[j] += current - target;
        out[k] = target;
    }
    out
}
