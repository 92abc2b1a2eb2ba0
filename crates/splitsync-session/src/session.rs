use std::time::{Duration, Instant};

use bytes::{Bytes, BytesMut};
use splitsync_common::{FrameParseError, HostEvent, Notification, SessionId};
use splitsync_config::{DistributionMode, SyncConfig};
use splitsync_layout::{
    distribute_with, infer_layout, reconcile, DistributionPolicy, HostAdapter, LayoutNode,
    ReconcileReport, ViewState, WindowId, SIZE_TOLERANCE,
};
use tokio_util::codec::{Decoder, Encoder};
use tracing::{debug, info, warn};

use crate::change::ChangeDetector;
use crate::codec::{FrameCodec, DEFAULT_MAX_FRAME_BYTES};
use crate::echo::EchoGuard;
use crate::ignore::IgnoreList;
use crate::message::{Message, Payload};

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub echo_cooldown: Duration,
    pub distribution: DistributionPolicy,
    pub size_tolerance: f64,
    pub ignore: IgnoreList,
    pub max_frame_bytes: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            echo_cooldown: Duration::from_millis(100),
            distribution: DistributionPolicy::RoundRobin,
            size_tolerance: SIZE_TOLERANCE,
            ignore: IgnoreList::default(),
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
        }
    }
}

impl SessionOptions {
    pub fn from_config(config: &SyncConfig) -> Self {
        let distribution = match config.sync.distribution {
            DistributionMode::RoundRobin => DistributionPolicy::RoundRobin,
            DistributionMode::AllToEveryLeaf => DistributionPolicy::AllToEveryLeaf,
            DistributionMode::VisibleOnly => DistributionPolicy::VisibleOnly,
        };
        Self {
            echo_cooldown: Duration::from_millis(config.sync.echo_cooldown_ms),
            distribution,
            size_tolerance: config.sync.size_tolerance,
            ignore: IgnoreList::lenient(&config.sync.ignore_patterns),
            max_frame_bytes: config.connection.max_frame_bytes,
        }
    }
}

/// What one call to [`SyncSession::receive`] did.
#[derive(Debug, Default)]
pub struct ReceiveSummary {
    pub applied: usize,
    /// Messages this session sent itself, dropped unapplied.
    pub echoes: usize,
    pub frame_errors: Vec<FrameParseError>,
    pub reports: Vec<ReconcileReport>,
}

/// Sync state for one connection.
///
/// Inbound bytes are decoded, applied to the host and followed by an echo
/// cool-down. Outbound syncs capture the host's layout and are sent only
/// when it differs from the last layout sent or adopted.
#[derive(Debug)]
pub struct SyncSession {
    id: SessionId,
    codec: FrameCodec,
    inbound: BytesMut,
    guard: EchoGuard,
    detector: ChangeDetector,
    distribution: DistributionPolicy,
    ignore: IgnoreList,
    degenerate_reported: bool,
}

impl SyncSession {
    pub fn new(options: SessionOptions) -> Self {
        Self::with_id(SessionId::new(), options)
    }

    pub fn with_id(id: SessionId, options: SessionOptions) -> Self {
        Self {
            id,
            codec: FrameCodec::new(options.max_frame_bytes),
            inbound: BytesMut::new(),
            guard: EchoGuard::new(options.echo_cooldown),
            detector: ChangeDetector::new(options.ignore.clone(), options.size_tolerance),
            distribution: options.distribution,
            ignore: options.ignore,
            degenerate_reported: false,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Bytes of an incomplete frame still waiting for their delimiter.
    pub fn pending_bytes(&self) -> usize {
        self.inbound.len()
    }

    pub fn is_suppressed(&self, now: Instant) -> bool {
        self.guard.is_suppressed(now)
    }

    /// Decode and apply every complete frame in `bytes`, in order.
    ///
    /// Every applied message starts the echo cool-down at `now`. Use
    /// [`SyncSession::receive_with_clock`] when applying takes real time.
    pub fn receive<H: HostAdapter + ?Sized>(
        &mut self,
        bytes: &[u8],
        host: &mut H,
        now: Instant,
    ) -> ReceiveSummary {
        self.receive_with_clock(bytes, host, || now)
    }

    /// Like [`SyncSession::receive`], but reads `clock` once each message
    /// has been applied, so the cool-down starts when applying finished.
    pub fn receive_with_clock<H, C>(
        &mut self,
        bytes: &[u8],
        host: &mut H,
        mut clock: C,
    ) -> ReceiveSummary
    where
        H: HostAdapter + ?Sized,
        C: FnMut() -> Instant,
    {
        self.inbound.extend_from_slice(bytes);
        let mut summary = ReceiveSummary::default();
        loop {
            match self.codec.decode(&mut self.inbound) {
                Ok(Some(Ok(message))) => self.handle(message, host, &mut clock, &mut summary),
                Ok(Some(Err(err))) => {
                    warn!(error = %err, "dropping frame");
                    summary.frame_errors.push(err);
                }
                Ok(None) => break,
                Err(err) => {
                    warn!(error = %err, "frame decoder failed; discarding buffered input");
                    self.inbound.clear();
                    break;
                }
            }
        }
        summary
    }

    /// The stream ended: report an unterminated trailing frame, if any.
    pub fn finish(&mut self) -> Option<FrameParseError> {
        match self.codec.decode_eof(&mut self.inbound) {
            Ok(Some(Err(err))) => {
                warn!(error = %err, "connection closed mid-frame");
                Some(err)
            }
            _ => None,
        }
    }

    /// Capture the host's layout and encode it if it should be sent now.
    pub fn local_sync<H: HostAdapter + ?Sized>(&mut self, host: &mut H, now: Instant) -> Option<Bytes> {
        if self.guard.is_suppressed(now) {
            debug!("outbound sync suppressed during echo cool-down");
            return None;
        }
        let candidate = self.capture(host);
        let reason = self.detector.classify(&candidate)?;

        let message = Message::layout_sync(candidate.clone(), &self.id);
        let bytes = self.encode(&message)?;
        self.detector.record(candidate);
        debug!(?reason, bytes = bytes.len(), "sending layout");
        Some(bytes)
    }

    /// Outbound sync triggered by a host event.
    pub fn handle_event<H: HostAdapter + ?Sized>(
        &mut self,
        event: &HostEvent,
        host: &mut H,
        now: Instant,
    ) -> Option<Bytes> {
        if !event.triggers_sync() {
            return None;
        }
        self.local_sync(host, now)
    }

    fn encode(&mut self, message: &Message) -> Option<Bytes> {
        let mut buf = BytesMut::new();
        match self.codec.encode(message, &mut buf) {
            Ok(()) => Some(buf.freeze()),
            Err(err) => {
                warn!(kind = message.kind(), error = %err, "failed to encode message");
                None
            }
        }
    }

    fn handle<H, C>(
        &mut self,
        mut message: Message,
        host: &mut H,
        clock: &mut C,
        summary: &mut ReceiveSummary,
    ) where
        H: HostAdapter + ?Sized,
        C: FnMut() -> Instant,
    {
        message.originated_locally = self.id.is_origin_of(message.origin.as_deref());
        if message.originated_locally {
            debug!(kind = message.kind(), "dropping own message");
            summary.echoes += 1;
            return;
        }

        debug!(kind = message.kind(), origin = ?message.origin, "applying message");
        match message.payload {
            Payload::LayoutSync(tree) => {
                let report = reconcile(&self.ignore.filter_tree(&tree), host);
                if !report.is_clean() {
                    host.notify(Notification::warning(format!(
                        "layout applied with {} buffer and {} split failure(s)",
                        report.buffer_failures.len(),
                        report.split_failures
                    )));
                }
                summary.reports.push(report);
            }
            Payload::BufferChanged { path } => self.show_in_focused(&path, host),
            Payload::ViewChanged { path, view_state } => self.apply_view(&path, view_state, host),
        }
        summary.applied += 1;

        self.guard.arm(clock());
        let adopted = self.capture(host);
        self.detector.record(adopted);
    }

    fn show_in_focused<H: HostAdapter + ?Sized>(&mut self, path: &str, host: &mut H) {
        if self.ignore.is_ignored(path) {
            debug!(path, "ignoring buffer change for ignored path");
            return;
        }
        let Some(window) = focused_window(host) else {
            return;
        };
        let result = host
            .open_buffer(path)
            .and_then(|handle| host.set_buffer(window, handle));
        if let Err(err) = result {
            warn!(path, error = %err, "could not show buffer");
            host.notify(Notification::warning(err.to_string()));
        }
    }

    fn apply_view<H: HostAdapter + ?Sized>(&mut self, path: &str, view: ViewState, host: &mut H) {
        let windows: Vec<WindowId> = host
            .list_window_rects()
            .into_iter()
            .filter(|r| r.buffer_path.as_deref() == Some(path))
            .map(|r| r.id)
            .collect();
        if windows.is_empty() {
            debug!(path, "view change for a buffer that is not shown");
        }
        for window in windows {
            if let Err(err) = host.set_cursor_and_scroll(window, view) {
                warn!(%window, path, error = %err, "could not apply view");
            }
        }
    }

    /// The host's current layout as it would be sent.
    fn capture<H: HostAdapter + ?Sized>(&mut self, host: &mut H) -> LayoutNode {
        let inferred = infer_layout(&host.list_window_rects());
        if inferred.is_degenerate() {
            if !self.degenerate_reported {
                let dropped: usize = inferred.degenerate.iter().map(|d| d.dropped.len()).sum();
                info!(dropped, "window arrangement cannot be mirrored exactly");
                host.notify(Notification::warning(format!(
                    "window arrangement cannot be expressed as splits; {dropped} window(s) left out of sync"
                )));
                self.degenerate_reported = true;
            }
        } else {
            self.degenerate_reported = false;
        }

        let paths = self.ignore.filter_paths(&host.list_open_paths());
        let tree = self.ignore.filter_tree(&inferred.root);
        distribute_with(&tree, &paths, self.distribution)
    }
}

fn focused_window<H: HostAdapter + ?Sized>(host: &H) -> Option<WindowId> {
    let rects = host.list_window_rects();
    rects
        .iter()
        .find(|r| r.is_focused)
        .or_else(|| rects.first())
        .map(|r| r.id)
}
