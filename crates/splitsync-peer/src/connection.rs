//! One live peer connection: socket bytes in, host events out.

use std::sync::Arc;
use std::time::Instant;

use splitsync_common::{ChannelError, EventBus, HostEvent};
use splitsync_config::InitialSync;
use splitsync_layout::MemoryHost;
use splitsync_session::{SessionOptions, SyncSession};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{broadcast, watch, Mutex};
use tracing::{debug, info, warn};

const READ_BUFFER: usize = 64 * 1024;

/// Shared state every connection works against.
#[derive(Clone)]
pub struct PeerContext {
    pub host: Arc<Mutex<MemoryHost>>,
    pub events: EventBus,
    pub options: SessionOptions,
    pub initial_sync: InitialSync,
    pub shutdown: watch::Receiver<bool>,
}

/// Run a sync session over `stream` until the peer disconnects, the
/// channel fails or shutdown is requested.
pub async fn run_connection<S>(stream: S, ctx: PeerContext, is_listener: bool) -> Result<(), ChannelError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (mut reader, mut writer) = tokio::io::split(stream);
    let mut session = SyncSession::new(ctx.options.clone());
    let mut events = ctx.events.subscribe();
    let mut shutdown = ctx.shutdown.clone();
    info!(session = session.id().short(), "peer session started");

    if ctx.initial_sync.sends_from(is_listener) {
        let bytes = {
            let mut host = ctx.host.lock().await;
            session.local_sync(&mut *host, Instant::now())
        };
        if let Some(bytes) = bytes {
            writer.write_all(&bytes).await?;
            debug!("sent initial layout");
        }
    }

    let mut buf = vec![0u8; READ_BUFFER];
    loop {
        tokio::select! {
            read = reader.read(&mut buf) => {
                let n = read?;
                if n == 0 {
                    session.finish();
                    info!(session = session.id().short(), "peer disconnected");
                    return Ok(());
                }
                let summary = {
                    let mut host = ctx.host.lock().await;
                    session.receive_with_clock(&buf[..n], &mut *host, Instant::now)
                };
                if summary.applied > 0 || !summary.frame_errors.is_empty() {
                    debug!(
                        applied = summary.applied,
                        echoes = summary.echoes,
                        frame_errors = summary.frame_errors.len(),
                        "processed inbound bytes"
                    );
                }
            }
            event = events.recv() => {
                let event = match event {
                    Ok(HostEvent::Shutdown) | Err(broadcast::error::RecvError::Closed) => return Ok(()),
                    Ok(event) => event,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "event receiver lagged; syncing current layout");
                        HostEvent::LayoutChanged
                    }
                };
                let bytes = {
                    let mut host = ctx.host.lock().await;
                    session.handle_event(&event, &mut *host, Instant::now())
                };
                if let Some(bytes) = bytes {
                    writer.write_all(&bytes).await?;
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    return Ok(());
                }
            }
        }
    }
}
