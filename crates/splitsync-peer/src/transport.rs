//! Local socket setup for both roles.

use std::path::Path;
use std::time::Duration;

use splitsync_common::ChannelError;
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Bind the listening socket, replacing a stale socket file and
/// restricting access to the current user.
pub fn bind(path: &Path) -> Result<UnixListener, ChannelError> {
    let bind_error = |e: std::io::Error| ChannelError::Bind {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(bind_error)?;
    }
    if path.exists() {
        debug!(path = %path.display(), "removing stale socket");
        std::fs::remove_file(path).map_err(bind_error)?;
    }

    let listener = UnixListener::bind(path).map_err(bind_error)?;
    restrict_permissions(path);
    info!(path = %path.display(), "listening");
    Ok(listener)
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Err(e) = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)) {
        warn!(path = %path.display(), error = %e, "could not restrict socket permissions");
    }
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) {}

/// Connect to `path`, retrying every `backoff` until it succeeds or
/// `shutdown` fires (in which case `None` is returned).
pub async fn connect_with_backoff(
    path: &Path,
    backoff: Duration,
    shutdown: &mut watch::Receiver<bool>,
) -> Option<UnixStream> {
    loop {
        if *shutdown.borrow() {
            return None;
        }
        match UnixStream::connect(path).await {
            Ok(stream) => {
                info!(path = %path.display(), "connected");
                return Some(stream);
            }
            Err(e) => {
                let err = ChannelError::Connect {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                };
                debug!(error = %err, retry_in_ms = backoff.as_millis() as u64, "connect failed");
            }
        }
        tokio::select! {
            _ = tokio::time::sleep(backoff) => {}
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    return None;
                }
            }
        }
    }
}
