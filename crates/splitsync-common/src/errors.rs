use std::path::PathBuf;

/// A single inbound frame could not be turned into a message.
///
/// Always contained to the offending frame: the connection stays open.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameParseError {
    #[error("frame is not valid UTF-8")]
    InvalidUtf8,

    #[error("frame is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("unknown message kind: {0}")]
    UnknownKind(String),

    #[error("invalid {kind} payload: {reason}")]
    InvalidPayload { kind: String, reason: String },

    #[error("frame of {len} bytes exceeds the {max} byte limit")]
    TooLarge { len: usize, max: usize },

    #[error("stream ended inside a frame ({0} bytes unterminated)")]
    Truncated(usize),
}

/// Connection-level failures. These change connection state.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("failed to bind {path}: {reason}")]
    Bind { path: PathBuf, reason: String },

    #[error("failed to connect to {path}: {reason}")]
    Connect { path: PathBuf, reason: String },

    #[error("channel closed by peer")]
    Closed,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failures reported by a host adapter for a single operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("cannot open buffer {path}: {reason}")]
    BufferOpen { path: String, reason: String },

    #[error("unknown window {0}")]
    UnknownWindow(u64),

    #[error("cannot close the last window")]
    LastWindow,

    #[error("not supported: {0}")]
    Unsupported(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Frame(#[from] FrameParseError),

    #[error(transparent)]
    Channel(#[from] ChannelError),

    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_error_display() {
        let err = FrameParseError::InvalidJson("EOF while parsing".into());
        assert_eq!(err.to_string(), "frame is not valid JSON: EOF while parsing");

        let err = FrameParseError::UnknownKind("CursorMoved".into());
        assert_eq!(err.to_string(), "unknown message kind: CursorMoved");

        let err = FrameParseError::TooLarge { len: 2048, max: 1024 };
        assert_eq!(
            err.to_string(),
            "frame of 2048 bytes exceeds the 1024 byte limit"
        );
    }

    #[test]
    fn host_error_display() {
        let err = HostError::BufferOpen {
            path: "/tmp/gone.rs".into(),
            reason: "no such file".into(),
        };
        assert_eq!(err.to_string(), "cannot open buffer /tmp/gone.rs: no such file");

        assert_eq!(HostError::UnknownWindow(7).to_string(), "unknown window 7");
        assert_eq!(
            HostError::LastWindow.to_string(),
            "cannot close the last window"
        );
    }

    #[test]
    fn channel_error_display() {
        let err = ChannelError::Bind {
            path: PathBuf::from("/tmp/splitsync.sock"),
            reason: "address in use".into(),
        };
        assert_eq!(
            err.to_string(),
            "failed to bind /tmp/splitsync.sock: address in use"
        );
        assert_eq!(ChannelError::Closed.to_string(), "channel closed by peer");
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ValidationError("sync.echo_cooldown_ms".into());
        assert_eq!(
            err.to_string(),
            "config validation error: sync.echo_cooldown_ms"
        );
    }

    #[test]
    fn sync_error_from_frame() {
        let err: SyncError = FrameParseError::InvalidUtf8.into();
        assert!(matches!(err, SyncError::Frame(_)));
        assert_eq!(err.to_string(), "frame is not valid UTF-8");
    }

    #[test]
    fn sync_error_from_host() {
        let err: SyncError = HostError::LastWindow.into();
        assert!(matches!(err, SyncError::Host(_)));
    }

    #[test]
    fn sync_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: SyncError = io_err.into();
        assert!(matches!(err, SyncError::Io(_)));
        assert!(err.to_string().contains("pipe closed"));
    }

    #[test]
    fn channel_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let err: ChannelError = io_err.into();
        assert!(matches!(err, ChannelError::Io(_)));
        let err: SyncError = err.into();
        assert!(matches!(err, SyncError::Channel(_)));
    }
}
