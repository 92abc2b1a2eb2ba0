//! One synchronization session per peer connection.
//!
//! The session owns all mutable sync state (partial-frame buffer, echo
//! guard, last sent snapshot) and performs no I/O itself: the caller feeds
//! it bytes read from the socket and writes out the bytes it returns.

pub mod change;
pub mod codec;
pub mod echo;
pub mod ignore;
pub mod message;
mod session;

pub use change::{ChangeDetector, ChangeReason};
pub use codec::{FrameCodec, FRAME_DELIMITER};
pub use echo::EchoGuard;
pub use ignore::IgnoreList;
pub use message::{Message, Payload};
pub use session::{ReceiveSummary, SessionOptions, SyncSession};
