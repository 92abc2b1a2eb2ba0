pub mod errors;
pub mod events;
pub mod id;
pub mod notifications;

pub use errors::{ChannelError, ConfigError, FrameParseError, HostError, SyncError};
pub use events::{EventBus, HostEvent};
pub use id::SessionId;
pub use notifications::{Notification, NotificationLevel, NotificationQueue};

pub type Result<T> = std::result::Result<T, SyncError>;
