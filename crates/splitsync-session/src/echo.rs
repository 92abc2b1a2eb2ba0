use std::time::{Duration, Instant};

/// Drops outbound syncs for a short cool-down after an inbound apply, so
/// the local changes made by reconciliation are not sent straight back.
///
/// Time is passed in explicitly; the guard never reads the clock.
#[derive(Debug, Clone)]
pub struct EchoGuard {
    cooldown: Duration,
    until: Option<Instant>,
}

impl EchoGuard {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            until: None,
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Start (or restart) the cool-down at `now`.
    pub fn arm(&mut self, now: Instant) {
        self.until = Some(now + self.cooldown);
    }

    pub fn is_suppressed(&self, now: Instant) -> bool {
        self.until.is_some_and(|until| now < until)
    }
}

impl Default for EchoGuard {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}
