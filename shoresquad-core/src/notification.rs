//! Short-lived messages shown to the user after an action.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Visual weight of a notification.
pub enum NotificationLevel {
    /// Neutral information.
    Info,
    /// An action completed.
    Success,
    /// Something degraded or needs attention.
    Warning,
    /// An action was rejected.
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A message that disappears on its own.
pub struct Notification {
    /// Text to show.
    pub message: String,
    /// Styling hint.
    pub level: NotificationLevel,
    /// When the message stops being shown.
    pub expires_at: Instant,
}

/// Queue of timed messages; the newest live one is displayed.
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    ttl: Duration,
    queue: VecDeque<Notification>,
}

impl NotificationCenter {
    /// Messages stay visible for `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            queue: VecDeque::new(),
        }
    }

    /// Show `message` starting at `now`.
    pub fn push<M: Into<String>>(&mut self, level: NotificationLevel, message: M, now: Instant) {
        self.queue.push_back(Notification {
            message: message.into(),
            level,
            expires_at: now + self.ttl,
        });
    }

    /// Drop expired messages.
    pub fn prune(&mut self, now: Instant) {
        self.queue.retain(|notification| notification.expires_at > now);
    }

    /// Newest message still visible at `now`.
    #[must_use]
    pub fn current(&self, now: Instant) -> Option<&Notification> {
        self.queue
            .iter()
            .rev()
            .find(|notification| notification.expires_at > now)
    }

    /// Remove everything immediately.
    pub fn dismiss_all(&mut self) {
        self.queue.clear();
    }
}
