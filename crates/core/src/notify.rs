use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

/// Severity of a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

/// A fire-and-forget user-facing message. The core decides *when* one is
/// emitted (alert triggered, item added, fetch failed); rendering and
/// delivery belong to whoever implements the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Info,
            message: message.into(),
        }
    }
}

/// One-way channel for user-facing messages. Must never block or fail the
/// operation that emitted the message.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Discards every notification. Useful for headless use and tests that
/// don't assert on messages.
#[derive(Debug, Default)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&self, _notification: Notification) {}
}

/// Forwards notifications into a tokio channel for a UI task to drain.
/// A closed receiver drops messages silently — emitting is fire-and-forget.
pub struct ChannelSink {
    sender: UnboundedSender<Notification>,
}

impl ChannelSink {
    #[must_use]
    pub fn new(sender: UnboundedSender<Notification>) -> Self {
        Self { sender }
    }
}

impl NotificationSink for ChannelSink {
    fn notify(&self, notification: Notification) {
        if self.sender.send(notification).is_err() {
            debug!("notification receiver closed; message dropped");
        }
    }
}
