//! Progress reporting sink.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;

/// Receives human-readable progress lines from a running session.
///
/// Purely an output port: implementations must return quickly and must
/// never fail the session. Delivery problems are swallowed, not raised.
pub trait ProgressSink: Send + Sync {
    fn report(&self, session_id: &str, message: &str);
}

/// Discards every event.
pub struct NoOpProgressSink;

impl ProgressSink for NoOpProgressSink {
    fn report(&self, _session_id: &str, _message: &str) {}
}

/// Forwards events to the tracing log at info level.
pub struct TracingProgressSink;

impl ProgressSink for TracingProgressSink {
    fn report(&self, session_id: &str, message: &str) {
        info!(session_id = %session_id, "{}", message);
    }
}

/// One progress line, as delivered through [`ChannelProgressSink`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgressEvent {
    pub session_id: String,
    pub message: String,
}

/// Forwards events into an unbounded channel, e.g. for streaming to a
/// client. A send failure means the receiver is gone and is ignored.
pub struct ChannelProgressSink {
    sender: mpsc::UnboundedSender<ProgressEvent>,
}

impl ChannelProgressSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl ProgressSink for ChannelProgressSink {
    fn report(&self, session_id: &str, message: &str) {
        let _ = self.sender.send(ProgressEvent {
            session_id: session_id.to_string(),
            message: message.to_string(),
        });
    }
}
