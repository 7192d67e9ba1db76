//! Listener capability
//!
//! The worker invokes the listener synchronously, once per message, in
//! arrival order. A slow listener therefore throttles the poll rate;
//! callers who want dispatch off the polling task can use
//! [`ChannelListener`] to hand messages to a bounded channel instead.

use tokio::sync::mpsc;
use tracing::warn;

use crate::types::FeedMessage;

/// Callback invoked once per received datafeed message
///
/// `Send` suffices: the worker owns its listener, so listeners with
/// non-`Sync` interior state (`Cell`, `RefCell`) are fine.
pub trait DatafeedListener: Send {
    fn on_message(&self, message: FeedMessage);
}

/// Bounded hand-off to a consumer task
///
/// Preserves per-batch order. If the receiver lags until the channel is
/// full, further messages are dropped with a warning rather than
/// blocking the polling task.
pub struct ChannelListener {
    tx: mpsc::Sender<FeedMessage>,
}

impl ChannelListener {
    /// Create a listener and the receiving end of its channel
    pub fn bounded(capacity: usize) -> (Self, mpsc::Receiver<FeedMessage>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

impl DatafeedListener for ChannelListener {
    fn on_message(&self, message: FeedMessage) {
        if let Err(e) = self.tx.try_send(message) {
            match e {
                mpsc::error::TrySendError::Full(m) => {
                    warn!("Listener channel full, dropping message {}", m.id);
                }
                mpsc::error::TrySendError::Closed(m) => {
                    warn!("Listener channel closed, dropping message {}", m.id);
                }
            }
        }
    }
}
