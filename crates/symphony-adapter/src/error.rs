//! Error taxonomy for the adapter
//!
//! Setup-time failures (transport, auth, config) are fatal and surface to
//! the caller as `Err`. `Feed` errors are recoverable: the polling worker
//! logs them and resets its feed handle instead of propagating.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SymphonyError>;

#[derive(Debug, Error)]
pub enum SymphonyError {
    /// Transport-level failure talking to any Symphony endpoint
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The session-auth or key-auth endpoint rejected the handshake
    #[error("authentication rejected: HTTP {status}: {body}")]
    Auth { status: u16, body: String },

    /// The agent rejected a datafeed create or read
    #[error("datafeed error: HTTP {status}: {body}")]
    Feed { status: u16, body: String },

    /// Client keystore / trust store could not be loaded, or the TLS
    /// client could not be built from it
    #[error("transport setup failed: {0}")]
    Transport(String),

    /// Missing or invalid configuration value
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SymphonyError {
    /// True for failures the polling worker recovers from by resetting
    /// its feed handle (anything that happens on the feed path).
    pub fn is_feed_recoverable(&self) -> bool {
        matches!(self, SymphonyError::Feed { .. } | SymphonyError::Network(_))
    }
}
