//! Symphony Messaging Platform Adapter
//!
//! Client SDK for running a bot against a Symphony pod:
//! - `rest`: certificate auth against the pod / key manager, datafeed REST calls
//! - `feed`: long-running datafeed polling worker with reset-and-retry recovery
//! - `client`: one-call wiring from a [`SymphonyConfig`] to a connected client
//!
//! # Official Documentation
//! - Session auth: https://developers.symphony.com/restapi/reference/session-authenticate
//! - Key manager auth: https://developers.symphony.com/restapi/reference/key-manager-authenticate
//! - Create datafeed: https://developers.symphony.com/restapi/reference/create-messagesevents-stream-v4
//! - Read datafeed: https://developers.symphony.com/restapi/reference/read-messagesevents-stream-v4

pub mod client;
pub mod config;
pub mod error;
pub mod feed;
pub mod rest;
pub mod types;

pub use client::SymphonyClient;
pub use config::SymphonyConfig;
pub use error::{Result, SymphonyError};
pub use types::*;

/// Session authentication path, relative to the session-auth base URL
pub const SESSION_AUTH_PATH: &str = "/sessionauth/v1/authenticate";

/// Key manager authentication path, relative to the key-auth base URL
pub const KEY_AUTH_PATH: &str = "/keyauth/v1/authenticate";

/// Datafeed creation path, relative to the agent base URL
pub const DATAFEED_CREATE_PATH: &str = "/agent/v4/datafeed/create";

/// Datafeed read path for a given feed id, relative to the agent base URL
pub fn datafeed_read_path(feed_id: &str) -> String {
    format!("/agent/v4/datafeed/{}/read", feed_id)
}

/// Fixed delay between datafeed creation attempts after a failure.
/// Feed creation is a low-frequency control operation; the delay is
/// deliberately constant, with no backoff growth and no jitter.
pub const DEFAULT_CREATE_RETRY_SECS: u64 = 5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datafeed_read_path() {
        assert_eq!(datafeed_read_path("abc123"), "/agent/v4/datafeed/abc123/read");
    }
}
