//! Wire types for the Symphony REST APIs
//!
//! # Design Principles
//! 1. Numeric-looking wire fields (ids, timestamps) stay String to avoid
//!    precision loss on 64-bit ids
//! 2. Known types with unrecognized fields use `#[serde(flatten)] extra`
//!    to preserve data across agent versions
//! 3. Field names match the official documentation exactly
//!
//! # Sources
//! - Message v4: https://developers.symphony.com/restapi/reference/message-format
//! - Datafeed v4: https://developers.symphony.com/restapi/reference/create-messagesevents-stream-v4

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

// ============================================================================
// Authentication
// ============================================================================

/// Response body of the session-auth and key-auth endpoints
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Token name ("sessionToken" or "keyManagerToken")
    pub name: String,
    /// Opaque token value
    pub token: String,
}

/// Session/key token pair produced by a successful handshake
///
/// Both tokens are bearer secrets and are redacted from Debug output.
#[derive(Clone, Serialize, Deserialize)]
pub struct SymAuth {
    /// Pod session token, sent as the `sessionToken` header
    pub session_token: String,
    /// Key manager token, sent as the `keyManagerToken` header
    pub key_manager_token: String,
}

impl std::fmt::Debug for SymAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymAuth")
            .field("session_token", &"[REDACTED]")
            .field("key_manager_token", &"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Datafeed
// ============================================================================

/// Opaque handle to a server-side datafeed subscription resource
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Datafeed {
    /// Feed id assigned by the agent
    pub id: String,
}

/// One message pulled from a datafeed read
///
/// Only the fields the SDK itself needs are typed; everything else the
/// agent sends is preserved in `extra`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedMessage {
    /// Message id
    pub id: String,

    /// Epoch-millis timestamp, as the string the agent sends
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// Message type discriminator (e.g. "V2Message")
    #[serde(rename = "v2messageType", default, skip_serializing_if = "Option::is_none")]
    pub message_type: Option<String>,

    /// Conversation stream the message arrived on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_id: Option<String>,

    /// MessageML / presentation body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Sending user id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_user_id: Option<String>,

    /// Fields this SDK does not interpret
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl FeedMessage {
    /// Timestamp decoded from the agent's epoch-millis string, if
    /// present and well-formed
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        let millis: i64 = self.timestamp.as_deref()?.parse().ok()?;
        Utc.timestamp_millis_opt(millis).single()
    }
}

// ============================================================================
// Worker statistics
// ============================================================================

/// Counters maintained by the feed polling worker
#[derive(Clone, Debug, Default)]
pub struct FeedStats {
    /// Messages handed to the listener
    pub messages_dispatched: u64,
    /// Reads that returned at least one message
    pub batches_received: u64,
    /// Reads that returned no messages (valid, long-poll expiry)
    pub empty_reads: u64,
    /// Successful feed creations
    pub feeds_created: u64,
    /// Failed feed creation attempts
    pub create_failures: u64,
    /// Failed reads (each forces a feed re-creation)
    pub read_failures: u64,
}

impl FeedStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one message handed to the listener
    pub fn record_dispatched(&mut self) {
        self.messages_dispatched += 1;
    }

    /// Record a read that returned at least one message
    pub fn record_batch_received(&mut self) {
        self.batches_received += 1;
    }

    /// Record a read that returned nothing
    pub fn record_empty_read(&mut self) {
        self.empty_reads += 1;
    }

    pub fn record_feed_created(&mut self) {
        self.feeds_created += 1;
    }

    pub fn record_create_failure(&mut self) {
        self.create_failures += 1;
    }

    pub fn record_read_failure(&mut self) {
        self.read_failures += 1;
    }
}
