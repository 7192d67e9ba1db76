//! Datafeed polling worker
//!
//! A single task drives a two-state machine:
//!
//! ```text
//! NoFeed  --create ok-->  HasFeed
//! NoFeed  --create err--> NoFeed   (fixed delay, then retry)
//! HasFeed --read ok-->    HasFeed  (dispatch batch to listener, in order)
//! HasFeed --read err-->   NoFeed   (immediate, no delay)
//! ```
//!
//! Feed errors never propagate out of [`FeedWorker::run`]; the contract
//! is to keep polling until shutdown is requested or the message limit
//! is reached. Delivery is at-least-once: messages may repeat across
//! feed re-creations and there is no deduplication.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::rest::DatafeedClient;
use crate::types::{Datafeed, FeedStats};
use crate::DEFAULT_CREATE_RETRY_SECS;

use super::listener::DatafeedListener;

/// Feed handle lifecycle: either absent or valid, nothing in between
#[derive(Clone, Debug)]
pub enum FeedState {
    NoFeed,
    HasFeed(Datafeed),
}

/// Worker tuning knobs
#[derive(Clone, Debug)]
pub struct FeedWorkerConfig {
    /// Fixed wait between feed creation attempts after a failure.
    /// Constant (no backoff growth, no jitter).
    pub create_retry_delay: Duration,
}

impl Default for FeedWorkerConfig {
    fn default() -> Self {
        Self { create_retry_delay: Duration::from_secs(DEFAULT_CREATE_RETRY_SECS) }
    }
}

/// Long-running feed polling worker
pub struct FeedWorker<L: DatafeedListener> {
    client: DatafeedClient,
    listener: L,
    config: FeedWorkerConfig,
}

impl<L: DatafeedListener> FeedWorker<L> {
    pub fn new(client: DatafeedClient, listener: L) -> Self {
        Self::with_config(client, listener, FeedWorkerConfig::default())
    }

    pub fn with_config(client: DatafeedClient, listener: L, config: FeedWorkerConfig) -> Self {
        Self { client, listener, config }
    }

    /// Poll until `shutdown` is set or `limit` messages have been
    /// dispatched (0 = no limit). Never returns an error.
    pub async fn run(&mut self, limit: u64, shutdown: Arc<AtomicBool>) -> FeedStats {
        let mut stats = FeedStats::new();
        let mut state = FeedState::NoFeed;

        info!("Starting datafeed worker");

        while !shutdown.load(Ordering::Relaxed) {
            let feed = match &state {
                FeedState::NoFeed => {
                    info!("Creating datafeed with pod...");
                    match self.client.create_datafeed().await {
                        Ok(feed) => {
                            stats.record_feed_created();
                            state = FeedState::HasFeed(feed);
                        }
                        Err(e) => {
                            error!("Failed to create datafeed, check connection: {}", e);
                            stats.record_create_failure();
                            tokio::time::sleep(self.config.create_retry_delay).await;
                        }
                    }
                    continue;
                }
                FeedState::HasFeed(feed) => feed.clone(),
            };

            match self.client.read_datafeed(&feed).await {
                Ok(messages) => {
                    if messages.is_empty() {
                        stats.record_empty_read();
                    } else {
                        stats.record_batch_received();
                        debug!("Received {} messages", messages.len());
                    }
                    for message in messages {
                        self.listener.on_message(message);
                        // Counted per invocation so the tally matches what
                        // the listener saw even when the limit cuts a batch
                        stats.record_dispatched();
                        if limit > 0 && stats.messages_dispatched >= limit {
                            info!("Reached message limit: {}", limit);
                            return stats;
                        }
                    }
                }
                Err(e) => {
                    // Any read failure invalidates the handle wholesale;
                    // the next iteration re-creates with no delay
                    warn!("Failed to read datafeed {}, resetting: {}", feed.id, e);
                    stats.record_read_failure();
                    state = FeedState::NoFeed;
                }
            }
        }

        info!(
            "Datafeed worker stopped. Dispatched: {}, creations: {}, read failures: {}",
            stats.messages_dispatched, stats.feeds_created, stats.read_failures
        );

        stats
    }
}
