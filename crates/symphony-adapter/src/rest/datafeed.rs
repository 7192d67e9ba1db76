//! Datafeed REST client
//!
//! Drives the agent's v4 datafeed endpoints. Reads long-poll server-side:
//! a request may block until the agent has messages or its poll window
//! expires, in which case it answers 204 with no body.
//!
//! # Source
//! - Create: https://developers.symphony.com/restapi/reference/create-messagesevents-stream-v4
//! - Read: https://developers.symphony.com/restapi/reference/read-messagesevents-stream-v4

use reqwest::Client;
use tracing::{debug, info};

use crate::error::{Result, SymphonyError};
use crate::types::{Datafeed, FeedMessage, SymAuth};
use crate::{datafeed_read_path, DATAFEED_CREATE_PATH};

/// Header carrying the pod session token
const SESSION_TOKEN_HEADER: &str = "sessionToken";
/// Header carrying the key manager token
const KEY_MANAGER_TOKEN_HEADER: &str = "keyManagerToken";

/// REST client for the agent datafeed API
#[derive(Clone)]
pub struct DatafeedClient {
    http: Client,
    agent_url: String,
    auth: SymAuth,
}

impl DatafeedClient {
    /// Create a datafeed client over an authenticated transport
    pub fn new(http: Client, agent_url: &str, auth: SymAuth) -> Self {
        Self { http, agent_url: agent_url.trim_end_matches('/').to_string(), auth }
    }

    /// Request creation of a new server-side feed resource
    ///
    /// Endpoint: POST /agent/v4/datafeed/create
    pub async fn create_datafeed(&self) -> Result<Datafeed> {
        let url = format!("{}{}", self.agent_url, DATAFEED_CREATE_PATH);
        debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .header(SESSION_TOKEN_HEADER, &self.auth.session_token)
            .header(KEY_MANAGER_TOKEN_HEADER, &self.auth.key_manager_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SymphonyError::Feed { status: status.as_u16(), body });
        }

        let feed: Datafeed = response.json().await?;
        info!("Created datafeed {}", feed.id);
        Ok(feed)
    }

    /// Read the next batch of messages from a feed
    ///
    /// Endpoint: GET /agent/v4/datafeed/{id}/read
    /// An empty batch is a normal outcome (204, or a null/empty body) and
    /// returns an empty vec.
    pub async fn read_datafeed(&self, feed: &Datafeed) -> Result<Vec<FeedMessage>> {
        let url = format!("{}{}", self.agent_url, datafeed_read_path(&feed.id));
        debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .header(SESSION_TOKEN_HEADER, &self.auth.session_token)
            .header(KEY_MANAGER_TOKEN_HEADER, &self.auth.key_manager_token)
            .send()
            .await?;

        let status = response.status();

        // 204 = poll window expired with nothing to deliver
        if status == reqwest::StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SymphonyError::Feed { status: status.as_u16(), body });
        }

        let messages: Option<Vec<FeedMessage>> = response.json().await?;
        Ok(messages.unwrap_or_default())
    }
}
