//! Client wiring
//!
//! [`SymphonyClient::connect`] is the factory path: validate the config,
//! build the TLS transport, run the auth handshake, and hand back a
//! client whose accessors wire the per-capability REST clients.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use reqwest::Client;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::config::SymphonyConfig;
use crate::error::Result;
use crate::feed::{DatafeedListener, FeedWorker};
use crate::rest::{build_client, AuthClient, DatafeedClient};
use crate::types::{FeedStats, SymAuth};

/// Authenticated Symphony client
///
/// Debug output stays safe: `SymAuth` redacts its tokens.
#[derive(Debug)]
pub struct SymphonyClient {
    http: Client,
    auth: SymAuth,
    agent_url: String,
    pod_url: String,
}

impl SymphonyClient {
    /// Wire a client from configuration: transport, then handshake.
    ///
    /// Every setup failure is fatal and surfaces here; nothing is
    /// retried on this path.
    pub async fn connect(config: &SymphonyConfig) -> Result<Self> {
        config.validate()?;

        let http = build_client(config).map_err(|e| {
            error!("Failed to build HTTP transport: {}", e);
            e
        })?;

        let auth_client = AuthClient::new(http.clone(), &config.session_auth_url, &config.key_auth_url);
        let auth = auth_client.authenticate().await.map_err(|e| {
            error!("Authentication failed: {}", e);
            e
        })?;

        info!("Connected to pod {}", config.pod_url);

        Ok(Self::from_parts(http, auth, &config.agent_url, &config.pod_url))
    }

    /// Assemble a client from already-built pieces (custom transports,
    /// tests against mock servers).
    pub fn from_parts(http: Client, auth: SymAuth, agent_url: &str, pod_url: &str) -> Self {
        Self {
            http,
            auth,
            agent_url: agent_url.trim_end_matches('/').to_string(),
            pod_url: pod_url.trim_end_matches('/').to_string(),
        }
    }

    /// Datafeed client over this client's transport and tokens
    pub fn datafeed_client(&self) -> DatafeedClient {
        DatafeedClient::new(self.http.clone(), &self.agent_url, self.auth.clone())
    }

    pub fn auth(&self) -> &SymAuth {
        &self.auth
    }

    pub fn agent_url(&self) -> &str {
        &self.agent_url
    }

    pub fn pod_url(&self) -> &str {
        &self.pod_url
    }

    /// Spawn a feed worker dispatching to `listener`.
    ///
    /// Returns the worker task and the flag that requests its shutdown;
    /// the task resolves to the final [`FeedStats`] once it stops.
    pub fn start_feed<L>(&self, listener: L) -> (JoinHandle<FeedStats>, Arc<AtomicBool>)
    where
        L: DatafeedListener + 'static,
    {
        let mut worker = FeedWorker::new(self.datafeed_client(), listener);
        let shutdown = Arc::new(AtomicBool::new(false));
        let flag = shutdown.clone();
        let handle = tokio::spawn(async move { worker.run(0, flag).await });
        (handle, shutdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;
    use std::sync::Mutex;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> SymphonyClient {
        let auth = SymAuth { session_token: "st".to_string(), key_manager_token: "kmt".to_string() };
        SymphonyClient::from_parts(Client::new(), auth, &server.uri(), &server.uri())
    }

    #[test]
    fn test_from_parts_trims_urls() {
        let auth = SymAuth { session_token: "s".to_string(), key_manager_token: "k".to_string() };
        let client = SymphonyClient::from_parts(
            Client::new(),
            auth,
            "https://agent.example.com/",
            "https://pod.example.com/",
        );
        assert_eq!(client.agent_url(), "https://agent.example.com");
        assert_eq!(client.pod_url(), "https://pod.example.com");
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_config() {
        let config = SymphonyConfig {
            session_auth_url: "https://pod.example.com:8444".to_string(),
            key_auth_url: "https://km.example.com:8444".to_string(),
            user_cert_file: "bot.p12".to_string(),
            user_cert_password: "changeit".to_string(),
            truststore_file: None,
            truststore_password: None,
            agent_url: String::new(),
            pod_url: "https://pod.example.com".to_string(),
        };
        let err = SymphonyClient::connect(&config).await.unwrap_err();
        assert!(matches!(err, crate::SymphonyError::Config(_)));
    }

    #[tokio::test]
    async fn test_start_feed_dispatches_and_shuts_down() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/agent/v4/datafeed/create"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "f1"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/agent/v4/datafeed/f1/read"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        struct CountingListener(Arc<Mutex<u64>>);
        impl DatafeedListener for CountingListener {
            fn on_message(&self, _message: crate::types::FeedMessage) {
                *self.0.lock().unwrap() += 1;
            }
        }

        let client = test_client(&server);
        let (handle, shutdown) = client.start_feed(CountingListener(Arc::new(Mutex::new(0))));

        tokio::time::sleep(Duration::from_millis(100)).await;
        shutdown.store(true, Ordering::Relaxed);

        let stats = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("worker did not stop")
            .unwrap();
        assert_eq!(stats.feeds_created, 1);
    }
}
