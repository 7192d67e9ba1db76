//! Client configuration
//!
//! Explicit configuration object passed by the caller; nothing here reads
//! process-global state after construction. `from_env` exists as a
//! convenience for tooling and reads the `SYMPHONY_*` variables once.

use serde::Deserialize;

use crate::error::{Result, SymphonyError};

/// One-time wiring configuration for [`crate::SymphonyClient::connect`]
#[derive(Clone, Deserialize)]
pub struct SymphonyConfig {
    /// Session authentication base URL (pod side)
    pub session_auth_url: String,
    /// Key manager authentication base URL
    pub key_auth_url: String,
    /// Bot client certificate, PKCS#12 (.p12) file
    pub user_cert_file: String,
    /// Password for the PKCS#12 keystore
    pub user_cert_password: String,
    /// Optional PEM bundle of additional root certificates
    #[serde(default)]
    pub truststore_file: Option<String>,
    /// Accepted for keystore-format parity; unused for PEM trust bundles
    #[serde(default)]
    pub truststore_password: Option<String>,
    /// Agent base URL (datafeed endpoints)
    pub agent_url: String,
    /// Pod base URL
    pub pod_url: String,
}

impl SymphonyConfig {
    /// Build a config from `SYMPHONY_*` environment variables
    ///
    /// Expected variables:
    /// - SYMPHONY_SESSIONAUTH_URL
    /// - SYMPHONY_KEYAUTH_URL
    /// - SYMPHONY_USER_CERT_FILE
    /// - SYMPHONY_USER_CERT_PASSWORD
    /// - SYMPHONY_TRUSTSTORE_FILE (optional)
    /// - SYMPHONY_TRUSTSTORE_PASSWORD (optional)
    /// - SYMPHONY_AGENT_URL
    /// - SYMPHONY_POD_URL
    pub fn from_env() -> Option<Self> {
        let session_auth_url = std::env::var("SYMPHONY_SESSIONAUTH_URL").ok()?;
        let key_auth_url = std::env::var("SYMPHONY_KEYAUTH_URL").ok()?;
        let user_cert_file = std::env::var("SYMPHONY_USER_CERT_FILE").ok()?;
        let user_cert_password = std::env::var("SYMPHONY_USER_CERT_PASSWORD").ok()?;
        let agent_url = std::env::var("SYMPHONY_AGENT_URL").ok()?;
        let pod_url = std::env::var("SYMPHONY_POD_URL").ok()?;

        Some(Self {
            session_auth_url,
            key_auth_url,
            user_cert_file,
            user_cert_password,
            truststore_file: std::env::var("SYMPHONY_TRUSTSTORE_FILE").ok(),
            truststore_password: std::env::var("SYMPHONY_TRUSTSTORE_PASSWORD").ok(),
            agent_url,
            pod_url,
        })
    }

    /// Reject configs that cannot possibly wire a client
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("session_auth_url", &self.session_auth_url),
            ("key_auth_url", &self.key_auth_url),
            ("agent_url", &self.agent_url),
            ("pod_url", &self.pod_url),
        ] {
            if value.trim().is_empty() {
                return Err(SymphonyError::Config(format!("{} is empty", name)));
            }
            url::Url::parse(value).map_err(|e| {
                SymphonyError::Config(format!("{} is not a valid URL: {}", name, e))
            })?;
        }
        if self.user_cert_file.trim().is_empty() {
            return Err(SymphonyError::Config("user_cert_file is empty".to_string()));
        }
        Ok(())
    }
}

impl std::fmt::Debug for SymphonyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymphonyConfig")
            .field("session_auth_url", &self.session_auth_url)
            .field("key_auth_url", &self.key_auth_url)
            .field("user_cert_file", &self.user_cert_file)
            .field("user_cert_password", &"[REDACTED]")
            .field("truststore_file", &self.truststore_file)
            .field("truststore_password", &"[REDACTED]")
            .field("agent_url", &self.agent_url)
            .field("pod_url", &self.pod_url)
            .finish()
    }
}
