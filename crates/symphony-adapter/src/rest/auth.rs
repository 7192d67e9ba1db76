//! Certificate authentication against the pod and key manager
//!
//! Both endpoints take an empty POST authenticated by the client
//! certificate on the transport and return `{ "name": ..., "token": ... }`.
//! The two base URLs usually share an fqdn but differ in port/path.
//!
//! # Source
//! - https://developers.symphony.com/restapi/reference/session-authenticate
//! - https://developers.symphony.com/restapi/reference/key-manager-authenticate

use reqwest::Client;
use tracing::{debug, info};

use crate::error::{Result, SymphonyError};
use crate::types::{SymAuth, TokenResponse};
use crate::{KEY_AUTH_PATH, SESSION_AUTH_PATH};

/// Authentication client for the session-auth / key-auth endpoint pair
#[derive(Clone)]
pub struct AuthClient {
    http: Client,
    session_auth_url: String,
    key_auth_url: String,
}

impl AuthClient {
    /// Create an auth client over an already-configured transport
    pub fn new(http: Client, session_auth_url: &str, key_auth_url: &str) -> Self {
        Self {
            http,
            session_auth_url: session_auth_url.trim_end_matches('/').to_string(),
            key_auth_url: key_auth_url.trim_end_matches('/').to_string(),
        }
    }

    /// Perform the full handshake: session token, then key manager token
    pub async fn authenticate(&self) -> Result<SymAuth> {
        info!("Authenticating with pod at {}", self.session_auth_url);
        let session = self.obtain_token(&self.session_auth_url, SESSION_AUTH_PATH).await?;

        info!("Authenticating with key manager at {}", self.key_auth_url);
        let key_manager = self.obtain_token(&self.key_auth_url, KEY_AUTH_PATH).await?;

        // Token values are bearer secrets; log names only
        debug!("Obtained tokens: {} / {}", session.name, key_manager.name);

        Ok(SymAuth { session_token: session.token, key_manager_token: key_manager.token })
    }

    async fn obtain_token(&self, base_url: &str, path: &str) -> Result<TokenResponse> {
        let url = format!("{}{}", base_url, path);
        debug!("POST {}", url);

        let response = self.http.post(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SymphonyError::Auth { status: status.as_u16(), body });
        }

        Ok(response.json::<TokenResponse>().await?)
    }
}
