//! HTTP transport factory
//!
//! Builds the shared `reqwest::Client` from a bot identity keystore
//! (PKCS#12) and an optional PEM trust bundle. Pure wiring: no globals,
//! no retries, every failure surfaces as [`SymphonyError::Transport`].

use std::time::Duration;

use reqwest::{Certificate, Client, Identity};
use tracing::{debug, info};

use crate::config::SymphonyConfig;
use crate::error::{Result, SymphonyError};

/// Request timeout applied to every call through the transport.
/// Datafeed reads long-poll server-side, so this stays generous.
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Build a TLS client from the keystore material named in `config`
pub fn build_client(config: &SymphonyConfig) -> Result<Client> {
    let pkcs12 = std::fs::read(&config.user_cert_file).map_err(|e| {
        SymphonyError::Transport(format!("cannot read keystore {}: {}", config.user_cert_file, e))
    })?;

    let identity =
        Identity::from_pkcs12_der(&pkcs12, &config.user_cert_password).map_err(|e| {
            SymphonyError::Transport(format!(
                "cannot load identity from {}: {}",
                config.user_cert_file, e
            ))
        })?;

    let mut builder = Client::builder()
        .identity(identity)
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS));

    if let Some(truststore) = &config.truststore_file {
        let pem = std::fs::read(truststore).map_err(|e| {
            SymphonyError::Transport(format!("cannot read trust store {}: {}", truststore, e))
        })?;
        let certs = parse_cert_bundle(&pem)?;
        info!("Loaded {} root certificate(s) from {}", certs.len(), truststore);
        for cert in certs {
            builder = builder.add_root_certificate(cert);
        }
    }

    let client = builder
        .build()
        .map_err(|e| SymphonyError::Transport(format!("cannot build HTTP client: {}", e)))?;

    debug!("HTTP transport ready (identity: {})", config.user_cert_file);
    Ok(client)
}

/// Split a PEM bundle into individual certificates; bytes without PEM
/// markers are treated as a single DER certificate.
fn parse_cert_bundle(bytes: &[u8]) -> Result<Vec<Certificate>> {
    const BEGIN: &str = "-----BEGIN CERTIFICATE-----";
    const END: &str = "-----END CERTIFICATE-----";

    let text = match std::str::from_utf8(bytes) {
        Ok(t) if t.contains(BEGIN) => t,
        _ => {
            let cert = Certificate::from_der(bytes)
                .map_err(|e| SymphonyError::Transport(format!("invalid DER certificate: {}", e)))?;
            return Ok(vec![cert]);
        }
    };

    let mut certs = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find(BEGIN) {
        let after = &rest[start..];
        let end = after
            .find(END)
            .ok_or_else(|| SymphonyError::Transport("unterminated PEM certificate".to_string()))?
            + END.len();
        let block = &after[..end];
        let cert = Certificate::from_pem(block.as_bytes())
            .map_err(|e| SymphonyError::Transport(format!("invalid PEM certificate: {}", e)))?;
        certs.push(cert);
        rest = &after[end..];
    }

    // The PEM branch is only entered when a BEGIN marker is present, so
    // the loop always yields at least one certificate or errors
    Ok(certs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config(cert_file: &str) -> SymphonyConfig {
        SymphonyConfig {
            session_auth_url: "https://pod.example.com:8444".to_string(),
            key_auth_url: "https://km.example.com:8444".to_string(),
            user_cert_file: cert_file.to_string(),
            user_cert_password: "changeit".to_string(),
            truststore_file: None,
            truststore_password: None,
            agent_url: "https://agent.example.com".to_string(),
            pod_url: "https://pod.example.com".to_string(),
        }
    }

    #[test]
    fn test_missing_keystore_is_transport_error() {
        let err = build_client(&sample_config("/nonexistent/bot.p12")).unwrap_err();
        assert!(matches!(err, SymphonyError::Transport(_)));
        assert!(err.to_string().contains("/nonexistent/bot.p12"));
    }

    #[test]
    fn test_garbage_keystore_is_transport_error() {
        let dir = std::env::temp_dir();
        let path = dir.join("symphony_adapter_bad_keystore.p12");
        std::fs::write(&path, b"not a pkcs12 file").unwrap();

        let err = build_client(&sample_config(path.to_str().unwrap())).unwrap_err();
        assert!(matches!(err, SymphonyError::Transport(_)));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_empty_trust_bundle_rejected() {
        let err = parse_cert_bundle(b"").unwrap_err();
        assert!(matches!(err, SymphonyError::Transport(_)));
    }

    #[test]
    fn test_unterminated_pem_rejected() {
        let err = parse_cert_bundle(b"-----BEGIN CERTIFICATE-----\nAAAA\n").unwrap_err();
        assert!(err.to_string().contains("unterminated"));
    }
}
