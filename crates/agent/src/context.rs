//! Shared command context: configuration resolution and client wiring.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use doci_backend::HttpTransport;
use doci_common::config::{self, ClientConfig};
use doci_common::ClientError;
use tracing::debug;

/// Resolves the effective configuration: file (if given) → defaults,
/// then environment overrides on top.
pub fn load_config(path: Option<&PathBuf>) -> Result<ClientConfig, ClientError> {
    let mut config = match path {
        Some(path) => config::load_from_file(path)?,
        None => ClientConfig::default(),
    };
    config.apply_env();
    debug!(backend = %config.backend_endpoint, "configuration resolved");
    Ok(config)
}

/// Builds the shared HTTP transport for the backend.
pub fn transport(config: &ClientConfig) -> Result<Arc<HttpTransport>, ClientError> {
    Ok(Arc::new(HttpTransport::new(
        config.backend_endpoint.clone(),
        Duration::from_secs(config.request_timeout_secs),
    )?))
}

/// Session token for endpoints that require authentication.
pub fn session_token(flag: Option<String>) -> Option<String> {
    flag.or_else(|| std::env::var("DOCI_SESSION_TOKEN").ok())
        .filter(|token| !token.is_empty())
}

/// Rejects a blank `--wallet` value before it reaches a request path.
pub fn require_wallet(wallet: &str) -> Result<&str, ClientError> {
    let trimmed = wallet.trim();
    if trimmed.is_empty() {
        return Err(ClientError::MissingWallet);
    }
    Ok(trimmed)
}
