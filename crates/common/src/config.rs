//! Config loader using TOML and serde, with environment overrides.
//! The struct is intentionally small and typed; addresses stay as
//! base58 strings here and are parsed by the chain crate.

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

use crate::error::ClientError;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend REST base URL (no trailing slash).
    pub backend_endpoint: String,

    /// Chain JSON-RPC endpoint used for account and blockhash queries.
    pub rpc_endpoint: String,

    /// Base58 address of the fixed submission-fee escrow account.
    pub escrow_address: String,

    /// Base58 mint address of the fee token.
    pub fee_token_mint: String,

    /// Submission fee in whole tokens (converted to minor units with
    /// `fee_token_decimals` by the payment assembler).
    pub fee_amount_tokens: u64,

    /// Decimals of the fee token mint.
    pub fee_token_decimals: u8,

    /// Timeout applied to every HTTP request, seconds.
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            backend_endpoint: "http://127.0.0.1:4000".to_string(),
            rpc_endpoint: "http://127.0.0.1:8899".to_string(),
            escrow_address: String::new(),
            fee_token_mint: String::new(),
            fee_amount_tokens: 50,
            fee_token_decimals: 6,
            request_timeout_secs: 10,
        }
    }
}

impl ClientConfig {
    /// Fee expressed in the token's minor unit (`tokens * 10^decimals`).
    /// Saturates instead of overflowing on absurd decimals.
    pub fn fee_minor_units(&self) -> u64 {
        let scale = 10u64.saturating_pow(u32::from(self.fee_token_decimals));
        self.fee_amount_tokens.saturating_mul(scale)
    }

    /// Applies `DOCI_*` environment overrides on top of the current
    /// values. Unset variables leave fields untouched.
    pub fn apply_env(&mut self) {
        if let Ok(v) = env::var("DOCI_BACKEND_ENDPOINT") {
            self.backend_endpoint = v;
        }
        if let Ok(v) = env::var("DOCI_RPC_ENDPOINT") {
            self.rpc_endpoint = v;
        }
        if let Ok(v) = env::var("DOCI_ESCROW_ADDRESS") {
            self.escrow_address = v;
        }
        if let Ok(v) = env::var("DOCI_FEE_TOKEN_MINT") {
            self.fee_token_mint = v;
        }
    }
}

/// Load config from a TOML file path.
/// If the file is missing or fails to parse, an error is returned.
pub fn load_from_file(path: impl AsRef<Path>) -> Result<ClientConfig, ClientError> {
    let p = path.as_ref();
    let s = fs::read_to_string(p)
        .map_err(|e| ClientError::ValidationError(format!("config {}: {}", p.display(), e)))?;
    toml::from_str(&s)
        .map_err(|e| ClientError::ValidationError(format!("config parse: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let def = ClientConfig::default();
        assert_eq!(def.fee_amount_tokens, 50);
        assert_eq!(def.fee_token_decimals, 6);
        assert_eq!(def.request_timeout_secs, 10);
    }

    #[test]
    fn test_fee_minor_units() {
        let cfg = ClientConfig::default();
        // 50 tokens at 6 decimals
        assert_eq!(cfg.fee_minor_units(), 50_000_000);
    }

    #[test]
    fn test_fee_minor_units_saturates() {
        let cfg = ClientConfig {
            fee_amount_tokens: u64::MAX,
            fee_token_decimals: 9,
            ..ClientConfig::default()
        };
        assert_eq!(cfg.fee_minor_units(), u64::MAX);
    }

    #[test]
    fn test_load_from_file_roundtrip() {
        use std::io::Write;
        let tmp = tempfile::NamedTempFile::new().expect("temp file");
        let toml = r#"
            backend_endpoint = "https://api.example.org"
            rpc_endpoint = "https://rpc.example.org"
            escrow_address = "EscRow1111"
            fee_token_mint = "Mint1111"
            fee_amount_tokens = 75
            fee_token_decimals = 9
            request_timeout_secs = 5
        "#;
        let mut f = tmp.reopen().expect("reopen");
        write!(f, "{}", toml).expect("write");
        let cfg = load_from_file(tmp.path()).expect("load");
        assert_eq!(cfg.backend_endpoint, "https://api.example.org");
        assert_eq!(cfg.fee_amount_tokens, 75);
        assert_eq!(cfg.fee_minor_units(), 75_000_000_000);
    }

    #[test]
    fn test_load_partial_file_uses_defaults() {
        use std::io::Write;
        let tmp = tempfile::NamedTempFile::new().expect("temp file");
        let mut f = tmp.reopen().expect("reopen");
        write!(f, "fee_amount_tokens = 10\n").expect("write");
        let cfg = load_from_file(tmp.path()).expect("load");
        assert_eq!(cfg.fee_amount_tokens, 10);
        assert_eq!(cfg.request_timeout_secs, 10);
    }

    #[test]
    fn test_load_missing_file_errors() {
        assert!(load_from_file("/definitely/not/here.toml").is_err());
    }
}
