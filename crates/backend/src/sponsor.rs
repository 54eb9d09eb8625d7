//! # Gas Sponsorship API
//!
//! Forwards a signed serialized transaction to the platform's fee-payer
//! service, which co-signs and submits it so the author never holds the
//! gas token.
//!
//! ## Contract
//!
//! - A bearer session token is REQUIRED; callers without one get
//!   `AuthRequired` before any network traffic.
//! - Exactly one best-effort attempt. No retry, no backoff: a duplicate
//!   submission could double-settle the fee, and reconciliation belongs
//!   to the backend via the idempotency key in the metadata.
//! - The returned signature is trusted as settlement proof; the client
//!   does not re-verify finality on chain.

use std::sync::Arc;

use doci_common::ClientError;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::transport::BackendTransport;

// ════════════════════════════════════════════════════════════════════════════════
// WIRE SHAPES
// ════════════════════════════════════════════════════════════════════════════════

/// Transaction categories the sponsor service accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SponsoredTransactionType {
    #[serde(rename = "manuscript_submission")]
    ManuscriptSubmission,
    #[serde(rename = "review_reward")]
    ReviewReward,
    #[serde(rename = "author_reward")]
    AuthorReward,
    #[serde(rename = "doci_minting")]
    DociMinting,
    #[serde(rename = "escrow_operation")]
    EscrowOperation,
}

impl SponsoredTransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SponsoredTransactionType::ManuscriptSubmission => "manuscript_submission",
            SponsoredTransactionType::ReviewReward => "review_reward",
            SponsoredTransactionType::AuthorReward => "author_reward",
            SponsoredTransactionType::DociMinting => "doci_minting",
            SponsoredTransactionType::EscrowOperation => "escrow_operation",
        }
    }
}

/// Settlement proof returned by the sponsor.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsoredTransactionResult {
    pub signature: String,
    #[serde(default)]
    pub gas_used: Option<u64>,
    #[serde(default)]
    pub explorer_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SponsorDto {
    success: bool,
    #[serde(default)]
    message: String,
    #[serde(flatten)]
    result: Option<SponsoredTransactionResult>,
}

/// Sponsor service health report.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorHealth {
    pub healthy: bool,
    #[serde(default)]
    pub fee_payer_balance_sol: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Aggregate sponsorship statistics.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorStats {
    #[serde(default)]
    pub total_sponsored: u64,
    #[serde(default)]
    pub total_gas_spent_sol: f64,
    #[serde(default)]
    pub by_type: std::collections::HashMap<String, u64>,
}

// ════════════════════════════════════════════════════════════════════════════════
// CLIENT
// ════════════════════════════════════════════════════════════════════════════════

/// Client for the gas sponsorship endpoints.
#[derive(Clone)]
pub struct SponsorClient {
    transport: Arc<dyn BackendTransport>,
}

impl SponsorClient {
    pub fn new(transport: Arc<dyn BackendTransport>) -> Self {
        Self { transport }
    }

    /// `POST /transactions/sponsor-gas`
    ///
    /// `serialized_b64` is the base64 form of the signed transaction;
    /// `metadata` rides along for backend reconciliation (wallet,
    /// idempotency key). `bearer` is mandatory.
    pub async fn sponsor_transaction(
        &self,
        bearer: Option<&str>,
        serialized_b64: &str,
        tx_type: SponsoredTransactionType,
        metadata: serde_json::Value,
    ) -> Result<SponsoredTransactionResult, ClientError> {
        let token = match bearer {
            Some(token) if !token.is_empty() => token,
            _ => return Err(ClientError::AuthRequired),
        };
        if serialized_b64.is_empty() {
            return Err(ClientError::ValidationError(
                "serialized transaction is empty".to_string(),
            ));
        }
        let body = serde_json::json!({
            "transaction": serialized_b64,
            "transactionType": tx_type.as_str(),
            "metadata": metadata,
        });
        let resp = self
            .transport
            .post_json("/transactions/sponsor-gas", &body, Some(token))
            .await?
            .ensure_success()?;
        let dto: SponsorDto = resp.json()?;
        if !dto.success {
            return Err(ClientError::SponsorshipRejected(dto.message));
        }
        let result = dto.result.ok_or_else(|| {
            ClientError::SponsorshipRejected("sponsor returned no signature".to_string())
        })?;
        info!(
            signature = %result.signature,
            tx_type = tx_type.as_str(),
            "transaction sponsored"
        );
        Ok(result)
    }

    /// `GET /transactions/health`
    pub async fn health(&self) -> Result<SponsorHealth, ClientError> {
        let resp = self
            .transport
            .get("/transactions/health", None)
            .await?
            .ensure_success()?;
        resp.json()
    }

    /// `GET /transactions/stats`
    pub async fn stats(&self) -> Result<SponsorStats, ClientError> {
        let resp = self
            .transport
            .get("/transactions/stats", None)
            .await?
            .ensure_success()?;
        resp.json()
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// TESTS
// ════════════════════════════════════════════════════════════════════════════════
