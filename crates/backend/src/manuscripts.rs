//! # Manuscript API
//!
//! Typed client for manuscript submission, listing and publishing.
//!
//! Submission is a multipart POST carrying the manuscript file, the
//! draft metadata, the author wallet, the payment settlement signature
//! and the per-attempt idempotency key. The draft is validated locally
//! (field presence + file rule) before anything touches the network.

use std::sync::Arc;

use doci_common::types::{ManuscriptRecord, SubmissionDraft};
use doci_common::validation::validate_draft;
use doci_common::ClientError;
use serde::Deserialize;
use tracing::info;

use crate::normalize::{normalize_manuscript, normalize_manuscripts};
use crate::transport::{BackendTransport, MultipartField};

// ════════════════════════════════════════════════════════════════════════════════
// WIRE SHAPES
// ════════════════════════════════════════════════════════════════════════════════

/// Outcome of a successful manuscript submission.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReceipt {
    pub manuscript_id: String,
    pub cid: String,
    pub gateway_url: String,
    #[serde(default)]
    pub metadata_cid: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitDto {
    success: bool,
    #[serde(default)]
    message: String,
    #[serde(flatten)]
    receipt: Option<SubmitReceipt>,
}

// ════════════════════════════════════════════════════════════════════════════════
// CLIENT
// ════════════════════════════════════════════════════════════════════════════════

/// Client for the manuscript endpoints.
#[derive(Clone)]
pub struct ManuscriptClient {
    transport: Arc<dyn BackendTransport>,
}

impl ManuscriptClient {
    pub fn new(transport: Arc<dyn BackendTransport>) -> Self {
        Self { transport }
    }

    /// `POST /manuscripts/submit` (multipart).
    ///
    /// `payment_signature` is the settlement signature returned by the
    /// gas sponsor; an empty signature is rejected locally. The
    /// `idempotency_key` lets the backend reconcile a retried attempt
    /// after a partial failure (pin succeeded, record write lost).
    pub async fn submit_manuscript(
        &self,
        wallet: &str,
        draft: &SubmissionDraft,
        payment_signature: &str,
        idempotency_key: &str,
    ) -> Result<SubmitReceipt, ClientError> {
        validate_draft(draft)?;
        if payment_signature.is_empty() {
            return Err(ClientError::ValidationError(
                "payment signature is required before upload".to_string(),
            ));
        }
        let mut fields = vec![
            MultipartField::file(
                "file",
                draft.file_name.clone(),
                draft.mime_type.clone(),
                draft.file_bytes.clone(),
            ),
            MultipartField::text("wallet", wallet),
            MultipartField::text("title", draft.title.clone()),
            MultipartField::text("authors", draft.authors.join(", ")),
            MultipartField::text("abstract", draft.abstract_text.clone()),
            MultipartField::text("paymentSignature", payment_signature),
            MultipartField::text("idempotencyKey", idempotency_key),
        ];
        for category in &draft.categories {
            fields.push(MultipartField::text("categories", category.clone()));
        }
        for keyword in &draft.keywords {
            fields.push(MultipartField::text("keywords", keyword.clone()));
        }

        let resp = self
            .transport
            .post_multipart("/manuscripts/submit", fields, None)
            .await?
            .ensure_success()?;
        let dto: SubmitDto = resp.json()?;
        if !dto.success {
            return Err(ClientError::NetworkError(dto.message));
        }
        let receipt = dto.receipt.ok_or_else(|| {
            ClientError::NetworkError("submission accepted without a receipt".to_string())
        })?;
        info!(
            manuscript_id = %receipt.manuscript_id,
            cid = %receipt.cid,
            "manuscript submitted"
        );
        Ok(receipt)
    }

    /// `GET /manuscripts/author/{wallet}` — public, wallet-keyed listing.
    pub async fn author_manuscripts(
        &self,
        wallet: &str,
    ) -> Result<Vec<ManuscriptRecord>, ClientError> {
        let path = format!("/manuscripts/author/{}", wallet);
        let resp = self.transport.get(&path, None).await?.ensure_success()?;
        normalize_manuscripts(&resp.json()?)
    }

    /// `GET /manuscripts/author` — session-scoped listing. Requires a
    /// bearer token; without one the backend answers 401, mapped to
    /// `AuthRequired` by the taxonomy.
    pub async fn my_manuscripts(
        &self,
        bearer: &str,
    ) -> Result<Vec<ManuscriptRecord>, ClientError> {
        let resp = self
            .transport
            .get("/manuscripts/author", Some(bearer))
            .await?
            .ensure_success()?;
        normalize_manuscripts(&resp.json()?)
    }

    /// `GET /manuscripts/pending-review`
    pub async fn pending_review(&self) -> Result<Vec<ManuscriptRecord>, ClientError> {
        let resp = self
            .transport
            .get("/manuscripts/pending-review", None)
            .await?
            .ensure_success()?;
        normalize_manuscripts(&resp.json()?)
    }

    /// `POST /manuscripts/{id}/publish`
    pub async fn publish(&self, id: &str) -> Result<ManuscriptRecord, ClientError> {
        let path = format!("/manuscripts/{}/publish", id);
        let resp = self
            .transport
            .post_json(&path, &serde_json::json!({}), None)
            .await?
            .ensure_success()?;
        normalize_manuscript(&resp.json()?)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// TESTS
// ════════════════════════════════════════════════════════════════════════════════
