//! # Submission Uploader
//!
//! Final step of the pipeline: posts the validated draft, the settled
//! payment signature and the idempotency key to the backend, which pins
//! the manuscript and writes the record.
//!
//! The draft lives in an `Option` slot owned by the caller. It is taken
//! out only AFTER a successful upload, so a failed attempt leaves the
//! draft intact for retry.

use doci_backend::{ManuscriptClient, SubmitReceipt};
use doci_common::types::SubmissionDraft;
use doci_common::ClientError;
use tracing::info;

/// Uploads drafts through the manuscript endpoint.
#[derive(Clone)]
pub struct SubmissionUploader {
    manuscripts: ManuscriptClient,
}

impl SubmissionUploader {
    pub fn new(manuscripts: ManuscriptClient) -> Self {
        Self { manuscripts }
    }

    /// Uploads the draft in `slot`. On success the slot is cleared and
    /// the backend receipt returned; on failure the slot still holds
    /// the draft.
    pub async fn upload(
        &self,
        wallet: &str,
        slot: &mut Option<SubmissionDraft>,
        payment_signature: &str,
        idempotency_key: &str,
    ) -> Result<SubmitReceipt, ClientError> {
        let draft = slot.as_ref().ok_or_else(|| {
            ClientError::ValidationError("no draft to upload".to_string())
        })?;
        let receipt = self
            .manuscripts
            .submit_manuscript(wallet, draft, payment_signature, idempotency_key)
            .await?;
        info!(
            manuscript_id = %receipt.manuscript_id,
            gateway_url = %receipt.gateway_url,
            "draft uploaded"
        );
        *slot = None;
        Ok(receipt)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// TESTS
// ════════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use doci_backend::MockTransport;
    use std::sync::Arc;

    fn draft() -> SubmissionDraft {
        SubmissionDraft {
            title: "T".into(),
            authors: vec!["A".into()],
            categories: vec!["cs".into()],
            abstract_text: "Abs".into(),
            keywords: vec![],
            file_name: "p.pdf".into(),
            file_bytes: vec![0u8; 256],
            mime_type: "application/pdf".into(),
        }
    }

    #[tokio::test]
    async fn test_success_clears_the_draft_slot() {
        let mock = Arc::new(MockTransport::new());
        mock.push_response(
            200,
            r#"{"success":true,"manuscriptId":"m1","cid":"c1","gatewayUrl":"https://gw/c1"}"#,
        );
        let uploader = SubmissionUploader::new(ManuscriptClient::new(mock));
        let mut slot = Some(draft());
        let receipt = uploader
            .upload("w", &mut slot, "sig", "key")
            .await
            .expect("receipt");
        assert_eq!(receipt.cid, "c1");
        assert!(slot.is_none(), "draft must be consumed on success");
    }

    #[tokio::test]
    async fn test_failure_keeps_the_draft() {
        let mock = Arc::new(MockTransport::new());
        mock.push_response(500, "PINATA_ERROR: pin timeout");
        let uploader = SubmissionUploader::new(ManuscriptClient::new(mock));
        let mut slot = Some(draft());
        let err = uploader
            .upload("w", &mut slot, "sig", "key")
            .await
            .expect_err("pin failure");
        assert!(matches!(err, ClientError::PinningServiceError(_)));
        assert!(slot.is_some(), "draft must survive a failed upload");
    }

    #[tokio::test]
    async fn test_oversized_draft_rejected_keeps_slot_and_skips_network() {
        let mock = Arc::new(MockTransport::new());
        let uploader = SubmissionUploader::new(ManuscriptClient::new(mock.clone()));
        let mut big = draft();
        big.file_bytes = vec![0u8; 12 * 1024 * 1024];
        let mut slot = Some(big);
        let err = uploader
            .upload("w", &mut slot, "sig", "key")
            .await
            .expect_err("too large");
        assert!(err.to_string().contains("exceeding"));
        assert!(slot.is_some());
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_slot_is_a_validation_error() {
        let mock = Arc::new(MockTransport::new());
        let uploader = SubmissionUploader::new(ManuscriptClient::new(mock));
        let mut slot: Option<SubmissionDraft> = None;
        let err = uploader
            .upload("w", &mut slot, "sig", "key")
            .await
            .expect_err("empty");
        assert!(matches!(err, ClientError::ValidationError(_)));
    }
}
