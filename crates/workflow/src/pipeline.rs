//! # Submission Pipeline
//!
//! Orchestrates one manuscript submission, strictly sequential:
//!
//! ```text
//! gate (CV check) ──▶ payment (sign + sponsor) ──▶ upload (pin + record)
//! ```
//!
//! Each step is awaited before the next starts. A failure halts the
//! pipeline and is recorded on the tracker with `fail` — the stage
//! never regresses and nothing is rolled back. In particular a settled
//! fee is NOT refunded when the upload fails; the error message says so
//! and the idempotency key lets the backend reconcile the orphaned
//! payment.
//!
//! ## In-flight guard
//!
//! One submission at a time. A second `submit` while the first is
//! unsettled fails fast with `SubmissionInFlight` instead of racing the
//! backend with a duplicate fee payment.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use doci_backend::SubmitReceipt;
use doci_chain::WalletSigner;
use doci_common::types::SubmissionDraft;
use doci_common::validation::validate_draft;
use doci_common::workflow::{SubmissionStage, WorkflowTracker};
use doci_common::ClientError;
use parking_lot::Mutex;
use rand::rngs::OsRng;
use rand::RngCore;
use tracing::{info, warn};

use crate::gate::SubmissionGate;
use crate::payment::PaymentAssembler;
use crate::uploader::SubmissionUploader;

// ════════════════════════════════════════════════════════════════════════════════
// IDEMPOTENCY KEY
// ════════════════════════════════════════════════════════════════════════════════

/// UUID-shaped random key, one per submission attempt. Attached to both
/// the sponsorship metadata and the upload request.
pub fn new_idempotency_key() -> String {
    let mut bytes = [0u8; 16];
    OsRng.fill_bytes(&mut bytes);
    let hex = hex::encode(bytes);
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32],
    )
}

// ════════════════════════════════════════════════════════════════════════════════
// GUARD
// ════════════════════════════════════════════════════════════════════════════════

// Releases the in-flight flag even when a step errors out early.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// PIPELINE
// ════════════════════════════════════════════════════════════════════════════════

/// The gate → payment → upload orchestrator.
pub struct SubmissionPipeline {
    gate: Arc<dyn SubmissionGate>,
    payment: PaymentAssembler,
    uploader: SubmissionUploader,
    tracker: Mutex<WorkflowTracker>,
    in_flight: AtomicBool,
}

impl SubmissionPipeline {
    pub fn new(
        gate: Arc<dyn SubmissionGate>,
        payment: PaymentAssembler,
        uploader: SubmissionUploader,
    ) -> Self {
        Self {
            gate,
            payment,
            uploader,
            tracker: Mutex::new(WorkflowTracker::new()),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Snapshot of the tracker for display.
    pub fn tracker(&self) -> WorkflowTracker {
        self.tracker.lock().clone()
    }

    /// Runs one full submission attempt for `signer`'s wallet.
    pub async fn submit(
        &self,
        signer: &dyn WalletSigner,
        bearer: Option<&str>,
        draft: SubmissionDraft,
    ) -> Result<SubmitReceipt, ClientError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ClientError::SubmissionInFlight);
        }
        let _guard = InFlightGuard(&self.in_flight);
        self.tracker.lock().reset();

        // Draft problems (missing fields, wrong MIME, oversized file)
        // are caught before the fee is touched or the network consulted.
        if let Err(err) = validate_draft(&draft) {
            self.record_failure(&err.to_string());
            return Err(err);
        }

        let wallet = signer.address().to_base58();
        let key = new_idempotency_key();
        info!(wallet = %wallet, idempotency_key = %key, "submission started");

        self.advance(SubmissionStage::CvCheck, "verifying researcher identity");
        let snapshot = match self.gate.ensure_can_submit(&wallet).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                self.record_failure(&err.to_string());
                return Err(err);
            }
        };
        info!(researcher = %snapshot.name, "identity verified");

        self.advance(SubmissionStage::ManuscriptSubmit, "settling submission fee");
        let payment_signature = match self.payment.settle_fee(signer, bearer, &key).await {
            Ok(signature) => signature,
            Err(err) => {
                self.record_failure(&err.to_string());
                return Err(err);
            }
        };

        self.advance(SubmissionStage::ManuscriptSubmit, "uploading manuscript");
        let mut slot = Some(draft);
        let receipt = match self
            .uploader
            .upload(&wallet, &mut slot, &payment_signature, &key)
            .await
        {
            Ok(receipt) => receipt,
            Err(err) => {
                // The fee is settled and stays settled; the backend
                // reconciles via the idempotency key.
                self.record_failure(&format!(
                    "{} (fee payment {} is not refunded; reference {})",
                    err, payment_signature, key
                ));
                return Err(err);
            }
        };

        self.advance(SubmissionStage::UnderReview, "submitted, awaiting review");
        Ok(receipt)
    }

    fn advance(&self, stage: SubmissionStage, message: &str) {
        if let Err(rejected) = self.tracker.lock().advance(stage, message) {
            warn!(%rejected, "tracker advance rejected");
        }
    }

    fn record_failure(&self, error: &str) {
        warn!(error, "submission halted");
        self.tracker.lock().fail(error);
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// TESTS
// ════════════════════════════════════════════════════════════════════════════════
