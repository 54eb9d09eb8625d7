//! # Verification Gate
//!
//! Every manuscript submission starts here: the author's wallet must map
//! to a registered CV before any payment or upload is attempted.
//!
//! ## State machine
//!
//! ```text
//!              ┌──────────┐
//!              │ Checking │
//!              └────┬─────┘
//!        ┌──────────┼──────────┐
//!        ▼          ▼          ▼
//!   Verified    Unverified   Error
//!  (snapshot)  (needs CV)  (transient)
//! ```
//!
//! ## Invariants
//!
//! - A syntactically invalid or off-curve wallet address short-circuits
//!   to `Unverified` with ZERO transport calls.
//! - `Verified` snapshots are cached per wallet in memory only; a wallet
//!   change invalidates the cache. Nothing is persisted.
//! - `Error` is transient (network trouble), never a verdict about the
//!   author's identity.

use std::sync::Arc;

use async_trait::async_trait;
use doci_backend::ProfileClient;
use doci_chain::Address;
use doci_common::types::{CvStatus, ProfileSnapshot};
use doci_common::ClientError;
use parking_lot::Mutex;
use tracing::{debug, info};

// ════════════════════════════════════════════════════════════════════════════════
// STATE
// ════════════════════════════════════════════════════════════════════════════════

/// Outcome of one verification pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateState {
    /// Verification in progress (initial state).
    Checking,
    /// CV on file and submissions allowed; carries the profile snapshot
    /// shown alongside the submission form.
    Verified(ProfileSnapshot),
    /// No CV on file, or the wallet address itself is invalid. The
    /// caller redirects to CV registration.
    Unverified,
    /// Transient failure (network, backend); retry is reasonable.
    Error(String),
}

// ════════════════════════════════════════════════════════════════════════════════
// IDENTITY SOURCE
// ════════════════════════════════════════════════════════════════════════════════

/// Where CV status comes from. Abstracted so the gate is testable
/// without a backend.
#[async_trait]
pub trait IdentitySource: Send + Sync {
    async fn cv_status(&self, wallet: &str) -> Result<CvStatus, ClientError>;
}

#[async_trait]
impl IdentitySource for ProfileClient {
    async fn cv_status(&self, wallet: &str) -> Result<CvStatus, ClientError> {
        self.check_cv_status(wallet).await
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// GATE
// ════════════════════════════════════════════════════════════════════════════════

/// The identity gate with its per-wallet session cache.
pub struct VerificationGate {
    source: Arc<dyn IdentitySource>,
    // (wallet, snapshot) of the last Verified outcome. Session-only.
    cache: Mutex<Option<(String, ProfileSnapshot)>>,
}

impl VerificationGate {
    pub fn new(source: Arc<dyn IdentitySource>) -> Self {
        Self {
            source,
            cache: Mutex::new(None),
        }
    }

    /// Runs one verification pass for `wallet`.
    pub async fn verify(&self, wallet: &str) -> GateState {
        // Address sanity comes first; a malformed or off-curve address
        // can never verify, so the network is not consulted.
        if Address::parse_wallet(wallet).is_err() {
            debug!(wallet, "wallet address rejected before network");
            return GateState::Unverified;
        }

        if let Some(snapshot) = self.cached(wallet) {
            debug!(wallet, "verification served from session cache");
            return GateState::Verified(snapshot);
        }

        match self.source.cv_status(wallet).await {
            Ok(status) if status.has_cv && status.can_submit_manuscripts => {
                let snapshot = status.user_info.unwrap_or_default();
                info!(wallet, "wallet verified");
                *self.cache.lock() = Some((wallet.to_string(), snapshot.clone()));
                GateState::Verified(snapshot)
            }
            Ok(_) => {
                info!(wallet, "no CV on file");
                GateState::Unverified
            }
            Err(err) => GateState::Error(err.to_string()),
        }
    }

    /// Verification as a hard requirement: `Unverified` becomes
    /// `CvRequired` (the caller redirects via `redirect_hint()`),
    /// `Error` becomes `NetworkError`.
    pub async fn ensure_can_submit(&self, wallet: &str) -> Result<ProfileSnapshot, ClientError> {
        match self.verify(wallet).await {
            GateState::Verified(snapshot) => Ok(snapshot),
            GateState::Unverified => Err(ClientError::CvRequired {
                wallet: wallet.to_string(),
            }),
            GateState::Error(message) => Err(ClientError::NetworkError(message)),
            GateState::Checking => Err(ClientError::NetworkError(
                "verification did not complete".to_string(),
            )),
        }
    }

    /// Drops the session cache (wallet disconnect / switch).
    pub fn invalidate(&self) {
        *self.cache.lock() = None;
    }

    fn cached(&self, wallet: &str) -> Option<ProfileSnapshot> {
        let cache = self.cache.lock();
        match cache.as_ref() {
            Some((cached_wallet, snapshot)) if cached_wallet == wallet => Some(snapshot.clone()),
            _ => None,
        }
    }
}

/// Gate seam for the pipeline, so tests can substitute a double for the
/// whole verification step rather than mocking the transport beneath it.
#[async_trait]
pub trait SubmissionGate: Send + Sync {
    async fn ensure_can_submit(&self, wallet: &str) -> Result<ProfileSnapshot, ClientError>;
}

#[async_trait]
impl SubmissionGate for VerificationGate {
    async fn ensure_can_submit(&self, wallet: &str) -> Result<ProfileSnapshot, ClientError> {
        VerificationGate::ensure_can_submit(self, wallet).await
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// TESTS
// ════════════════════════════════════════════════════════════════════════════════
