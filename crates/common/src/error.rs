//! # Client Error Taxonomy
//!
//! Defines [`ClientError`], the public error contract for every operation
//! the DOCI client performs: wallet checks, backend calls, payment
//! sponsorship and manuscript upload.
//!
//! ## Overview
//!
//! Every failure a caller can observe maps to exactly one variant. The
//! variants are non-overlapping — each has a distinct semantic meaning:
//!
//! | Category | Variants |
//! |----------|----------|
//! | Wallet | `WalletNotConnected`, `InvalidWalletAddress`, `MissingWallet` |
//! | Session | `AuthRequired` |
//! | Identity | `CvRequired` |
//! | Transport | `NetworkError`, `RateLimited`, `ServiceUnavailable` |
//! | Storage | `PinningServiceError` |
//! | Payment | `PaymentRejected`, `SponsorshipRejected` |
//! | Input | `ValidationError` |
//! | Pipeline | `SubmissionInFlight` |
//!
//! ## Display Messages
//!
//! All `Display` messages are deterministic and human-readable. They are
//! surfaced directly to the user; no variant leaks internal debug
//! formatting.
//!
//! ## Retry Policy
//!
//! No variant is retried automatically anywhere in the client. The
//! [`ClientError::is_retryable`] classification only tells a caller
//! whether re-attempting the same action by hand can possibly succeed.

use std::fmt;

use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════════
// CLIENT ERROR
// ════════════════════════════════════════════════════════════════════════════════

/// Every failure surfaced by the DOCI client pipeline.
///
/// Construction happens at the failing call site; propagation is by plain
/// `Result` all the way to the caller. No variant wraps a live source
/// error — transport failures are flattened to their message so the type
/// stays `Clone + Eq` and serializable for audit logs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientError {
    /// No wallet signer is attached to the session.
    WalletNotConnected,

    /// The wallet address failed base58 or curve validation.
    /// Checked before any network round-trip is attempted.
    InvalidWalletAddress {
        /// The offending address string, truncated by callers if long.
        address: String,
    },

    /// A required wallet address was absent from the request.
    MissingWallet,

    /// Transport-level failure: connect, timeout, malformed response,
    /// or an unclassified 5xx from the backend.
    NetworkError(String),

    /// The operation requires an authenticated session token.
    AuthRequired,

    /// The wallet has no verified academic identity (CV) on file.
    /// Callers redirect to the registration flow.
    CvRequired {
        /// The wallet that failed the identity check.
        wallet: String,
    },

    /// The content-addressed storage (pinning) service rejected the
    /// upload or is unreachable upstream.
    PinningServiceError(String),

    /// HTTP 429 from the backend.
    RateLimited,

    /// HTTP 503 from the backend.
    ServiceUnavailable,

    /// The chain (via the sponsor) rejected the payment, e.g.
    /// insufficient token balance.
    PaymentRejected(String),

    /// The sponsorship endpoint rejected the transaction, e.g.
    /// fee payer underfunded or malformed payload. The backend's
    /// original message is preserved verbatim.
    SponsorshipRejected(String),

    /// Client-side input validation failed: file type, file size,
    /// required field, email format. Produced before any network call.
    ValidationError(String),

    /// A submission attempt is already in flight for this pipeline.
    /// The trigger must stay disabled until the attempt settles.
    SubmissionInFlight,
}

impl ClientError {
    /// Maps an HTTP response status (plus body text) to the taxonomy.
    ///
    /// Only statuses the backend contract actually produces get a
    /// dedicated variant; anything else 4xx/5xx flattens to
    /// [`ClientError::NetworkError`] carrying status and body.
    pub fn from_http_status(status: u16, body: &str) -> Self {
        match status {
            401 | 403 => ClientError::AuthRequired,
            429 => ClientError::RateLimited,
            503 => ClientError::ServiceUnavailable,
            _ => {
                // Pinning failures are tagged by the backend in the body.
                if body.contains("PINATA_ERROR") {
                    ClientError::PinningServiceError(body.to_string())
                } else {
                    ClientError::NetworkError(format!("HTTP {}: {}", status, body))
                }
            }
        }
    }

    /// `true` if a manual re-attempt of the same action can succeed
    /// without the user changing anything first.
    ///
    /// Validation, wallet and identity errors need user action; transient
    /// transport and service errors do not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ClientError::NetworkError(_)
                | ClientError::RateLimited
                | ClientError::ServiceUnavailable
                | ClientError::PinningServiceError(_)
                | ClientError::SubmissionInFlight
        )
    }

    /// The in-app route the user should be sent to, when the error has
    /// a redirect rather than a retry as its remedy.
    pub fn redirect_hint(&self) -> Option<&'static str> {
        match self {
            ClientError::CvRequired { .. } => Some("/register-cv"),
            ClientError::WalletNotConnected | ClientError::MissingWallet => {
                Some("/connect-wallet")
            }
            _ => None,
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::WalletNotConnected => {
                write!(f, "wallet is not connected")
            }
            ClientError::InvalidWalletAddress { address } => {
                write!(f, "invalid wallet address: {}", address)
            }
            ClientError::MissingWallet => {
                write!(f, "wallet address is required")
            }
            ClientError::NetworkError(msg) => {
                write!(f, "network error: {}", msg)
            }
            ClientError::AuthRequired => {
                write!(f, "authentication required")
            }
            ClientError::CvRequired { wallet } => {
                write!(f, "no verified CV on file for wallet {}", wallet)
            }
            ClientError::PinningServiceError(msg) => {
                write!(f, "pinning service error: {}", msg)
            }
            ClientError::RateLimited => {
                write!(f, "rate limited, slow down and retry manually")
            }
            ClientError::ServiceUnavailable => {
                write!(f, "service temporarily unavailable")
            }
            ClientError::PaymentRejected(msg) => {
                write!(f, "payment rejected: {}", msg)
            }
            ClientError::SponsorshipRejected(msg) => {
                write!(f, "transaction sponsorship rejected: {}", msg)
            }
            ClientError::ValidationError(msg) => {
                write!(f, "validation failed: {}", msg)
            }
            ClientError::SubmissionInFlight => {
                write!(f, "a submission is already in progress")
            }
        }
    }
}

impl std::error::Error for ClientError {}

// ════════════════════════════════════════════════════════════════════════════════
// TESTS
// ════════════════════════════════════════════════════════════════════════════════
