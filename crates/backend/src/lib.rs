//! # doci-backend
//!
//! Typed REST client for the publishing platform backend: identity and
//! CV endpoints, manuscript submission and listing, reviewer workflow,
//! and the gas-sponsorship service.
//!
//! All clients speak through the [`transport::BackendTransport`] trait,
//! so every endpoint is testable against [`transport::MockTransport`]
//! without a server. Loosely-shaped manuscript payloads are funneled
//! through [`normalize`] into one canonical record type at the API
//! boundary.

pub mod manuscripts;
pub mod normalize;
pub mod profile;
pub mod reviews;
pub mod sponsor;
pub mod transport;

pub use manuscripts::{ManuscriptClient, SubmitReceipt};
pub use normalize::{normalize_manuscript, normalize_manuscripts};
pub use profile::{ParsedCv, ProfileClient, POST_REGISTRATION_REDIRECT};
pub use reviews::{ReviewClient, ReviewEntry, ReviewStatus};
pub use sponsor::{
    SponsorClient, SponsorHealth, SponsorStats, SponsoredTransactionResult,
    SponsoredTransactionType,
};
pub use transport::{ApiResponse, BackendTransport, HttpTransport, MockTransport, MultipartField};
