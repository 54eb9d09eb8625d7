//! # doci-workflow
//!
//! The manuscript submission workflow: identity gate, fee payment
//! assembly, upload, and the sequential pipeline tying them together
//! over a forward-only progress tracker.
//!
//! ## Modules
//! - `gate`: wallet → CV verification with a session cache
//! - `payment`: fee transfer assembly and gas sponsorship
//! - `uploader`: draft validation and multipart upload
//! - `pipeline`: gate → payment → upload with an in-flight guard

pub mod gate;
pub mod payment;
pub mod pipeline;
pub mod uploader;

pub use gate::{GateState, IdentitySource, SubmissionGate, VerificationGate};
pub use payment::{FeeSchedule, PaymentAssembler};
pub use pipeline::{new_idempotency_key, SubmissionPipeline};
pub use uploader::SubmissionUploader;
