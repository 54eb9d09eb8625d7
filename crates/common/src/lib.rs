//! # DOCI Common Crate
//!
//! Shared foundation for the DOCI publishing client.
//!
//! ## Modules
//! - `error`: client error taxonomy
//! - `config`: configuration management
//! - `types`: canonical data shapes (drafts, profiles, manuscripts)
//! - `validation`: client-side file/field checks
//! - `workflow`: forward-only submission progress tracking
//!
//! ## Usage
//! ```rust,ignore
//! let mut tracker = WorkflowTracker::new();
//! validation::validate_draft(&draft)?;
//! tracker.advance(SubmissionStage::ManuscriptSubmit, "submitting")?;
//! ```

pub mod config;
pub mod error;
pub mod types;
pub mod validation;
pub mod workflow;

pub use config::ClientConfig;
pub use error::ClientError;
pub use types::{
    CvStatus, ManualProfileForm, ManuscriptRecord, ManuscriptStatus, ProfileSnapshot,
    ResearcherProfile, SubmissionDraft,
};
pub use workflow::{SubmissionStage, WorkflowTracker};

pub type Result<T> = std::result::Result<T, ClientError>;
