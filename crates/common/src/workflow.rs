//! # Submission Workflow Tracker
//!
//! Provides [`SubmissionStage`] and [`WorkflowTracker`] for the linear
//! progress indicator spanning identity gate, payment and upload.
//!
//! ## State Machine
//!
//! The canonical ordered stages:
//!
//! ```text
//! CvCheck → CvUpload → ManuscriptSubmit → UnderReview
//!        → ReviewComplete → Published → NftCreated
//! ```
//!
//! Transitions are driven by the success of the corresponding pipeline
//! step. Failure at any stage keeps the stage unchanged and attaches an
//! `error` for display; there is no rollback transition. A failed
//! `ManuscriptSubmit` simply stays at `ManuscriptSubmit` awaiting a
//! manual re-attempt.
//!
//! ## Invariants
//!
//! - The stage index is monotonically non-decreasing for the lifetime of
//!   a tracker (until an explicit `reset`).
//! - `fail` never changes the stage, only the `error` field.
//! - A successful `advance` clears any previous `error`.
//! - `progress` is always in `0..=100` and non-decreasing across
//!   successful advances.

use std::fmt;

use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════════
// SUBMISSION STAGE
// ════════════════════════════════════════════════════════════════════════════════

/// Ordered stages of the manuscript lifecycle as shown to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubmissionStage {
    /// Checking that the wallet has a verified identity.
    CvCheck,
    /// Uploading / registering the researcher CV.
    CvUpload,
    /// Paying the fee and uploading the manuscript.
    ManuscriptSubmit,
    /// Peer review in progress.
    UnderReview,
    /// All assigned reviews returned.
    ReviewComplete,
    /// Manuscript published.
    Published,
    /// DOCI NFT minted for the publication.
    NftCreated,
}

impl SubmissionStage {
    /// All stages in canonical order.
    pub const ALL: [SubmissionStage; 7] = [
        SubmissionStage::CvCheck,
        SubmissionStage::CvUpload,
        SubmissionStage::ManuscriptSubmit,
        SubmissionStage::UnderReview,
        SubmissionStage::ReviewComplete,
        SubmissionStage::Published,
        SubmissionStage::NftCreated,
    ];

    /// Position of the stage in the canonical ordering.
    pub fn index(&self) -> usize {
        match self {
            SubmissionStage::CvCheck => 0,
            SubmissionStage::CvUpload => 1,
            SubmissionStage::ManuscriptSubmit => 2,
            SubmissionStage::UnderReview => 3,
            SubmissionStage::ReviewComplete => 4,
            SubmissionStage::Published => 5,
            SubmissionStage::NftCreated => 6,
        }
    }

    /// Progress percentage shown when this stage completes.
    pub fn progress_percent(&self) -> u8 {
        match self {
            SubmissionStage::CvCheck => 10,
            SubmissionStage::CvUpload => 25,
            SubmissionStage::ManuscriptSubmit => 45,
            SubmissionStage::UnderReview => 60,
            SubmissionStage::ReviewComplete => 75,
            SubmissionStage::Published => 90,
            SubmissionStage::NftCreated => 100,
        }
    }

    /// The stage after this one, or `None` at the end of the lifecycle.
    pub fn next(&self) -> Option<SubmissionStage> {
        SubmissionStage::ALL.get(self.index() + 1).copied()
    }
}

impl fmt::Display for SubmissionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SubmissionStage::CvCheck => "cv_check",
            SubmissionStage::CvUpload => "cv_upload",
            SubmissionStage::ManuscriptSubmit => "manuscript_submit",
            SubmissionStage::UnderReview => "under_review",
            SubmissionStage::ReviewComplete => "review_complete",
            SubmissionStage::Published => "published",
            SubmissionStage::NftCreated => "nft_created",
        };
        write!(f, "{}", name)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// WORKFLOW TRACKER
// ════════════════════════════════════════════════════════════════════════════════

/// Linear, forward-only progress state presented to the user.
///
/// Created at workflow start, mutated sequentially by the pipeline,
/// destroyed or `reset` on completion. Never rolled back automatically.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowTracker {
    stage: SubmissionStage,
    progress: u8,
    message: String,
    error: Option<String>,
}

impl WorkflowTracker {
    /// Creates a tracker positioned at `CvCheck` with zero progress.
    pub fn new() -> Self {
        Self {
            stage: SubmissionStage::CvCheck,
            progress: 0,
            message: String::new(),
            error: None,
        }
    }

    /// Advances to `stage` with a status message.
    ///
    /// Rejected with a descriptive message if `stage` is behind the
    /// current stage: the tracker never regresses. Advancing to the
    /// current stage is allowed (the message and progress refresh, e.g.
    /// on a manual retry of the same step). Any previous `error` is
    /// cleared on success.
    pub fn advance(
        &mut self,
        stage: SubmissionStage,
        message: impl Into<String>,
    ) -> Result<(), String> {
        if stage.index() < self.stage.index() {
            return Err(format!(
                "workflow cannot regress from {} to {}",
                self.stage, stage,
            ));
        }
        self.stage = stage;
        self.progress = stage.progress_percent();
        self.message = message.into();
        self.error = None;
        Ok(())
    }

    /// Records a failure of the current stage.
    ///
    /// The stage and progress are left untouched; only the error text is
    /// set. A later successful `advance` clears it.
    pub fn fail(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
    }

    /// Returns the tracker to its initial state.
    pub fn reset(&mut self) {
        *self = WorkflowTracker::new();
    }

    #[inline]
    pub fn stage(&self) -> SubmissionStage {
        self.stage
    }

    #[inline]
    pub fn progress(&self) -> u8 {
        self.progress
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[inline]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// `true` once the final stage completed.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.stage == SubmissionStage::NftCreated && self.progress == 100
    }
}

impl Default for WorkflowTracker {
    fn default() -> Self {
        Self::new()
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// TESTS
// ════════════════════════════════════════════════════════════════════════════════
