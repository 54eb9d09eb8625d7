//! # Review API
//!
//! Reviewer assignment and review-status polling for a manuscript.

use std::sync::Arc;

use doci_common::ClientError;
use serde::Deserialize;

use crate::transport::BackendTransport;

/// One reviewer's standing on a manuscript.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEntry {
    pub reviewer: String,
    #[serde(default)]
    pub decision: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
}

/// Aggregate review state for a manuscript.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStatus {
    pub manuscript_id: String,
    #[serde(default)]
    pub reviews: Vec<ReviewEntry>,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Deserialize)]
struct AckDto {
    success: bool,
    #[serde(default)]
    message: String,
}

/// Client for the review endpoints.
#[derive(Clone)]
pub struct ReviewClient {
    transport: Arc<dyn BackendTransport>,
}

impl ReviewClient {
    pub fn new(transport: Arc<dyn BackendTransport>) -> Self {
        Self { transport }
    }

    /// `POST /reviews/manuscript/{id}/assign-reviewers`
    ///
    /// An empty reviewer list is rejected locally.
    pub async fn assign_reviewers(
        &self,
        manuscript_id: &str,
        reviewers: &[String],
    ) -> Result<(), ClientError> {
        if reviewers.is_empty() {
            return Err(ClientError::ValidationError(
                "at least one reviewer is required".to_string(),
            ));
        }
        let path = format!("/reviews/manuscript/{}/assign-reviewers", manuscript_id);
        let body = serde_json::json!({ "reviewers": reviewers });
        let resp = self
            .transport
            .post_json(&path, &body, None)
            .await?
            .ensure_success()?;
        let ack: AckDto = resp.json()?;
        if !ack.success {
            return Err(ClientError::NetworkError(ack.message));
        }
        Ok(())
    }

    /// `GET /reviews/manuscript/{id}/status`
    pub async fn review_status(&self, manuscript_id: &str) -> Result<ReviewStatus, ClientError> {
        let path = format!("/reviews/manuscript/{}/status", manuscript_id);
        let resp = self.transport.get(&path, None).await?.ensure_success()?;
        resp.json()
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// TESTS
// ════════════════════════════════════════════════════════════════════════════════
