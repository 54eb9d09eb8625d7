//! Canonical client-side data shapes.
//!
//! These are the internal, normalized forms. Wire DTOs (with the
//! backend's field spellings) live in the backend crate and are mapped
//! into these at the API boundary; malformed payloads are rejected
//! there, never silently defaulted.

use serde::{Deserialize, Serialize};

/// A manuscript submission built from form input.
///
/// Validated before use, consumed once by the uploader and then cleared.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionDraft {
    pub title: String,
    pub authors: Vec<String>,
    pub categories: Vec<String>,
    pub abstract_text: String,
    pub keywords: Vec<String>,
    pub file_name: String,
    /// Raw file content, held in memory for the single upload.
    pub file_bytes: Vec<u8>,
    pub mime_type: String,
}

/// Fields of the manual registration form (the no-CV-upload path).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualProfileForm {
    pub full_name: String,
    pub institution: String,
    pub profession: String,
    pub field: String,
    pub specialization: String,
    pub email: String,
}

/// Denormalized identity snapshot returned by a successful CV check.
///
/// Used to pre-fill later steps without another profile round-trip.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    pub name: String,
    pub institution: String,
    pub field: String,
    pub specialization: String,
    pub contact_email: String,
}

/// Result of the CV registration check for one wallet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CvStatus {
    pub has_cv: bool,
    pub can_submit_manuscripts: bool,
    pub user_info: Option<ProfileSnapshot>,
}

// ── Full researcher profile ─────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    pub year: Option<u16>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub role: String,
    pub institution: String,
    pub start_year: Option<u16>,
    pub end_year: Option<u16>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationEntry {
    pub title: String,
    pub venue: Option<String>,
    pub year: Option<u16>,
    pub doi: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwardEntry {
    pub name: String,
    pub year: Option<u16>,
}

/// Complete researcher profile as stored by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearcherProfile {
    pub wallet: String,
    pub full_name: String,
    pub institution: String,
    pub profession: String,
    pub field: String,
    pub specialization: String,
    pub email: String,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub publications: Vec<PublicationEntry>,
    #[serde(default)]
    pub awards: Vec<AwardEntry>,
    #[serde(default)]
    pub profile_photo: Option<String>,
}

/// Lifecycle status of a manuscript as reported by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManuscriptStatus {
    Submitted,
    UnderReview,
    ReviewComplete,
    Published,
    Rejected,
}

/// Normalized manuscript record. One canonical shape — the boundary
/// mapping resolves the backend's loose field spellings into this.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManuscriptRecord {
    pub id: String,
    pub title: String,
    pub author_wallet: String,
    pub categories: Vec<String>,
    pub status: ManuscriptStatus,
    /// Content identifier of the pinned manuscript file.
    pub cid: Option<String>,
    pub gateway_url: Option<String>,
    /// DOCI identifier once minted.
    pub doci: Option<String>,
    pub submitted_at: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_optional_sections_default_empty() {
        let json = r#"{
            "wallet": "w",
            "full_name": "A",
            "institution": "I",
            "profession": "P",
            "field": "F",
            "specialization": "S",
            "email": "a@b.co"
        }"#;
        let profile: ResearcherProfile = serde_json::from_str(json).expect("parse");
        assert!(profile.education.is_empty());
        assert!(profile.publications.is_empty());
        assert!(profile.profile_photo.is_none());
    }

    #[test]
    fn test_manuscript_status_wire_spelling() {
        let json = serde_json::to_string(&ManuscriptStatus::UnderReview).expect("ser");
        assert_eq!(json, "\"under_review\"");
        let back: ManuscriptStatus = serde_json::from_str("\"published\"").expect("de");
        assert_eq!(back, ManuscriptStatus::Published);
    }

    #[test]
    fn test_manuscript_record_roundtrip() {
        let record = ManuscriptRecord {
            id: "ms-1".to_string(),
            title: "T".to_string(),
            author_wallet: "w".to_string(),
            categories: vec!["bio".to_string()],
            status: ManuscriptStatus::Submitted,
            cid: Some("bafy123".to_string()),
            gateway_url: None,
            doci: None,
            submitted_at: Some(1_700_000_000),
        };
        let json = serde_json::to_string(&record).expect("ser");
        let back: ManuscriptRecord = serde_json::from_str(&json).expect("de");
        assert_eq!(record, back);
    }
}
