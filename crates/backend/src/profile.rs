//! # Profile & CV API
//!
//! Typed client for the identity endpoints: CV status check, CV parsing,
//! manual profile registration, profile fetch/update and photo upload.
//!
//! One verification contract only: CV status is keyed by wallet address
//! (`/manuscripts/check-cv-status/{wallet}`). The session-token variant
//! that used to exist alongside it is not modeled; bearer tokens are
//! used solely where the endpoint requires them (see `manuscripts`).

use std::sync::Arc;

use doci_common::types::{CvStatus, ManualProfileForm, ProfileSnapshot, ResearcherProfile};
use doci_common::validation::{CV_RULE, PHOTO_RULE};
use doci_common::ClientError;
use serde::Deserialize;
use tracing::info;

use crate::transport::{BackendTransport, MultipartField};

// ════════════════════════════════════════════════════════════════════════════════
// WIRE SHAPES
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CvStatusDto {
    success: bool,
    #[serde(default, rename = "hasCV")]
    has_cv: bool,
    #[serde(default)]
    can_submit_manuscripts: bool,
    #[serde(default)]
    user_info: Option<UserInfoDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserInfoDto {
    name: String,
    institution: String,
    #[serde(default)]
    field: String,
    #[serde(default)]
    specialization: String,
    #[serde(default)]
    email: String,
}

impl From<UserInfoDto> for ProfileSnapshot {
    fn from(dto: UserInfoDto) -> Self {
        ProfileSnapshot {
            name: dto.name,
            institution: dto.institution,
            field: dto.field,
            specialization: dto.specialization,
            contact_email: dto.email,
        }
    }
}

/// Identity fields extracted from an uploaded CV document.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedCv {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub profession: String,
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub specialization: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
struct AckDto {
    success: bool,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PhotoDto {
    success: bool,
    #[serde(default)]
    profile_photo: String,
    #[serde(default)]
    message: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// CLIENT
// ════════════════════════════════════════════════════════════════════════════════

/// Where the caller lands after successful profile registration.
pub const POST_REGISTRATION_REDIRECT: &str = "/your-profile";

/// Client for the profile/CV endpoints.
#[derive(Clone)]
pub struct ProfileClient {
    transport: Arc<dyn BackendTransport>,
}

impl ProfileClient {
    pub fn new(transport: Arc<dyn BackendTransport>) -> Self {
        Self { transport }
    }

    /// `GET /manuscripts/check-cv-status/{wallet}`
    ///
    /// A 404 means "no CV on file" and is a normal `has_cv = false`
    /// outcome, not a transport error. Idempotent for a fixed backend
    /// state.
    pub async fn check_cv_status(&self, wallet: &str) -> Result<CvStatus, ClientError> {
        let path = format!("/manuscripts/check-cv-status/{}", wallet);
        let resp = self.transport.get(&path, None).await?;
        if resp.status == 404 {
            return Ok(CvStatus {
                has_cv: false,
                can_submit_manuscripts: false,
                user_info: None,
            });
        }
        let resp = resp.ensure_success()?;
        let dto: CvStatusDto = resp.json()?;
        if !dto.success {
            return Err(ClientError::NetworkError(
                "cv status check reported failure".to_string(),
            ));
        }
        Ok(CvStatus {
            has_cv: dto.has_cv,
            can_submit_manuscripts: dto.can_submit_manuscripts,
            user_info: dto.user_info.map(ProfileSnapshot::from),
        })
    }

    /// `POST /cv/parse-cv` (multipart: file + wallet).
    ///
    /// The CV file rule (PDF/Word, ≤ 10 MiB) is enforced here, before
    /// the network call.
    pub async fn parse_cv(
        &self,
        wallet: &str,
        file_name: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<ParsedCv, ClientError> {
        CV_RULE.check(mime_type, bytes.len() as u64)?;
        let fields = vec![
            MultipartField::file("file", file_name, mime_type, bytes),
            MultipartField::text("wallet", wallet),
        ];
        let resp = self
            .transport
            .post_multipart("/cv/parse-cv", fields, None)
            .await?
            .ensure_success()?;
        info!(wallet, "cv parsed");
        resp.json()
    }

    /// `POST /parse-cv/manual-profile`
    ///
    /// Returns the backend's acknowledgement message. Field validation
    /// happens in the caller (`doci_common::validation`) so the form is
    /// never sent half-filled.
    pub async fn submit_manual_profile(
        &self,
        wallet: &str,
        form: &ManualProfileForm,
    ) -> Result<String, ClientError> {
        let body = serde_json::json!({
            "wallet": wallet,
            "fullName": form.full_name,
            "institution": form.institution,
            "profession": form.profession,
            "field": form.field,
            "specialization": form.specialization,
            "email": form.email,
        });
        let resp = self
            .transport
            .post_json("/parse-cv/manual-profile", &body, None)
            .await?
            .ensure_success()?;
        let ack: AckDto = resp.json()?;
        if !ack.success {
            return Err(ClientError::ValidationError(ack.message));
        }
        Ok(ack.message)
    }

    /// `GET /parse-cv/user/profile/{wallet}`
    pub async fn fetch_profile(&self, wallet: &str) -> Result<ResearcherProfile, ClientError> {
        let path = format!("/parse-cv/user/profile/{}", wallet);
        let resp = self.transport.get(&path, None).await?.ensure_success()?;
        resp.json()
    }

    /// `PUT /parse-cv/user/profile/{wallet}`
    pub async fn update_profile(
        &self,
        wallet: &str,
        profile: &ResearcherProfile,
    ) -> Result<ResearcherProfile, ClientError> {
        let path = format!("/parse-cv/user/profile/{}", wallet);
        let body = serde_json::to_value(profile)
            .map_err(|e| ClientError::ValidationError(format!("profile encode: {}", e)))?;
        let resp = self
            .transport
            .put_json(&path, &body, None)
            .await?
            .ensure_success()?;
        resp.json()
    }

    /// `POST /parse-cv/user/profile-photo/{wallet}` (multipart).
    ///
    /// Returns the stored photo URL. The photo rule (raster image,
    /// ≤ 5 MiB) is enforced before the network call.
    pub async fn upload_profile_photo(
        &self,
        wallet: &str,
        file_name: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ClientError> {
        PHOTO_RULE.check(mime_type, bytes.len() as u64)?;
        let path = format!("/parse-cv/user/profile-photo/{}", wallet);
        let fields = vec![MultipartField::file("photo", file_name, mime_type, bytes)];
        let resp = self
            .transport
            .post_multipart(&path, fields, None)
            .await?
            .ensure_success()?;
        let dto: PhotoDto = resp.json()?;
        if !dto.success {
            return Err(ClientError::NetworkError(dto.message));
        }
        Ok(dto.profile_photo)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// TESTS
// ════════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;

    fn client_with(mock: Arc<MockTransport>) -> ProfileClient {
        ProfileClient::new(mock)
    }

    #[tokio::test]
    async fn test_check_cv_status_verified() {
        let mock = Arc::new(MockTransport::new());
        mock.push_response(
            200,
            r#"{
                "success": true,
                "hasCV": true,
                "canSubmitManuscripts": true,
                "userInfo": {
                    "name": "Dr. A",
                    "institution": "Inst",
                    "field": "Biology",
                    "specialization": "Genomics",
                    "email": "a@inst.edu"
                }
            }"#,
        );
        let status = client_with(mock.clone())
            .check_cv_status("wallet1")
            .await
            .expect("status");
        assert!(status.has_cv);
        assert!(status.can_submit_manuscripts);
        let info = status.user_info.expect("snapshot");
        assert_eq!(info.name, "Dr. A");
        assert_eq!(info.contact_email, "a@inst.edu");

        let calls = mock.calls();
        assert_eq!(calls[0].path, "/manuscripts/check-cv-status/wallet1");
    }

    #[tokio::test]
    async fn test_check_cv_status_404_means_no_cv() {
        let mock = Arc::new(MockTransport::new());
        mock.push_response(404, r#"{"error":"not found"}"#);
        let status = client_with(mock)
            .check_cv_status("abc123")
            .await
            .expect("benign");
        assert!(!status.has_cv);
        assert!(!status.can_submit_manuscripts);
        assert!(status.user_info.is_none());
    }

    #[tokio::test]
    async fn test_check_cv_status_idempotent_for_fixed_state() {
        let mock = Arc::new(MockTransport::new());
        let body = r#"{"success":true,"hasCV":true,"canSubmitManuscripts":false}"#;
        mock.push_response(200, body);
        mock.push_response(200, body);
        let client = client_with(mock);
        let a = client.check_cv_status("w").await.expect("a");
        let b = client.check_cv_status("w").await.expect("b");
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_parse_cv_rejects_oversized_file_without_network() {
        let mock = Arc::new(MockTransport::new());
        let result = client_with(mock.clone())
            .parse_cv("w", "cv.pdf", "application/pdf", vec![0u8; 11 * 1024 * 1024])
            .await;
        assert!(matches!(result, Err(ClientError::ValidationError(_))));
        assert!(mock.calls().is_empty(), "no network call expected");
    }

    #[tokio::test]
    async fn test_parse_cv_rejects_wrong_mime_without_network() {
        let mock = Arc::new(MockTransport::new());
        let result = client_with(mock.clone())
            .parse_cv("w", "cv.zip", "application/zip", vec![0u8; 100])
            .await;
        assert!(result.is_err());
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_manual_profile_success_returns_message() {
        let mock = Arc::new(MockTransport::new());
        mock.push_response(200, r#"{"success":true,"message":"profile created"}"#);
        let form = ManualProfileForm {
            full_name: "A".into(),
            institution: "I".into(),
            profession: "P".into(),
            field: "F".into(),
            specialization: "S".into(),
            email: "a@b.co".into(),
        };
        let msg = client_with(mock)
            .submit_manual_profile("w", &form)
            .await
            .expect("ok");
        assert_eq!(msg, "profile created");
        assert_eq!(POST_REGISTRATION_REDIRECT, "/your-profile");
    }

    #[tokio::test]
    async fn test_manual_profile_backend_rejection_surfaces_message() {
        let mock = Arc::new(MockTransport::new());
        mock.push_response(200, r#"{"success":false,"message":"duplicate wallet"}"#);
        let form = ManualProfileForm {
            full_name: "A".into(),
            institution: "I".into(),
            profession: "P".into(),
            field: "F".into(),
            specialization: "S".into(),
            email: "a@b.co".into(),
        };
        let err = client_with(mock)
            .submit_manual_profile("w", &form)
            .await
            .expect_err("rejected");
        assert_eq!(err, ClientError::ValidationError("duplicate wallet".into()));
    }

    #[tokio::test]
    async fn test_profile_roundtrip_field_for_field() {
        // What was submitted must come back unchanged through the
        // fetch contract.
        let profile = ResearcherProfile {
            wallet: "w".into(),
            full_name: "Ada".into(),
            institution: "AEI".into(),
            profession: "Mathematician".into(),
            field: "Computing".into(),
            specialization: "Programs".into(),
            email: "ada@aei.org".into(),
            education: vec![],
            experience: vec![],
            publications: vec![],
            awards: vec![],
            profile_photo: None,
        };
        let body = serde_json::to_string(&profile).expect("ser");

        let mock = Arc::new(MockTransport::new());
        mock.push_response(200, body);
        let fetched = client_with(mock)
            .fetch_profile("w")
            .await
            .expect("fetch");
        assert_eq!(fetched, profile);
    }

    #[tokio::test]
    async fn test_photo_upload_enforces_5_mib() {
        let mock = Arc::new(MockTransport::new());
        let result = client_with(mock.clone())
            .upload_profile_photo("w", "me.png", "image/png", vec![0u8; 6 * 1024 * 1024])
            .await;
        assert!(matches!(result, Err(ClientError::ValidationError(_))));
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_photo_upload_success_returns_url() {
        let mock = Arc::new(MockTransport::new());
        mock.push_response(200, r#"{"success":true,"profilePhoto":"https://cdn/x.png"}"#);
        let url = client_with(mock)
            .upload_profile_photo("w", "me.png", "image/png", vec![0u8; 1024])
            .await
            .expect("ok");
        assert_eq!(url, "https://cdn/x.png");
    }

    #[tokio::test]
    async fn test_rate_limited_maps_to_taxonomy() {
        let mock = Arc::new(MockTransport::new());
        mock.push_response(429, "slow down");
        let err = client_with(mock)
            .fetch_profile("w")
            .await
            .expect_err("limited");
        assert_eq!(err, ClientError::RateLimited);
    }
}
