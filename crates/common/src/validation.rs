//! # Client-Side Input Validation
//!
//! File, email and required-field checks performed BEFORE any network
//! call. A rejected input never reaches the backend.
//!
//! ## File Rules
//!
//! | Upload | Allowed MIME types | Size ceiling |
//! |--------|--------------------|--------------|
//! | Manuscript | `application/pdf` | 10 MiB |
//! | CV | `application/pdf`, `application/msword`, docx | 10 MiB |
//! | Profile photo | `image/jpeg`, `image/png`, `image/webp` | 5 MiB |
//!
//! Rules are data-driven via [`FileRule`] so limits live in one place.

use crate::error::ClientError;
use crate::types::{ManualProfileForm, SubmissionDraft};

/// One mebibyte.
const MIB: u64 = 1024 * 1024;

// ════════════════════════════════════════════════════════════════════════════════
// FILE RULES
// ════════════════════════════════════════════════════════════════════════════════

/// Size and MIME constraints for one category of upload.
#[derive(Clone, Copy, Debug)]
pub struct FileRule {
    /// Human label used in rejection messages ("manuscript", "CV", ...).
    pub label: &'static str,
    /// Inclusive upper bound in bytes.
    pub max_bytes: u64,
    /// Accepted MIME types, lowercase.
    pub allowed_mime: &'static [&'static str],
}

/// Manuscripts are PDF only, at most 10 MiB.
pub const MANUSCRIPT_RULE: FileRule = FileRule {
    label: "manuscript",
    max_bytes: 10 * MIB,
    allowed_mime: &["application/pdf"],
};

/// CVs accept PDF and Word formats, at most 10 MiB.
pub const CV_RULE: FileRule = FileRule {
    label: "CV",
    max_bytes: 10 * MIB,
    allowed_mime: &[
        "application/pdf",
        "application/msword",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ],
};

/// Profile photos accept common raster formats, at most 5 MiB.
pub const PHOTO_RULE: FileRule = FileRule {
    label: "profile photo",
    max_bytes: 5 * MIB,
    allowed_mime: &["image/jpeg", "image/png", "image/webp"],
};

impl FileRule {
    /// Checks a candidate file against this rule.
    ///
    /// Order: emptiness, then MIME, then size — so the message names the
    /// first actionable problem.
    pub fn check(&self, mime_type: &str, size_bytes: u64) -> Result<(), ClientError> {
        if size_bytes == 0 {
            return Err(ClientError::ValidationError(format!(
                "{} file is empty",
                self.label,
            )));
        }
        let mime = mime_type.to_ascii_lowercase();
        if !self.allowed_mime.contains(&mime.as_str()) {
            return Err(ClientError::ValidationError(format!(
                "{} file type {} is not allowed (accepted: {})",
                self.label,
                mime_type,
                self.allowed_mime.join(", "),
            )));
        }
        if size_bytes > self.max_bytes {
            return Err(ClientError::ValidationError(format!(
                "{} file is {} bytes, exceeding the {} MiB limit",
                self.label,
                size_bytes,
                self.max_bytes / MIB,
            )));
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// FIELD CHECKS
// ════════════════════════════════════════════════════════════════════════════════

/// Syntactic email check: one `@`, non-empty local part, domain with a
/// dot and no spaces. Deliberately shallow — deliverability is the
/// backend's problem.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.contains(char::is_whitespace) {
        return false;
    }
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    if domain.contains('@') {
        return false;
    }
    // Domain needs an interior dot.
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

fn require(field: &str, value: &str) -> Result<(), ClientError> {
    if value.trim().is_empty() {
        Err(ClientError::ValidationError(format!(
            "{} is required",
            field,
        )))
    } else {
        Ok(())
    }
}

/// Validates a manuscript draft: required fields plus the manuscript
/// file rule. First failure wins.
pub fn validate_draft(draft: &SubmissionDraft) -> Result<(), ClientError> {
    require("title", &draft.title)?;
    if draft.authors.iter().all(|a| a.trim().is_empty()) {
        return Err(ClientError::ValidationError(
            "at least one author is required".to_string(),
        ));
    }
    if draft.categories.is_empty() {
        return Err(ClientError::ValidationError(
            "at least one category is required".to_string(),
        ));
    }
    require("abstract", &draft.abstract_text)?;
    MANUSCRIPT_RULE.check(&draft.mime_type, draft.file_bytes.len() as u64)
}

/// Validates the manual registration profile form.
pub fn validate_manual_profile(form: &ManualProfileForm) -> Result<(), ClientError> {
    require("full name", &form.full_name)?;
    require("institution", &form.institution)?;
    require("profession", &form.profession)?;
    require("field", &form.field)?;
    require("specialization", &form.specialization)?;
    if !is_valid_email(&form.email) {
        return Err(ClientError::ValidationError(format!(
            "email address {} is not valid",
            form.email,
        )));
    }
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════════
// TESTS
// ════════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn draft_with_file(mime: &str, size: usize) -> SubmissionDraft {
        SubmissionDraft {
            title: "P-adic Methods in Peer Review".to_string(),
            authors: vec!["A. Researcher".to_string()],
            categories: vec!["mathematics".to_string()],
            abstract_text: "We study things.".to_string(),
            keywords: vec!["p-adic".to_string()],
            file_name: "paper.pdf".to_string(),
            file_bytes: vec![0u8; size],
            mime_type: mime.to_string(),
        }
    }

    fn valid_form() -> ManualProfileForm {
        ManualProfileForm {
            full_name: "Ada Lovelace".to_string(),
            institution: "Analytical Engine Institute".to_string(),
            profession: "Mathematician".to_string(),
            field: "Computing".to_string(),
            specialization: "Programs".to_string(),
            email: "ada@example.org".to_string(),
        }
    }

    // ──────────────────────────────────────────────────────────────────
    // FILE RULES
    // ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_manuscript_pdf_under_limit_accepted() {
        assert!(MANUSCRIPT_RULE.check("application/pdf", 5 * MIB).is_ok());
    }

    #[test]
    fn test_manuscript_at_exact_limit_accepted() {
        assert!(MANUSCRIPT_RULE.check("application/pdf", 10 * MIB).is_ok());
    }

    #[test]
    fn test_manuscript_12_mib_rejected_with_size_message() {
        let err = MANUSCRIPT_RULE
            .check("application/pdf", 12 * MIB)
            .expect_err("must reject");
        match err {
            ClientError::ValidationError(msg) => {
                assert!(msg.contains("10 MiB"), "msg: {}", msg);
            }
            other => panic!("expected ValidationError, got {:?}", other),
        }
    }

    #[test]
    fn test_manuscript_wrong_mime_rejected() {
        let err = MANUSCRIPT_RULE
            .check("application/zip", 1024)
            .expect_err("must reject");
        assert!(err.to_string().contains("not allowed"));
    }

    #[test]
    fn test_mime_check_is_case_insensitive() {
        assert!(MANUSCRIPT_RULE.check("Application/PDF", 1024).is_ok());
    }

    #[test]
    fn test_empty_file_rejected() {
        let err = MANUSCRIPT_RULE
            .check("application/pdf", 0)
            .expect_err("must reject");
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_cv_accepts_docx() {
        let docx =
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
        assert!(CV_RULE.check(docx, MIB).is_ok());
    }

    #[test]
    fn test_photo_5_mib_limit() {
        assert!(PHOTO_RULE.check("image/png", 5 * MIB).is_ok());
        assert!(PHOTO_RULE.check("image/png", 5 * MIB + 1).is_err());
    }

    #[test]
    fn test_photo_rejects_pdf() {
        assert!(PHOTO_RULE.check("application/pdf", 1024).is_err());
    }

    // ──────────────────────────────────────────────────────────────────
    // EMAIL
    // ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_valid_emails() {
        for email in [
            "a@b.co",
            "first.last@university.edu",
            "x+tag@sub.domain.org",
        ] {
            assert!(is_valid_email(email), "should accept {}", email);
        }
    }

    #[test]
    fn test_invalid_emails() {
        for email in [
            "",
            "plain",
            "@nodomain.com",
            "nolocal@",
            "two@@signs.com",
            "spaces in@mail.com",
            "nodot@domain",
            "dot@.leading",
            "dot@trailing.",
        ] {
            assert!(!is_valid_email(email), "should reject {:?}", email);
        }
    }

    // ──────────────────────────────────────────────────────────────────
    // DRAFT VALIDATION
    // ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_valid_draft_accepted() {
        let draft = draft_with_file("application/pdf", 1024);
        assert!(validate_draft(&draft).is_ok());
    }

    #[test]
    fn test_draft_missing_title_rejected() {
        let mut draft = draft_with_file("application/pdf", 1024);
        draft.title = "  ".to_string();
        let err = validate_draft(&draft).expect_err("must reject");
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn test_draft_without_authors_rejected() {
        let mut draft = draft_with_file("application/pdf", 1024);
        draft.authors = vec!["".to_string()];
        assert!(validate_draft(&draft).is_err());
    }

    #[test]
    fn test_draft_without_categories_rejected() {
        let mut draft = draft_with_file("application/pdf", 1024);
        draft.categories.clear();
        assert!(validate_draft(&draft).is_err());
    }

    #[test]
    fn test_draft_oversized_file_rejected_before_fields_pass() {
        let draft = draft_with_file("application/pdf", (12 * MIB) as usize);
        let err = validate_draft(&draft).expect_err("must reject");
        assert!(matches!(err, ClientError::ValidationError(_)));
    }

    // ──────────────────────────────────────────────────────────────────
    // MANUAL PROFILE VALIDATION
    // ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_valid_manual_profile_accepted() {
        assert!(validate_manual_profile(&valid_form()).is_ok());
    }

    #[test]
    fn test_manual_profile_each_required_field() {
        for field in 0..5 {
            let mut form = valid_form();
            match field {
                0 => form.full_name.clear(),
                1 => form.institution.clear(),
                2 => form.profession.clear(),
                3 => form.field.clear(),
                _ => form.specialization.clear(),
            }
            assert!(
                validate_manual_profile(&form).is_err(),
                "field {} should be required",
                field,
            );
        }
    }

    #[test]
    fn test_manual_profile_bad_email_rejected() {
        let mut form = valid_form();
        form.email = "not-an-email".to_string();
        let err = validate_manual_profile(&form).expect_err("must reject");
        assert!(err.to_string().contains("email"));
    }
}
