//! # Response Normalization
//!
//! The backend's manuscript payloads are loosely shaped: the same
//! logical field arrives under different names depending on which
//! service produced the record (`author` vs `authorWallet`, `cid` vs
//! `ipfsHash`, …). This module is the single mapping from that loose
//! JSON into the canonical [`ManuscriptRecord`].
//!
//! Malformed payloads are REJECTED with a descriptive error. There is
//! deliberately no `"Unknown"` fallback for required fields — silently
//! defaulting hides backend contract drift.

use doci_common::types::{ManuscriptRecord, ManuscriptStatus};
use doci_common::ClientError;
use serde_json::Value;

fn malformed(detail: &str) -> ClientError {
    ClientError::NetworkError(format!("malformed manuscript record: {}", detail))
}

fn first_string(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| value.get(*k).and_then(Value::as_str))
        .map(str::to_string)
        .find(|s| !s.is_empty())
}

/// Parses the backend's status spellings into [`ManuscriptStatus`].
fn parse_status(raw: &str) -> Result<ManuscriptStatus, ClientError> {
    match raw {
        "submitted" | "pending" => Ok(ManuscriptStatus::Submitted),
        "under_review" | "in_review" | "reviewing" => Ok(ManuscriptStatus::UnderReview),
        "review_complete" | "reviewed" => Ok(ManuscriptStatus::ReviewComplete),
        "published" => Ok(ManuscriptStatus::Published),
        "rejected" => Ok(ManuscriptStatus::Rejected),
        other => Err(malformed(&format!("unknown status {:?}", other))),
    }
}

/// Maps one loose manuscript JSON object into the canonical record.
///
/// Required: an id, a title, an author wallet, a parseable status.
/// Optional: categories, cid, gateway URL, DOCI, submission timestamp.
pub fn normalize_manuscript(value: &Value) -> Result<ManuscriptRecord, ClientError> {
    let id = first_string(value, &["id", "_id", "manuscriptId"])
        .ok_or_else(|| malformed("missing id"))?;
    let title =
        first_string(value, &["title"]).ok_or_else(|| malformed("missing title"))?;
    let author_wallet = first_string(value, &["author", "authorWallet", "wallet"])
        .ok_or_else(|| malformed("missing author wallet"))?;
    let status_raw = first_string(value, &["status"])
        .ok_or_else(|| malformed("missing status"))?;
    let status = parse_status(&status_raw)?;

    let categories = match value.get("categories") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        // Some records carry a single category string.
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        _ => Vec::new(),
    };

    let submitted_at = value
        .get("submittedAt")
        .or_else(|| value.get("submitted_at"))
        .and_then(Value::as_u64);

    Ok(ManuscriptRecord {
        id,
        title,
        author_wallet,
        categories,
        status,
        cid: first_string(value, &["cid", "ipfsHash"]),
        gateway_url: first_string(value, &["gatewayUrl", "gateway_url"]),
        doci: first_string(value, &["doci", "dociId"]),
        submitted_at,
    })
}

/// Normalizes a list payload, rejecting the whole response if any
/// element is malformed.
pub fn normalize_manuscripts(value: &Value) -> Result<Vec<ManuscriptRecord>, ClientError> {
    let items = value
        .as_array()
        .or_else(|| value.get("manuscripts").and_then(Value::as_array))
        .ok_or_else(|| malformed("expected an array"))?;
    items.iter().map(normalize_manuscript).collect()
}

// ════════════════════════════════════════════════════════════════════════════════
// TESTS
// ════════════════════════════════════════════════════════════════════════════════
