//! Manuscript submission command.
//!
//! `doci submit --file paper.pdf --title ... --author ... --abstract ...
//! --category ... [--keyword ...] --keypair key.hex [--session-token T]`
//!
//! Wires the full pipeline: verification gate → fee payment (signed
//! locally, gas-sponsored) → multipart upload. The secret key file
//! holds the wallet's 32-byte ed25519 seed, hex-encoded.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use doci_backend::{ManuscriptClient, ProfileClient, SponsorClient};
use doci_chain::{LocalWallet, PaymentTransactionBuilder, RpcChainReader, WalletSigner};
use doci_common::config::ClientConfig;
use doci_common::types::SubmissionDraft;
use doci_common::ClientError;
use doci_workflow::{
    FeeSchedule, PaymentAssembler, SubmissionPipeline, SubmissionUploader, VerificationGate,
};
use tracing::info;

use crate::context;

pub struct SubmitArgs {
    pub file: PathBuf,
    pub title: String,
    pub authors: Vec<String>,
    pub abstract_text: String,
    pub categories: Vec<String>,
    pub keywords: Vec<String>,
    pub keypair: Option<PathBuf>,
    pub session_token: Option<String>,
}

pub async fn handle_submit(config: &ClientConfig, args: SubmitArgs) -> Result<()> {
    // No keypair means no signer is attached to this session at all,
    // which is a different failure than a malformed keypair file.
    let keypair = args
        .keypair
        .as_deref()
        .ok_or(ClientError::WalletNotConnected)?;
    let wallet = load_wallet(keypair)?;
    let bearer = context::session_token(args.session_token);

    let file_bytes = fs::read(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let file_name = args
        .file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("manuscript.pdf")
        .to_string();
    let draft = SubmissionDraft {
        title: args.title,
        authors: args.authors,
        categories: args.categories,
        abstract_text: args.abstract_text,
        keywords: args.keywords,
        mime_type: mime_for(&file_name).to_string(),
        file_name,
        file_bytes,
    };

    let pipeline = build_pipeline(config)?;
    info!(wallet = %wallet.address(), "starting submission");
    let receipt = pipeline
        .submit(&wallet, bearer.as_deref(), draft)
        .await?;

    println!("Manuscript submitted.");
    println!("  ID:      {}", receipt.manuscript_id);
    println!("  CID:     {}", receipt.cid);
    println!("  Gateway: {}", receipt.gateway_url);
    println!("Status: under review.");
    Ok(())
}

fn build_pipeline(config: &ClientConfig) -> Result<SubmissionPipeline> {
    let transport = context::transport(config)?;
    let gate = Arc::new(VerificationGate::new(Arc::new(ProfileClient::new(
        transport.clone(),
    ))));
    let reader = RpcChainReader::new(
        config.rpc_endpoint.clone(),
        Duration::from_secs(config.request_timeout_secs),
    )?;
    let payment = PaymentAssembler::new(
        PaymentTransactionBuilder::new(Box::new(reader)),
        SponsorClient::new(transport.clone()),
        FeeSchedule::from_config(config)?,
    );
    let uploader = SubmissionUploader::new(ManuscriptClient::new(transport));
    Ok(SubmissionPipeline::new(gate, payment, uploader))
}

fn load_wallet(path: &Path) -> Result<LocalWallet> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading keypair {}", path.display()))?;
    let bytes = hex::decode(text.trim()).context("keypair file is not valid hex")?;
    let secret: [u8; 32] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| anyhow::anyhow!("keypair must decode to exactly 32 bytes"))?;
    Ok(LocalWallet::from_secret_bytes(&secret))
}

fn mime_for(file_name: &str) -> &'static str {
    match Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("pdf") | None => "application/pdf",
        Some(other) => {
            // Let server-side validation produce the message for exotic
            // extensions; locally we only special-case the common ones.
            match other {
                "doc" => "application/msword",
                "docx" => {
                    "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
                }
                _ => "application/octet-stream",
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// TESTS
// ════════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_mime_for_common_extensions() {
        assert_eq!(mime_for("paper.pdf"), "application/pdf");
        assert_eq!(mime_for("paper.PDF"), "application/pdf");
        assert_eq!(mime_for("paper.doc"), "application/msword");
        assert_eq!(mime_for("paper.zip"), "application/octet-stream");
    }

    #[test]
    fn test_load_wallet_from_hex_seed() {
        let mut file = tempfile::NamedTempFile::new().expect("tmp");
        write!(file, "{}", hex::encode([7u8; 32])).expect("write");
        let wallet = load_wallet(file.path()).expect("wallet");
        let again = load_wallet(file.path()).expect("wallet");
        assert_eq!(wallet.address(), again.address(), "derivation is stable");
    }

    #[test]
    fn test_load_wallet_rejects_short_seed() {
        let mut file = tempfile::NamedTempFile::new().expect("tmp");
        write!(file, "{}", hex::encode([7u8; 16])).expect("write");
        assert!(load_wallet(file.path()).is_err());
    }

    #[test]
    fn test_load_wallet_rejects_non_hex() {
        let mut file = tempfile::NamedTempFile::new().expect("tmp");
        write!(file, "not-hex-at-all").expect("write");
        assert!(load_wallet(file.path()).is_err());
    }

    #[tokio::test]
    async fn test_missing_keypair_surfaces_wallet_not_connected() {
        let config = ClientConfig::default();
        let args = SubmitArgs {
            file: PathBuf::from("paper.pdf"),
            title: "T".into(),
            authors: vec!["A".into()],
            abstract_text: "Abs".into(),
            categories: vec!["cs".into()],
            keywords: vec![],
            keypair: None,
            session_token: None,
        };
        let err = handle_submit(&config, args).await.expect_err("no signer");
        assert_eq!(
            err.downcast_ref::<ClientError>(),
            Some(&ClientError::WalletNotConnected)
        );
    }
}
