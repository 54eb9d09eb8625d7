//! # Payment Transaction Assembly
//!
//! Builds the signed fee-transfer transaction that moves the submission
//! fee from the researcher's wallet to the escrow's token account.
//!
//! ## Pipeline Position
//!
//! ```text
//! PaymentIntent
//!      │
//!      ▼
//! PaymentTransactionBuilder::assemble()
//!      │
//!      ├─ query both associated token accounts (ChainReader)
//!      ├─ prepend create-ATA instructions for any that are absent
//!      ├─ append the token transfer
//!      ├─ set fee payer, fetch a fresh blockhash
//!      └─ request the wallet signature
//!      │
//!      ▼
//! SignedTransaction (serialized base64, unsent)
//! ```
//!
//! ## No Side Effects
//!
//! Nothing here touches chain state. The signed transaction is handed to
//! the sponsorship endpoint, which re-signs as fee payer and broadcasts;
//! until then the transfer does not exist on-chain.
//!
//! ## No Implicit Retry
//!
//! One attempt per call. RPC failures surface as
//! [`ClientError::NetworkError`]; a declined wallet prompt surfaces as
//! [`ClientError::PaymentRejected`]. Retries are the user's choice.

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use doci_common::ClientError;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::address::Address;
use crate::instruction::{
    associated_token_address, create_associated_token_account, token_transfer, Instruction,
};
use crate::wallet::{Signature, WalletSigner};

// ════════════════════════════════════════════════════════════════════════════════
// PAYMENT INTENT
// ════════════════════════════════════════════════════════════════════════════════

/// Ephemeral description of one fee payment. Exists only for the
/// duration of a single transaction build.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaymentIntent {
    /// Fee in the token's minor unit (tokens × 10^decimals).
    pub amount_minor_units: u64,
    /// The researcher's wallet, also the transfer authority.
    pub payer: Address,
    /// The fixed escrow account receiving the fee.
    pub payee_escrow: Address,
    /// Mint of the fee token.
    pub mint: Address,
}

impl PaymentIntent {
    /// Amount must be positive; zero-fee submissions do not exist.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.amount_minor_units == 0 {
            return Err(ClientError::ValidationError(
                "payment amount must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// CHAIN READER
// ════════════════════════════════════════════════════════════════════════════════

/// Read-only chain queries the builder needs. Object-safe so tests run
/// against [`MockChainReader`] with no RPC endpoint.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Whether an account exists (has been created) on-chain.
    async fn account_exists(&self, address: &Address) -> Result<bool, ClientError>;

    /// A fresh recent blockhash for transaction construction.
    async fn latest_blockhash(&self) -> Result<String, ClientError>;
}

/// JSON-RPC implementation over HTTP.
pub struct RpcChainReader {
    endpoint: String,
    client: reqwest::Client,
}

impl RpcChainReader {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::NetworkError(format!("http client: {}", e)))?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    async fn call(&self, method: &str, params: serde_json::Value) -> Result<serde_json::Value, ClientError> {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::NetworkError(format!("{}: {}", method, e)))?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(ClientError::NetworkError(format!(
                "{} failed: {} {}",
                method, status, text,
            )));
        }
        let value: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| ClientError::NetworkError(format!("{}: bad json: {}", method, e)))?;
        if let Some(err) = value.get("error") {
            return Err(ClientError::NetworkError(format!(
                "{} rpc error: {}",
                method, err,
            )));
        }
        Ok(value)
    }
}

#[async_trait]
impl ChainReader for RpcChainReader {
    async fn account_exists(&self, address: &Address) -> Result<bool, ClientError> {
        let value = self
            .call(
                "getAccountInfo",
                serde_json::json!([address.to_base58(), {"encoding": "base64"}]),
            )
            .await?;
        Ok(!value["result"]["value"].is_null())
    }

    async fn latest_blockhash(&self) -> Result<String, ClientError> {
        let value = self
            .call("getLatestBlockhash", serde_json::json!([]))
            .await?;
        value["result"]["value"]["blockhash"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                ClientError::NetworkError("getLatestBlockhash: missing blockhash".to_string())
            })
    }
}

/// Mock reader for tests: a set of existing accounts, a fixed blockhash,
/// and an optional failure switch.
pub struct MockChainReader {
    existing: Mutex<HashSet<Address>>,
    blockhash: String,
    fail: Mutex<bool>,
}

impl MockChainReader {
    pub fn new(blockhash: impl Into<String>) -> Self {
        Self {
            existing: Mutex::new(HashSet::new()),
            blockhash: blockhash.into(),
            fail: Mutex::new(false),
        }
    }

    /// Marks an account as existing on-chain.
    pub fn add_account(&self, address: Address) {
        if let Ok(mut set) = self.existing.lock() {
            set.insert(address);
        }
    }

    /// Makes every subsequent query fail with a network error.
    pub fn set_failing(&self, failing: bool) {
        if let Ok(mut f) = self.fail.lock() {
            *f = failing;
        }
    }

    fn check_failing(&self) -> Result<(), ClientError> {
        let failing = self
            .fail
            .lock()
            .map_err(|e| ClientError::NetworkError(format!("mutex poisoned: {}", e)))?;
        if *failing {
            return Err(ClientError::NetworkError("mock rpc down".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ChainReader for MockChainReader {
    async fn account_exists(&self, address: &Address) -> Result<bool, ClientError> {
        self.check_failing()?;
        let set = self
            .existing
            .lock()
            .map_err(|e| ClientError::NetworkError(format!("mutex poisoned: {}", e)))?;
        Ok(set.contains(address))
    }

    async fn latest_blockhash(&self) -> Result<String, ClientError> {
        self.check_failing()?;
        Ok(self.blockhash.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// TRANSACTION
// ════════════════════════════════════════════════════════════════════════════════

/// The signed payload: instruction list plus fee payer and blockhash.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionMessage {
    pub fee_payer: Address,
    pub recent_blockhash: String,
    pub instructions: Vec<Instruction>,
}

impl TransactionMessage {
    /// Canonical byte encoding of the message — the bytes the wallet
    /// signs. serde_json emits struct fields in declaration order, so
    /// the encoding is deterministic for a given message.
    pub fn encode(&self) -> Result<Vec<u8>, ClientError> {
        serde_json::to_vec(self)
            .map_err(|e| ClientError::ValidationError(format!("message encode: {}", e)))
    }
}

/// A signed, unsent transaction. The sponsor completes fee-payer
/// signing server-side, so exactly one client signature is attached.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub message: TransactionMessage,
    pub signer: Address,
    pub signature: Signature,
}

impl SignedTransaction {
    /// Base64 wire form handed to the sponsorship endpoint.
    pub fn to_base64(&self) -> Result<String, ClientError> {
        let bytes = serde_json::to_vec(self)
            .map_err(|e| ClientError::ValidationError(format!("tx encode: {}", e)))?;
        Ok(BASE64.encode(bytes))
    }

    pub fn from_base64(text: &str) -> Result<Self, ClientError> {
        let bytes = BASE64
            .decode(text)
            .map_err(|e| ClientError::ValidationError(format!("tx decode: {}", e)))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ClientError::ValidationError(format!("tx decode: {}", e)))
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// BUILDER
// ════════════════════════════════════════════════════════════════════════════════

/// Assembles and signs the fee-transfer transaction.
pub struct PaymentTransactionBuilder {
    reader: Box<dyn ChainReader>,
}

impl PaymentTransactionBuilder {
    #[must_use]
    pub fn new(reader: Box<dyn ChainReader>) -> Self {
        Self { reader }
    }

    /// Builds the transfer for `intent` and obtains the wallet
    /// signature.
    ///
    /// Missing associated token accounts (either party's) get a
    /// create-ATA instruction prepended, funded by the payer. The
    /// returned transaction is signed but NOT submitted.
    pub async fn assemble(
        &self,
        intent: &PaymentIntent,
        signer: &dyn WalletSigner,
    ) -> Result<SignedTransaction, ClientError> {
        intent.validate()?;

        let payer_ata = associated_token_address(&intent.payer, &intent.mint)?;
        let escrow_ata = associated_token_address(&intent.payee_escrow, &intent.mint)?;

        let mut instructions: Vec<Instruction> = Vec::with_capacity(3);
        if !self.reader.account_exists(&payer_ata).await? {
            debug!(ata = %payer_ata, "payer token account missing, creating");
            instructions.push(create_associated_token_account(
                &intent.payer,
                &intent.payer,
                &intent.mint,
            )?);
        }
        if !self.reader.account_exists(&escrow_ata).await? {
            debug!(ata = %escrow_ata, "escrow token account missing, creating");
            instructions.push(create_associated_token_account(
                &intent.payer,
                &intent.payee_escrow,
                &intent.mint,
            )?);
        }
        instructions.push(token_transfer(
            &payer_ata,
            &escrow_ata,
            &intent.payer,
            intent.amount_minor_units,
        )?);

        let recent_blockhash = self.reader.latest_blockhash().await?;
        let message = TransactionMessage {
            fee_payer: intent.payer,
            recent_blockhash,
            instructions,
        };

        let signature = signer.sign(&message.encode()?).await?;
        Ok(SignedTransaction {
            message,
            signer: signer.address(),
            signature,
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// TESTS
// ════════════════════════════════════════════════════════════════════════════════
