//! # Payment Assembly
//!
//! Builds the submission-fee token transfer, obtains the wallet
//! signature, and hands the serialized transaction to the gas sponsor
//! for co-signing and broadcast. The author signs but never pays gas.
//!
//! The sponsor's signature is treated as settlement proof; there is no
//! client-side finality re-check afterwards. The idempotency key rides
//! in the sponsorship metadata so the backend can reconcile a retried
//! attempt.

use doci_backend::{SponsorClient, SponsoredTransactionType};
use doci_chain::{Address, PaymentIntent, PaymentTransactionBuilder, WalletSigner};
use doci_common::config::ClientConfig;
use doci_common::ClientError;
use tracing::info;

// ════════════════════════════════════════════════════════════════════════════════
// FEE SCHEDULE
// ════════════════════════════════════════════════════════════════════════════════

/// Where the fee goes and how much it is, resolved from configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeeSchedule {
    pub escrow: Address,
    pub mint: Address,
    pub amount_minor_units: u64,
}

impl FeeSchedule {
    /// Parses the configured escrow and mint addresses. The escrow is a
    /// program-derived account, so plain `parse` (no curve requirement)
    /// is correct here.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Ok(Self {
            escrow: Address::parse(&config.escrow_address)?,
            mint: Address::parse(&config.fee_token_mint)?,
            amount_minor_units: config.fee_minor_units(),
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// ASSEMBLER
// ════════════════════════════════════════════════════════════════════════════════

/// Assembles, signs and sponsors the submission-fee payment.
pub struct PaymentAssembler {
    builder: PaymentTransactionBuilder,
    sponsor: SponsorClient,
    schedule: FeeSchedule,
}

impl PaymentAssembler {
    pub fn new(
        builder: PaymentTransactionBuilder,
        sponsor: SponsorClient,
        schedule: FeeSchedule,
    ) -> Self {
        Self {
            builder,
            sponsor,
            schedule,
        }
    }

    /// Settles the submission fee for `signer`'s wallet.
    ///
    /// Returns the sponsor's settlement signature. One attempt only;
    /// on failure nothing has been uploaded yet, so the caller can
    /// safely retry the whole submission with a new idempotency key.
    pub async fn settle_fee(
        &self,
        signer: &dyn WalletSigner,
        bearer: Option<&str>,
        idempotency_key: &str,
    ) -> Result<String, ClientError> {
        let intent = PaymentIntent {
            amount_minor_units: self.schedule.amount_minor_units,
            payer: signer.address(),
            payee_escrow: self.schedule.escrow,
            mint: self.schedule.mint,
        };
        let signed = self.builder.assemble(&intent, signer).await?;
        let serialized = signed.to_base64()?;

        let metadata = serde_json::json!({
            "wallet": signer.address().to_base58(),
            "idempotencyKey": idempotency_key,
        });
        let result = self
            .sponsor
            .sponsor_transaction(
                bearer,
                &serialized,
                SponsoredTransactionType::ManuscriptSubmission,
                metadata,
            )
            .await?;
        info!(
            signature = %result.signature,
            amount_minor_units = self.schedule.amount_minor_units,
            "submission fee settled"
        );
        Ok(result.signature)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// TESTS
// ════════════════════════════════════════════════════════════════════════════════
