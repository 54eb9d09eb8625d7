//! # Instruction Assembly
//!
//! Account-meta model and builders for the two instruction kinds the
//! payment flow needs: associated-token-account creation and a token
//! transfer into the escrow's token account.
//!
//! The standard program ids are embedded as byte constants (base58 forms
//! in the comments) so no runtime parsing of known-good values happens.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::pda::find_program_address;
use doci_common::ClientError;

// ════════════════════════════════════════════════════════════════════════════════
// WELL-KNOWN PROGRAM IDS
// ════════════════════════════════════════════════════════════════════════════════

/// Token program, `TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA`.
pub const TOKEN_PROGRAM_ID: Address = Address([
    0x06, 0xdd, 0xf6, 0xe1, 0xd7, 0x65, 0xa1, 0x93, 0xd9, 0xcb, 0xe1, 0x46, 0xce, 0xeb, 0x79,
    0xac, 0x1c, 0xb4, 0x85, 0xed, 0x5f, 0x5b, 0x37, 0x91, 0x3a, 0x8c, 0xf5, 0x85, 0x7e, 0xff,
    0x00, 0xa9,
]);

/// Associated-token program, `ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL`.
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Address = Address([
    0x8c, 0x97, 0x25, 0x8f, 0x4e, 0x24, 0x89, 0xf1, 0xbb, 0x3d, 0x10, 0x29, 0x14, 0x8e, 0x0d,
    0x83, 0x0b, 0x5a, 0x13, 0x99, 0xda, 0xff, 0x10, 0x84, 0x04, 0x8e, 0x7b, 0xd8, 0xdb, 0xe9,
    0xf8, 0x59,
]);

/// System program, `11111111111111111111111111111111`.
pub const SYSTEM_PROGRAM_ID: Address = Address([0u8; 32]);

/// Token-program instruction tag for `Transfer`.
const TOKEN_TRANSFER_TAG: u8 = 3;

// ════════════════════════════════════════════════════════════════════════════════
// MODEL
// ════════════════════════════════════════════════════════════════════════════════

/// One account an instruction touches, with its access flags.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountMeta {
    pub pubkey: Address,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    pub fn writable(pubkey: Address, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: true,
        }
    }

    pub fn readonly(pubkey: Address, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: false,
        }
    }
}

/// A single program invocation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub program_id: Address,
    pub accounts: Vec<AccountMeta>,
    /// Program-specific payload bytes.
    #[serde(with = "serde_bytes_b58")]
    pub data: Vec<u8>,
}

/// Instruction data rides as base58 text in the JSON form.
mod serde_bytes_b58 {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&bs58::encode(data).into_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(d)?;
        bs58::decode(&text).into_vec().map_err(D::Error::custom)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// ASSOCIATED TOKEN ACCOUNTS
// ════════════════════════════════════════════════════════════════════════════════

/// Derives the associated token account of `wallet` for `mint`:
/// the PDA of `[wallet, token_program, mint]` under the
/// associated-token program.
pub fn associated_token_address(
    wallet: &Address,
    mint: &Address,
) -> Result<Address, ClientError> {
    let (addr, _) = find_program_address(
        &[
            wallet.as_bytes(),
            TOKEN_PROGRAM_ID.as_bytes(),
            mint.as_bytes(),
        ],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )?;
    Ok(addr)
}

/// Builds the idempotent create-ATA instruction: `funder` pays rent,
/// `owner` receives the account for `mint`.
pub fn create_associated_token_account(
    funder: &Address,
    owner: &Address,
    mint: &Address,
) -> Result<Instruction, ClientError> {
    let ata = associated_token_address(owner, mint)?;
    Ok(Instruction {
        program_id: ASSOCIATED_TOKEN_PROGRAM_ID,
        accounts: vec![
            AccountMeta::writable(*funder, true),
            AccountMeta::writable(ata, false),
            AccountMeta::readonly(*owner, false),
            AccountMeta::readonly(*mint, false),
            AccountMeta::readonly(SYSTEM_PROGRAM_ID, false),
            AccountMeta::readonly(TOKEN_PROGRAM_ID, false),
        ],
        data: vec![],
    })
}

/// Builds a token transfer of `amount_minor_units` between two token
/// accounts, signed by `authority`. Zero amounts are rejected here so an
/// empty transfer never reaches the wallet for signature.
pub fn token_transfer(
    source: &Address,
    destination: &Address,
    authority: &Address,
    amount_minor_units: u64,
) -> Result<Instruction, ClientError> {
    if amount_minor_units == 0 {
        return Err(ClientError::ValidationError(
            "transfer amount must be positive".to_string(),
        ));
    }
    let mut data = Vec::with_capacity(9);
    data.push(TOKEN_TRANSFER_TAG);
    data.extend_from_slice(&amount_minor_units.to_le_bytes());
    Ok(Instruction {
        program_id: TOKEN_PROGRAM_ID,
        accounts: vec![
            AccountMeta::writable(*source, false),
            AccountMeta::writable(*destination, false),
            AccountMeta::readonly(*authority, true),
        ],
        data,
    })
}

// ════════════════════════════════════════════════════════════════════════════════
// TESTS
// ════════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_id_base58_forms() {
        assert_eq!(
            TOKEN_PROGRAM_ID.to_base58(),
            "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA"
        );
        assert_eq!(
            ASSOCIATED_TOKEN_PROGRAM_ID.to_base58(),
            "ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL"
        );
        assert_eq!(
            SYSTEM_PROGRAM_ID.to_base58(),
            "11111111111111111111111111111111"
        );
    }

    #[test]
    fn test_ata_derivation_deterministic_and_owner_sensitive() {
        let wallet_a = Address([1; 32]);
        let wallet_b = Address([2; 32]);
        let mint = Address([9; 32]);
        let a1 = associated_token_address(&wallet_a, &mint).expect("derive");
        let a2 = associated_token_address(&wallet_a, &mint).expect("derive");
        let b = associated_token_address(&wallet_b, &mint).expect("derive");
        assert_eq!(a1, a2);
        assert_ne!(a1, b);
    }

    #[test]
    fn test_create_ata_account_order() {
        let funder = Address([1; 32]);
        let owner = Address([2; 32]);
        let mint = Address([3; 32]);
        let ix = create_associated_token_account(&funder, &owner, &mint).expect("build");
        assert_eq!(ix.program_id, ASSOCIATED_TOKEN_PROGRAM_ID);
        assert_eq!(ix.accounts.len(), 6);
        assert_eq!(ix.accounts[0].pubkey, funder);
        assert!(ix.accounts[0].is_signer);
        assert!(ix.accounts[0].is_writable);
        assert_eq!(
            ix.accounts[1].pubkey,
            associated_token_address(&owner, &mint).expect("derive")
        );
        assert!(!ix.accounts[1].is_signer);
        assert!(ix.data.is_empty());
    }

    #[test]
    fn test_transfer_data_encoding() {
        let ix = token_transfer(
            &Address([1; 32]),
            &Address([2; 32]),
            &Address([3; 32]),
            50_000_000,
        )
        .expect("build");
        assert_eq!(ix.program_id, TOKEN_PROGRAM_ID);
        assert_eq!(ix.data.len(), 9);
        assert_eq!(ix.data[0], TOKEN_TRANSFER_TAG);
        assert_eq!(
            u64::from_le_bytes(ix.data[1..9].try_into().expect("8 bytes")),
            50_000_000
        );
    }

    #[test]
    fn test_transfer_authority_is_sole_signer() {
        let authority = Address([3; 32]);
        let ix = token_transfer(&Address([1; 32]), &Address([2; 32]), &authority, 1)
            .expect("build");
        let signers: Vec<_> = ix.accounts.iter().filter(|a| a.is_signer).collect();
        assert_eq!(signers.len(), 1);
        assert_eq!(signers[0].pubkey, authority);
        assert!(!signers[0].is_writable);
    }

    #[test]
    fn test_zero_transfer_rejected() {
        let err = token_transfer(&Address([1; 32]), &Address([2; 32]), &Address([3; 32]), 0)
            .expect_err("reject");
        assert!(matches!(err, ClientError::ValidationError(_)));
    }

    #[test]
    fn test_instruction_json_roundtrip() {
        let ix = token_transfer(&Address([1; 32]), &Address([2; 32]), &Address([3; 32]), 42)
            .expect("build");
        let json = serde_json::to_string(&ix).expect("ser");
        let back: Instruction = serde_json::from_str(&json).expect("de");
        assert_eq!(ix, back);
    }
}
