//! # Program-Derived Addresses
//!
//! Deterministic derivation of program-owned account addresses from
//! fixed seed tags plus a wallet or manuscript key.
//!
//! ## Derivation
//!
//! ```text
//! candidate(bump) = SHA-256( seed_1 ∥ … ∥ seed_n ∥ [bump] ∥ program_id ∥ MARKER )
//! ```
//!
//! Starting at bump 255 and counting down, the first candidate that does
//! NOT decompress to an ed25519 curve point is the derived address. An
//! on-curve candidate would correspond to a usable keypair, which would
//! let someone sign for a program-owned account.
//!
//! ## Seed Tags
//!
//! The on-chain program consumes five fixed byte-string tags, exposed
//! here as constants with typed helper constructors:
//! `"user"`, `"escrow"`, `"doci_registry"`, `"manuscript"`,
//! `"doci_manuscript"`.

use doci_common::ClientError;
use sha2::{Digest, Sha256};

use crate::address::Address;

/// Domain-separation marker appended after the program id.
const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// Maximum length of a single seed, bytes.
pub const MAX_SEED_LEN: usize = 32;

/// Maximum number of user seeds (excluding the bump).
pub const MAX_SEEDS: usize = 16;

// Seed tags consumed by the publishing program.
pub const USER_SEED: &[u8] = b"user";
pub const ESCROW_SEED: &[u8] = b"escrow";
pub const DOCI_REGISTRY_SEED: &[u8] = b"doci_registry";
pub const MANUSCRIPT_SEED: &[u8] = b"manuscript";
pub const DOCI_MANUSCRIPT_SEED: &[u8] = b"doci_manuscript";

// ════════════════════════════════════════════════════════════════════════════════
// DERIVATION
// ════════════════════════════════════════════════════════════════════════════════

/// Derives the candidate address for an explicit bump.
///
/// Fails only on seed shape violations (too many seeds, a seed longer
/// than [`MAX_SEED_LEN`]). The result may be on-curve; callers that need
/// a valid PDA use [`find_program_address`].
pub fn create_program_address(
    seeds: &[&[u8]],
    bump: u8,
    program_id: &Address,
) -> Result<Address, ClientError> {
    if seeds.len() > MAX_SEEDS {
        return Err(ClientError::ValidationError(format!(
            "too many PDA seeds: {} (max {})",
            seeds.len(),
            MAX_SEEDS,
        )));
    }
    let mut hasher = Sha256::new();
    for seed in seeds {
        if seed.len() > MAX_SEED_LEN {
            return Err(ClientError::ValidationError(format!(
                "PDA seed of {} bytes exceeds the {} byte limit",
                seed.len(),
                MAX_SEED_LEN,
            )));
        }
        hasher.update(seed);
    }
    hasher.update([bump]);
    hasher.update(program_id.as_bytes());
    hasher.update(PDA_MARKER);
    let digest: [u8; 32] = hasher.finalize().into();
    Ok(Address(digest))
}

/// Finds the canonical (highest-bump) off-curve address for the seeds.
///
/// Returns the address and the bump that produced it. Exhausting all
/// 256 bumps without an off-curve hit is cryptographically implausible
/// but still reported as an error rather than a panic.
pub fn find_program_address(
    seeds: &[&[u8]],
    program_id: &Address,
) -> Result<(Address, u8), ClientError> {
    for bump in (0..=255u8).rev() {
        let candidate = create_program_address(seeds, bump, program_id)?;
        if !candidate.is_on_curve() {
            return Ok((candidate, bump));
        }
    }
    Err(ClientError::ValidationError(
        "no off-curve program address exists for the given seeds".to_string(),
    ))
}

// ════════════════════════════════════════════════════════════════════════════════
// TYPED HELPERS
// ════════════════════════════════════════════════════════════════════════════════

/// `["user", wallet]` — the researcher registration account.
pub fn user_pda(program_id: &Address, wallet: &Address) -> Result<(Address, u8), ClientError> {
    find_program_address(&[USER_SEED, wallet.as_bytes()], program_id)
}

/// `["escrow"]` — the global submission-fee escrow account.
pub fn escrow_pda(program_id: &Address) -> Result<(Address, u8), ClientError> {
    find_program_address(&[ESCROW_SEED], program_id)
}

/// `["doci_registry"]` — the global DOCI registry account.
pub fn doci_registry_pda(program_id: &Address) -> Result<(Address, u8), ClientError> {
    find_program_address(&[DOCI_REGISTRY_SEED], program_id)
}

/// `["manuscript", manuscript_id]` — one manuscript's on-chain record.
pub fn manuscript_pda(
    program_id: &Address,
    manuscript_id: &[u8],
) -> Result<(Address, u8), ClientError> {
    find_program_address(&[MANUSCRIPT_SEED, manuscript_id], program_id)
}

/// `["doci_manuscript", manuscript_id]` — the minted DOCI record.
pub fn doci_manuscript_pda(
    program_id: &Address,
    manuscript_id: &[u8],
) -> Result<(Address, u8), ClientError> {
    find_program_address(&[DOCI_MANUSCRIPT_SEED, manuscript_id], program_id)
}

// ════════════════════════════════════════════════════════════════════════════════
// TESTS
// ════════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn program() -> Address {
        Address([0x11; 32])
    }

    #[test]
    fn test_find_is_deterministic() {
        let wallet = Address([0xAB; 32]);
        let a = user_pda(&program(), &wallet).expect("derive");
        let b = user_pda(&program(), &wallet).expect("derive");
        assert_eq!(a, b);
    }

    #[test]
    fn test_derived_address_is_off_curve() {
        let wallet = Address([0xCD; 32]);
        let (addr, _) = user_pda(&program(), &wallet).expect("derive");
        assert!(!addr.is_on_curve());
    }

    #[test]
    fn test_different_seeds_give_different_addresses() {
        let (a, _) = escrow_pda(&program()).expect("derive");
        let (b, _) = doci_registry_pda(&program()).expect("derive");
        assert_ne!(a, b);
    }

    #[test]
    fn test_different_programs_give_different_addresses() {
        let (a, _) = escrow_pda(&Address([1; 32])).expect("derive");
        let (b, _) = escrow_pda(&Address([2; 32])).expect("derive");
        assert_ne!(a, b);
    }

    #[test]
    fn test_bump_affects_candidate() {
        let a = create_program_address(&[ESCROW_SEED], 255, &program()).expect("derive");
        let b = create_program_address(&[ESCROW_SEED], 254, &program()).expect("derive");
        assert_ne!(a, b);
    }

    #[test]
    fn test_found_bump_reproduces_address() {
        let (addr, bump) = manuscript_pda(&program(), b"ms-0001").expect("derive");
        let again =
            create_program_address(&[MANUSCRIPT_SEED, b"ms-0001"], bump, &program())
                .expect("derive");
        assert_eq!(addr, again);
    }

    #[test]
    fn test_seed_too_long_rejected() {
        let long = [0u8; 33];
        let err = create_program_address(&[&long], 255, &program()).expect_err("reject");
        assert!(matches!(err, ClientError::ValidationError(_)));
    }

    #[test]
    fn test_too_many_seeds_rejected() {
        let seed: &[u8] = b"s";
        let seeds = [seed; 17];
        let err = find_program_address(&seeds, &program()).expect_err("reject");
        assert!(matches!(err, ClientError::ValidationError(_)));
    }

    #[test]
    fn test_manuscript_and_doci_manuscript_differ_for_same_id() {
        let (a, _) = manuscript_pda(&program(), b"ms-1").expect("derive");
        let (b, _) = doci_manuscript_pda(&program(), b"ms-1").expect("derive");
        assert_ne!(a, b);
    }
}
