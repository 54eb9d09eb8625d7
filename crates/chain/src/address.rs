//! # Account Addresses
//!
//! 32-byte chain account addresses with base58 text form and ed25519
//! curve checks.
//!
//! ## Validity Rules
//!
//! - Any 32-byte value is an [`Address`] (program-derived addresses are
//!   deliberately off-curve).
//! - A *wallet* address must additionally decompress to a valid ed25519
//!   point ([`Address::is_on_curve`]); [`Address::parse_wallet`] enforces
//!   both. The identity gate uses this to short-circuit invalid wallets
//!   without any network round-trip.
//!
//! ## Guarantees
//!
//! - DETERMINISTIC: parse/render round-trips byte-for-byte.
//! - NO PANIC: all failure paths return [`ClientError::InvalidWalletAddress`].

use std::fmt;

use doci_common::ClientError;
use ed25519_dalek::VerifyingKey;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ════════════════════════════════════════════════════════════════════════════════
// ADDRESS
// ════════════════════════════════════════════════════════════════════════════════

/// A 32-byte on-chain account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address(pub [u8; 32]);

impl Address {
    /// Parses a base58 string into an address. The decoded form must be
    /// exactly 32 bytes.
    pub fn parse(s: &str) -> Result<Self, ClientError> {
        let bytes = bs58::decode(s).into_vec().map_err(|_| {
            ClientError::InvalidWalletAddress {
                address: s.to_string(),
            }
        })?;
        let arr: [u8; 32] =
            bytes
                .try_into()
                .map_err(|_| ClientError::InvalidWalletAddress {
                    address: s.to_string(),
                })?;
        Ok(Address(arr))
    }

    /// Parses a base58 string and requires it to be a curve point, i.e.
    /// a key a wallet can actually hold. PDAs fail this check.
    pub fn parse_wallet(s: &str) -> Result<Self, ClientError> {
        let addr = Address::parse(s)?;
        if !addr.is_on_curve() {
            return Err(ClientError::InvalidWalletAddress {
                address: s.to_string(),
            });
        }
        Ok(addr)
    }

    /// `true` if the bytes decompress to a valid ed25519 point.
    pub fn is_on_curve(&self) -> bool {
        VerifyingKey::from_bytes(&self.0).is_ok()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Base58 text form.
    pub fn to_base58(&self) -> String {
        bs58::encode(&self.0).into_string()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_base58())
    }
}

impl From<[u8; 32]> for Address {
    fn from(bytes: [u8; 32]) -> Self {
        Address(bytes)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base58())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::parse(&s).map_err(D::Error::custom)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// TESTS
// ════════════════════════════════════════════════════════════════════════════════
