//! # Wallet Signing
//!
//! [`WalletSigner`] abstracts the wallet's signing capability behind an
//! object-safe async trait, so the production adapter and test doubles
//! are interchangeable via injection rather than file-level mocking.
//!
//! ## Security Notes
//!
//! - [`LocalWallet`] never exposes its secret key through any public
//!   method, `Debug`, or `Display`.
//! - Ed25519 signing is deterministic (RFC 8032): same key and message
//!   always produce the same signature.

use std::fmt;

use async_trait::async_trait;
use doci_common::ClientError;
use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::address::Address;

// ════════════════════════════════════════════════════════════════════════════════
// SIGNATURE
// ════════════════════════════════════════════════════════════════════════════════

/// A 64-byte ed25519 signature with base58 text form.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature(pub [u8; 64]);

impl Signature {
    pub fn to_base58(&self) -> String {
        bs58::encode(&self.0).into_string()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_base58())
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base58())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        let bytes = bs58::decode(&text)
            .into_vec()
            .map_err(D::Error::custom)?;
        let arr: [u8; 64] = bytes
            .try_into()
            .map_err(|_| D::Error::custom("signature must be 64 bytes"))?;
        Ok(Signature(arr))
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// SIGNER TRAIT
// ════════════════════════════════════════════════════════════════════════════════

/// The wallet's signing capability.
///
/// ## Contract
///
/// - Implementations MUST NOT mutate the message.
/// - Implementations MUST NOT retry internally; a declined signature
///   request surfaces as an error once.
/// - Signing a message is awaited: hardware and browser wallets prompt
///   the user.
#[async_trait]
pub trait WalletSigner: Send + Sync {
    /// The public address the signer controls.
    fn address(&self) -> Address;

    /// Signs arbitrary message bytes.
    async fn sign(&self, message: &[u8]) -> Result<Signature, ClientError>;
}

// ════════════════════════════════════════════════════════════════════════════════
// LOCAL WALLET
// ════════════════════════════════════════════════════════════════════════════════

/// In-process ed25519 wallet used by the CLI and by tests.
pub struct LocalWallet {
    signing_key: SigningKey,
    address: Address,
}

impl LocalWallet {
    /// Generates a fresh wallet from OS randomness.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        let address = Address(signing_key.verifying_key().to_bytes());
        Self {
            signing_key,
            address,
        }
    }

    /// Restores a wallet from a 32-byte secret.
    pub fn from_secret_bytes(secret: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(secret);
        let address = Address(signing_key.verifying_key().to_bytes());
        Self {
            signing_key,
            address,
        }
    }
}

impl fmt::Debug for LocalWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Secret key intentionally omitted.
        f.debug_struct("LocalWallet")
            .field("address", &self.address)
            .finish()
    }
}

#[async_trait]
impl WalletSigner for LocalWallet {
    fn address(&self) -> Address {
        self.address
    }

    async fn sign(&self, message: &[u8]) -> Result<Signature, ClientError> {
        Ok(Signature(self.signing_key.sign(message).to_bytes()))
    }
}

/// Test double that declines every signature request.
pub struct DecliningSigner {
    address: Address,
}

impl DecliningSigner {
    pub fn new(address: Address) -> Self {
        Self { address }
    }
}

#[async_trait]
impl WalletSigner for DecliningSigner {
    fn address(&self) -> Address {
        self.address
    }

    async fn sign(&self, _message: &[u8]) -> Result<Signature, ClientError> {
        Err(ClientError::PaymentRejected(
            "signature request declined".to_string(),
        ))
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// TESTS
// ════════════════════════════════════════════════════════════════════════════════
