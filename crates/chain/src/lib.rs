//! # DOCI Chain Crate
//!
//! Client-side chain plumbing: addresses, program-derived accounts,
//! instruction assembly, wallet signing and payment transaction
//! construction. Nothing here broadcasts — submission happens through
//! the backend's gas-sponsorship endpoint.
//!
//! ## Modules
//! - `address`: 32-byte accounts, base58, curve checks
//! - `pda`: program-derived address derivation and seed tags
//! - `instruction`: account metas and instruction builders
//! - `wallet`: signer trait, local wallet, test doubles
//! - `transaction`: payment intents, chain reader, transaction builder

pub mod address;
pub mod instruction;
pub mod pda;
pub mod transaction;
pub mod wallet;

pub use address::Address;
pub use instruction::{AccountMeta, Instruction};
pub use pda::find_program_address;
pub use transaction::{
    ChainReader, MockChainReader, PaymentIntent, PaymentTransactionBuilder, RpcChainReader,
    SignedTransaction, TransactionMessage,
};
pub use wallet::{DecliningSigner, LocalWallet, Signature, WalletSigner};
