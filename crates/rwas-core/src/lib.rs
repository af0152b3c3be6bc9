//! RWAS Core - Ledger data model for the tokenized real-estate marketplace
//!
//! This crate provides addresses, coin objects, the programmable transaction
//! representation handed to wallets for signing, and the registry of
//! deployed contract identifiers.

pub mod crypto;
pub mod error;
pub mod serialize;
pub mod types;

pub use crypto::{hash_blake3, Digest};
pub use error::CoreError;
pub use types::*;
