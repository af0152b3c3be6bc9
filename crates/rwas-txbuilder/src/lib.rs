//! RWAS Transaction Builder - Unsigned transactions for staking and yield tokens
//!
//! This crate turns a user's request (stake, mint, purchase) into an
//! unsigned programmable transaction: it checks the spendable balance,
//! consolidates the user's coin objects, splits off the exact amount and
//! appends the contract call. It also exposes the read-only pool and
//! user-stake views.

pub mod builder;
pub mod error;
mod spend;
mod views;

pub use builder::{BuilderConfig, TransactionBuilder};
pub use error::BuildError;
pub use spend::MAX_CONSOLIDATED_COINS;
