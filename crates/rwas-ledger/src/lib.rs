//! RWAS Ledger - Query access to the ledger
//!
//! This crate defines the query service the transaction builder depends
//! on, the paginated coin inventory built on top of it, and an in-memory
//! ledger used by tests and offline tooling.

pub mod error;
pub mod inventory;
pub mod memory;
pub mod service;

pub use error::QueryError;
pub use inventory::{coin_stream, list_coin_objects, spendable_balance, DEFAULT_PAGE_SIZE};
pub use memory::{LedgerCall, LedgerSnapshot, MemoryLedger, OwnedCoin, ViewFixture};
pub use service::{Balance, CommandResult, DevInspectResults, LedgerQueryService, Page, ReturnValue};
