use rwas_core::{Amount, CoinType, CoreError};
use rwas_ledger::QueryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Invalid address: {0:?}")]
    InvalidAddress(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Insufficient {coin_type} balance: requested {requested}, available {available}")]
    InsufficientFunds {
        coin_type: CoinType,
        requested: Amount,
        available: Amount,
    },

    #[error("Unknown yield token: {0}")]
    UnknownYieldToken(String),

    #[error("Too many coin objects to consolidate: have {count}, at most {max}")]
    TooManyCoinObjects { count: usize, max: usize },

    #[error("Malformed stake pool data: {0}")]
    MalformedPoolData(String),

    #[error("View call failed: {0}")]
    ViewCall(String),

    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}
