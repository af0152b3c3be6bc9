use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid address {0:?}: expected 0x followed by 64 hex digits")]
    InvalidAddress(String),

    #[error("Invalid object id: {0:?}")]
    InvalidObjectId(String),

    #[error("Invalid coin type: {0:?}")]
    InvalidCoinType(String),

    #[error("Invalid amount {input:?}: {reason}")]
    InvalidAmount { input: String, reason: String },

    #[error("Malformed object: {0}")]
    MalformedObject(String),

    #[error("Transaction too large: {0}")]
    TransactionTooLarge(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),
}
