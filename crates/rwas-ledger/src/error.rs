use rwas_core::ObjectId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Ledger query service unreachable: {0}")]
    Unreachable(String),

    #[error("Malformed ledger response: {0}")]
    Malformed(String),

    #[error("Object not found: {0}")]
    ObjectNotFound(ObjectId),
}
