use std::sync::Arc;

use async_trait::async_trait;
use rwas_core::{Address, CoinObject, CoinType, ObjectData, ObjectId, PendingTransaction};
use serde::{Deserialize, Serialize};

use crate::error::QueryError;

/// Aggregate balance of one coin type for one owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub coin_type: CoinType,
    pub coin_object_count: u64,
    pub total_balance: u128,
}

/// One page of a cursor-paginated listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub next_cursor: Option<String>,
    pub has_next_page: bool,
}

/// A value returned by a simulated command, with its type tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnValue {
    pub bytes: Vec<u8>,
    pub type_tag: String,
}

impl ReturnValue {
    pub fn u64(value: u64) -> Self {
        ReturnValue {
            bytes: value.to_le_bytes().to_vec(),
            type_tag: "u64".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult {
    pub return_values: Vec<ReturnValue>,
}

/// Outcome of a simulated (no effect, unsigned) transaction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevInspectResults {
    /// Execution error reported by the ledger, if any
    pub error: Option<String>,
    /// Per-command results, in command order
    pub results: Vec<CommandResult>,
}

/// Read access to the ledger.
///
/// Implementations perform no retries; every failure surfaces as a
/// [`QueryError`] and the caller decides what to do.
#[async_trait]
pub trait LedgerQueryService: Send + Sync {
    /// Total balance of `coin_type` owned by `owner`
    async fn get_balance(&self, owner: &Address, coin_type: &CoinType) -> Result<Balance, QueryError>;

    /// One page of `owner`'s coin objects of `coin_type`, starting after `cursor`
    async fn get_coins(
        &self,
        owner: &Address,
        coin_type: &CoinType,
        cursor: Option<String>,
        limit: usize,
    ) -> Result<Page<CoinObject>, QueryError>;

    /// Fetch an object with its content
    async fn get_object(&self, id: &ObjectId) -> Result<ObjectData, QueryError>;

    /// Execute `tx` without committing effects or requiring a signature
    async fn dev_inspect(
        &self,
        sender: &Address,
        tx: &PendingTransaction,
    ) -> Result<DevInspectResults, QueryError>;
}

#[async_trait]
impl<T: LedgerQueryService + ?Sized> LedgerQueryService for Arc<T> {
    async fn get_balance(&self, owner: &Address, coin_type: &CoinType) -> Result<Balance, QueryError> {
        (**self).get_balance(owner, coin_type).await
    }

    async fn get_coins(
        &self,
        owner: &Address,
        coin_type: &CoinType,
        cursor: Option<String>,
        limit: usize,
    ) -> Result<Page<CoinObject>, QueryError> {
        (**self).get_coins(owner, coin_type, cursor, limit).await
    }

    async fn get_object(&self, id: &ObjectId) -> Result<ObjectData, QueryError> {
        (**self).get_object(id).await
    }

    async fn dev_inspect(
        &self,
        sender: &Address,
        tx: &PendingTransaction,
    ) -> Result<DevInspectResults, QueryError> {
        (**self).dev_inspect(sender, tx).await
    }
}
