use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;
use crate::serialize;
use crate::types::address::ObjectId;
use crate::types::coin::Amount;
use crate::types::object::ObjectData;

/// Read-only view of the staking pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakePoolSnapshot {
    pub id: ObjectId,
    pub total_staked: Amount,
    pub reward_rate: u64,
    pub reward_treasury: Amount,
    pub user_stakes: StakeTable,
}

/// The per-user stake table held by the pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeTable {
    pub id: ObjectId,
    /// Number of users with a stake entry
    pub size: u64,
}

#[derive(Deserialize)]
struct RawPool {
    id: RawUid,
    #[serde(deserialize_with = "u64_from_json")]
    total_staked: u64,
    #[serde(deserialize_with = "u64_from_json")]
    reward_rate: u64,
    #[serde(deserialize_with = "u64_from_json")]
    reward_treasury: u64,
    user_stakes: RawTable,
}

#[derive(Deserialize)]
struct RawTable {
    fields: RawTableFields,
}

#[derive(Deserialize)]
struct RawTableFields {
    id: RawUid,
    #[serde(deserialize_with = "u64_from_json")]
    size: u64,
}

#[derive(Deserialize)]
struct RawUid {
    id: ObjectId,
}

/// Ledgers render u64 as decimal strings; accept plain numbers as well.
fn u64_from_json<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Num(u64),
        Str(String),
    }

    match Repr::deserialize(deserializer)? {
        Repr::Num(n) => Ok(n),
        Repr::Str(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

impl StakePoolSnapshot {
    /// Validate the shape of a fetched pool object
    pub fn from_object(object: &ObjectData) -> Result<Self, CoreError> {
        let content = object
            .content
            .as_ref()
            .ok_or_else(|| CoreError::MalformedObject("stake pool content not found".to_string()))?;
        let fields = content.fields().ok_or_else(|| {
            CoreError::MalformedObject("stake pool content has no fields".to_string())
        })?;

        let raw: RawPool = serialize::from_json_value(fields.clone())
            .map_err(|e| CoreError::MalformedObject(format!("invalid stake pool fields: {e}")))?;

        Ok(StakePoolSnapshot {
            id: raw.id.id,
            total_staked: raw.total_staked,
            reward_rate: raw.reward_rate,
            reward_treasury: raw.reward_treasury,
            user_stakes: StakeTable {
                id: raw.user_stakes.fields.id.id,
                size: raw.user_stakes.fields.size,
            },
        })
    }
}
