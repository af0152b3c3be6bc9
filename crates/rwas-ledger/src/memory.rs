use std::collections::BTreeMap;

use async_trait::async_trait;
use rwas_core::{Address, Amount, CoinObject, CoinType, ObjectData, ObjectId, PendingTransaction};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::QueryError;
use crate::inventory::DEFAULT_PAGE_SIZE;
use crate::service::{Balance, CommandResult, DevInspectResults, LedgerQueryService, Page, ReturnValue};

/// A coin object together with its owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedCoin {
    pub owner: Address,
    #[serde(flatten)]
    pub coin: CoinObject,
}

/// Canned answer for a simulated view call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewFixture {
    pub module: String,
    pub function: String,
    #[serde(default)]
    pub return_values: Vec<ReturnValue>,
    /// When set, the simulated call reports this execution error
    #[serde(default)]
    pub error: Option<String>,
}

/// Serializable contents of a [`MemoryLedger`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    #[serde(default)]
    pub coins: Vec<OwnedCoin>,
    #[serde(default)]
    pub objects: Vec<ObjectData>,
    #[serde(default)]
    pub views: Vec<ViewFixture>,
}

/// A query issued against a [`MemoryLedger`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCall {
    Balance { owner: Address, coin_type: CoinType },
    Coins { owner: Address, coin_type: CoinType, cursor: Option<String> },
    Object(ObjectId),
    DevInspect { sender: Address },
}

/// In-process ledger answering queries from memory.
///
/// Coins are listed in insertion order. Every query is recorded so callers
/// can assert which queries a build issued.
#[derive(Debug)]
pub struct MemoryLedger {
    coins: BTreeMap<Address, Vec<CoinObject>>,
    objects: BTreeMap<ObjectId, ObjectData>,
    views: BTreeMap<(String, String), ViewFixture>,
    max_page_size: usize,
    unreachable: bool,
    fail_on_coin_page: Option<usize>,
    calls: Mutex<Vec<LedgerCall>>,
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLedger {
    pub fn new() -> Self {
        MemoryLedger {
            coins: BTreeMap::new(),
            objects: BTreeMap::new(),
            views: BTreeMap::new(),
            max_page_size: DEFAULT_PAGE_SIZE,
            unreachable: false,
            fail_on_coin_page: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Self {
        let mut ledger = MemoryLedger::new();
        for owned in snapshot.coins {
            ledger.insert_coin(owned.owner, owned.coin);
        }
        for object in snapshot.objects {
            ledger.insert_object(object);
        }
        for view in snapshot.views {
            ledger.set_view(view);
        }
        ledger
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            coins: self
                .coins
                .iter()
                .flat_map(|(owner, coins)| {
                    coins.iter().map(|coin| OwnedCoin {
                        owner: *owner,
                        coin: coin.clone(),
                    })
                })
                .collect(),
            objects: self.objects.values().cloned().collect(),
            views: self.views.values().cloned().collect(),
        }
    }

    /// Largest page the ledger will serve regardless of the requested limit
    pub fn with_max_page_size(mut self, max_page_size: usize) -> Self {
        self.max_page_size = max_page_size.max(1);
        self
    }

    pub fn insert_coin(&mut self, owner: Address, coin: CoinObject) {
        self.coins.entry(owner).or_default().push(coin);
    }

    /// Give `owner` a new coin object with a fresh id
    pub fn mint_coin(&mut self, owner: Address, coin_type: &CoinType, balance: Amount) -> ObjectId {
        let id = ObjectId::random();
        self.insert_coin(
            owner,
            CoinObject {
                coin_type: coin_type.clone(),
                coin_object_id: id,
                version: 1,
                balance,
            },
        );
        id
    }

    pub fn insert_object(&mut self, object: ObjectData) {
        self.objects.insert(object.object_id, object);
    }

    pub fn set_view(&mut self, view: ViewFixture) {
        self.views
            .insert((view.module.clone(), view.function.clone()), view);
    }

    /// Make every query fail as if the service could not be reached
    pub fn set_unreachable(&mut self, unreachable: bool) {
        self.unreachable = unreachable;
    }

    /// Fail the n-th coin page request (1-based, counted across listings)
    pub fn fail_on_coin_page(&mut self, page: usize) {
        self.fail_on_coin_page = Some(page);
    }

    /// All queries issued so far, oldest first
    pub async fn calls(&self) -> Vec<LedgerCall> {
        self.calls.lock().await.clone()
    }

    async fn record(&self, call: LedgerCall) -> Result<usize, QueryError> {
        let mut calls = self.calls.lock().await;
        calls.push(call);
        if self.unreachable {
            return Err(QueryError::Unreachable("memory ledger offline".to_string()));
        }
        Ok(calls
            .iter()
            .filter(|c| matches!(c, LedgerCall::Coins { .. }))
            .count())
    }

    fn coins_of<'a>(&'a self, owner: &Address, coin_type: &'a CoinType) -> impl Iterator<Item = &'a CoinObject> + 'a {
        self.coins
            .get(owner)
            .into_iter()
            .flatten()
            .filter(move |coin| coin.coin_type == *coin_type)
    }
}

#[async_trait]
impl LedgerQueryService for MemoryLedger {
    async fn get_balance(&self, owner: &Address, coin_type: &CoinType) -> Result<Balance, QueryError> {
        self.record(LedgerCall::Balance {
            owner: *owner,
            coin_type: coin_type.clone(),
        })
        .await?;

        let (count, total) = self
            .coins_of(owner, coin_type)
            .fold((0u64, 0u128), |(count, total), coin| {
                (count + 1, total + coin.balance as u128)
            });

        Ok(Balance {
            coin_type: coin_type.clone(),
            coin_object_count: count,
            total_balance: total,
        })
    }

    async fn get_coins(
        &self,
        owner: &Address,
        coin_type: &CoinType,
        cursor: Option<String>,
        limit: usize,
    ) -> Result<Page<CoinObject>, QueryError> {
        let page_number = self
            .record(LedgerCall::Coins {
                owner: *owner,
                coin_type: coin_type.clone(),
                cursor: cursor.clone(),
            })
            .await?;

        if self.fail_on_coin_page == Some(page_number) {
            return Err(QueryError::Unreachable(format!("coin page {page_number} failed")));
        }

        let coins: Vec<&CoinObject> = self.coins_of(owner, coin_type).collect();
        let start = match cursor {
            None => 0,
            Some(cursor) => {
                let id = ObjectId::parse(&cursor)
                    .map_err(|_| QueryError::Malformed(format!("invalid cursor {cursor:?}")))?;
                coins
                    .iter()
                    .position(|coin| coin.coin_object_id == id)
                    .map(|pos| pos + 1)
                    .ok_or_else(|| QueryError::Malformed(format!("unknown cursor {cursor:?}")))?
            }
        };

        let limit = limit.clamp(1, self.max_page_size);
        let end = (start + limit).min(coins.len());
        let data: Vec<CoinObject> = coins[start..end].iter().map(|coin| (*coin).clone()).collect();
        let next_cursor = data.last().map(|coin| coin.coin_object_id.to_string());

        debug!("Serving coins {}..{} of {} for {}", start, end, coins.len(), owner);

        Ok(Page {
            data,
            next_cursor,
            has_next_page: end < coins.len(),
        })
    }

    async fn get_object(&self, id: &ObjectId) -> Result<ObjectData, QueryError> {
        self.record(LedgerCall::Object(*id)).await?;
        self.objects
            .get(id)
            .cloned()
            .ok_or(QueryError::ObjectNotFound(*id))
    }

    async fn dev_inspect(
        &self,
        sender: &Address,
        tx: &PendingTransaction,
    ) -> Result<DevInspectResults, QueryError> {
        self.record(LedgerCall::DevInspect { sender: *sender }).await?;

        let Some(call) = tx.last_move_call() else {
            return Ok(DevInspectResults {
                error: Some("transaction has no contract call".to_string()),
                results: Vec::new(),
            });
        };

        let key = (call.module.clone(), call.function.clone());
        let results = match self.views.get(&key) {
            Some(ViewFixture { error: Some(error), .. }) => DevInspectResults {
                error: Some(error.clone()),
                results: Vec::new(),
            },
            Some(view) => {
                let mut results = vec![CommandResult::default(); tx.commands().len()];
                if let Some(last) = results.last_mut() {
                    last.return_values = view.return_values.clone();
                }
                DevInspectResults { error: None, results }
            }
            None => DevInspectResults {
                error: Some(format!("function {}::{} not found", call.module, call.function)),
                results: Vec::new(),
            },
        };

        Ok(results)
    }
}
