use std::collections::HashSet;

use futures_util::stream::{self, Stream, StreamExt, TryStreamExt};
use rwas_core::{Address, Amount, CoinObject, CoinType};
use tracing::debug;

use crate::error::QueryError;
use crate::service::LedgerQueryService;

/// Page size requested from the ledger; services may cap it further
pub const DEFAULT_PAGE_SIZE: usize = 50;

enum PageState {
    Start,
    Next(String),
    Done,
}

/// Total spendable amount of `coin_type` owned by `owner`
pub async fn spendable_balance<L: LedgerQueryService + ?Sized>(
    ledger: &L,
    owner: &Address,
    coin_type: &CoinType,
) -> Result<Amount, QueryError> {
    let balance = ledger.get_balance(owner, coin_type).await?;

    if balance.coin_type != *coin_type {
        return Err(QueryError::Malformed(format!(
            "balance query for {coin_type} answered for {}",
            balance.coin_type
        )));
    }

    let total = Amount::try_from(balance.total_balance).map_err(|_| {
        QueryError::Malformed(format!("balance {} exceeds u64", balance.total_balance))
    })?;

    debug!("Balance of {} for {}: {}", coin_type, owner, total);
    Ok(total)
}

/// Lazily page through `owner`'s coin objects of `coin_type`.
///
/// Pages are fetched one at a time in ledger order. The stream keeps
/// following the cursor while the ledger reports more pages and ends as soon
/// as it does not. A cursor handed out twice fails the stream. Each call
/// starts again from the first page.
pub fn coin_stream<'a, L: LedgerQueryService + ?Sized>(
    ledger: &'a L,
    owner: Address,
    coin_type: CoinType,
    page_size: usize,
) -> impl Stream<Item = Result<CoinObject, QueryError>> + Send + 'a {
    stream::try_unfold((PageState::Start, HashSet::new()), move |(state, mut seen)| {
        let coin_type = coin_type.clone();
        async move {
            let cursor = match state {
                PageState::Start => None,
                PageState::Next(cursor) => Some(cursor),
                PageState::Done => return Ok(None),
            };

            let page = ledger
                .get_coins(&owner, &coin_type, cursor, page_size)
                .await?;

            if let Some(stray) = page.data.iter().find(|coin| coin.coin_type != coin_type) {
                return Err(QueryError::Malformed(format!(
                    "coin {} has type {}, expected {}",
                    stray.coin_object_id, stray.coin_type, coin_type
                )));
            }

            let next = match (page.has_next_page, page.next_cursor) {
                (false, _) => PageState::Done,
                (true, Some(cursor)) => {
                    // A cursor already followed would page forever
                    if !seen.insert(cursor.clone()) {
                        return Err(QueryError::Malformed(format!(
                            "cursor {cursor} returned twice"
                        )));
                    }
                    PageState::Next(cursor)
                }
                (true, None) => {
                    return Err(QueryError::Malformed(
                        "page reports more results but carries no cursor".to_string(),
                    ))
                }
            };

            debug!("Fetched page of {} {} coins for {}", page.data.len(), coin_type, owner);
            Ok::<_, QueryError>(Some((page.data, (next, seen))))
        }
    })
    .map_ok(|coins| stream::iter(coins.into_iter().map(Ok)))
    .try_flatten()
    .boxed()
}

/// Collect the full coin inventory. Any page failure fails the whole listing.
pub async fn list_coin_objects<L: LedgerQueryService + ?Sized>(
    ledger: &L,
    owner: &Address,
    coin_type: &CoinType,
    page_size: usize,
) -> Result<Vec<CoinObject>, QueryError> {
    coin_stream(ledger, *owner, coin_type.clone(), page_size)
        .try_collect()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{Balance, DevInspectResults, Page};
    use async_trait::async_trait;
    use rwas_core::{ObjectData, ObjectId, PendingTransaction};
    use tokio::sync::Mutex;

    /// Replays a fixed list of pages and records the cursors it was asked for
    struct ScriptedPages {
        pages: Vec<Result<Page<CoinObject>, String>>,
        cursors: Mutex<Vec<Option<String>>>,
        total_balance: u128,
    }

    impl ScriptedPages {
        fn new(pages: Vec<Result<Page<CoinObject>, String>>) -> Self {
            ScriptedPages {
                pages,
                cursors: Mutex::new(Vec::new()),
                total_balance: 0,
            }
        }
    }

    #[async_trait]
    impl LedgerQueryService for ScriptedPages {
        async fn get_balance(&self, _owner: &Address, coin_type: &CoinType) -> Result<Balance, QueryError> {
            Ok(Balance {
                coin_type: coin_type.clone(),
                coin_object_count: 0,
                total_balance: self.total_balance,
            })
        }

        async fn get_coins(
            &self,
            _owner: &Address,
            _coin_type: &CoinType,
            cursor: Option<String>,
            _limit: usize,
        ) -> Result<Page<CoinObject>, QueryError> {
            let mut cursors = self.cursors.lock().await;
            cursors.push(cursor);
            match self.pages.get(cursors.len() - 1) {
                Some(Ok(page)) => Ok(page.clone()),
                Some(Err(msg)) => Err(QueryError::Unreachable(msg.clone())),
                None => Err(QueryError::Malformed("page requested past the end".to_string())),
            }
        }

        async fn get_object(&self, id: &ObjectId) -> Result<ObjectData, QueryError> {
            Err(QueryError::ObjectNotFound(*id))
        }

        async fn dev_inspect(
            &self,
            _sender: &Address,
            _tx: &PendingTransaction,
        ) -> Result<DevInspectResults, QueryError> {
            Ok(DevInspectResults::default())
        }
    }

    fn coin_type() -> CoinType {
        CoinType::parse("0x2::usdc::USDC").unwrap()
    }

    fn coin(n: u8, balance: u64) -> CoinObject {
        CoinObject {
            coin_type: coin_type(),
            coin_object_id: ObjectId::from_u8(n),
            version: 1,
            balance,
        }
    }

    fn page(data: Vec<CoinObject>, next_cursor: Option<&str>, has_next_page: bool) -> Page<CoinObject> {
        Page {
            data,
            next_cursor: next_cursor.map(str::to_string),
            has_next_page,
        }
    }

    #[tokio::test]
    async fn test_pages_followed_in_order() {
        let ledger = ScriptedPages::new(vec![
            Ok(page(vec![coin(1, 10), coin(2, 20)], Some("c2"), true)),
            Ok(page(vec![coin(3, 30)], None, false)),
        ]);

        let coins = list_coin_objects(&ledger, &Address::ZERO, &coin_type(), DEFAULT_PAGE_SIZE)
            .await
            .unwrap();

        assert_eq!(coins, vec![coin(1, 10), coin(2, 20), coin(3, 30)]);
        assert_eq!(*ledger.cursors.lock().await, vec![None, Some("c2".to_string())]);
    }

    #[tokio::test]
    async fn test_stops_when_no_more_pages_despite_cursor() {
        let ledger = ScriptedPages::new(vec![
            Ok(page(vec![coin(1, 10)], Some("c1"), false)),
            Ok(page(vec![coin(2, 20)], None, false)),
        ]);

        let coins = list_coin_objects(&ledger, &Address::ZERO, &coin_type(), DEFAULT_PAGE_SIZE)
            .await
            .unwrap();

        assert_eq!(coins, vec![coin(1, 10)]);
        assert_eq!(ledger.cursors.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_page_with_more_keeps_going() {
        let ledger = ScriptedPages::new(vec![
            Ok(page(vec![], Some("c0"), true)),
            Ok(page(vec![coin(5, 50)], None, false)),
        ]);

        let coins = list_coin_objects(&ledger, &Address::ZERO, &coin_type(), DEFAULT_PAGE_SIZE)
            .await
            .unwrap();
        assert_eq!(coins, vec![coin(5, 50)]);
    }

    #[tokio::test]
    async fn test_page_failure_fails_listing() {
        let ledger = ScriptedPages::new(vec![
            Ok(page(vec![coin(1, 10)], Some("c1"), true)),
            Err("connection reset".to_string()),
        ]);

        let result = list_coin_objects(&ledger, &Address::ZERO, &coin_type(), DEFAULT_PAGE_SIZE).await;
        assert!(matches!(result, Err(QueryError::Unreachable(_))));
    }

    #[tokio::test]
    async fn test_more_pages_without_cursor_is_malformed() {
        let ledger = ScriptedPages::new(vec![Ok(page(vec![coin(1, 10)], None, true))]);

        let result = list_coin_objects(&ledger, &Address::ZERO, &coin_type(), DEFAULT_PAGE_SIZE).await;
        assert!(matches!(result, Err(QueryError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_repeated_cursor_is_malformed() {
        let ledger = ScriptedPages::new(vec![
            Ok(page(vec![coin(1, 10)], Some("c1"), true)),
            Ok(page(vec![coin(2, 20)], Some("c2"), true)),
            Ok(page(vec![coin(3, 30)], Some("c1"), true)),
            Ok(page(vec![coin(4, 40)], Some("c2"), true)),
        ]);

        let result = list_coin_objects(&ledger, &Address::ZERO, &coin_type(), DEFAULT_PAGE_SIZE).await;
        assert!(matches!(result, Err(QueryError::Malformed(_))));
        assert_eq!(ledger.cursors.lock().await.len(), 3);
    }

    #[tokio::test]
    async fn test_foreign_coin_type_is_malformed() {
        let mut stray = coin(1, 10);
        stray.coin_type = CoinType::parse("0x2::sui::SUI").unwrap();
        let ledger = ScriptedPages::new(vec![Ok(page(vec![stray], None, false))]);

        let result = list_coin_objects(&ledger, &Address::ZERO, &coin_type(), DEFAULT_PAGE_SIZE).await;
        assert!(matches!(result, Err(QueryError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_stream_is_lazy() {
        let ledger = ScriptedPages::new(vec![
            Ok(page(vec![coin(1, 10), coin(2, 20)], Some("c2"), true)),
            Ok(page(vec![coin(3, 30)], None, false)),
        ]);

        let first: Vec<_> = coin_stream(&ledger, Address::ZERO, coin_type(), DEFAULT_PAGE_SIZE)
            .take(2)
            .try_collect()
            .await
            .unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(ledger.cursors.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_balance_overflow_is_malformed() {
        let mut ledger = ScriptedPages::new(vec![]);
        ledger.total_balance = u64::MAX as u128 + 1;
        let result = spendable_balance(&ledger, &Address::ZERO, &coin_type()).await;
        assert!(matches!(result, Err(QueryError::Malformed(_))));

        ledger.total_balance = 7_000;
        assert_eq!(spendable_balance(&ledger, &Address::ZERO, &coin_type()).await.unwrap(), 7_000);
    }
}
