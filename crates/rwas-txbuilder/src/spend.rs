use std::collections::HashSet;

use rwas_core::{Amount, Argument, CoinObject, CoinType, PendingTransaction, MAX_COMMANDS};
use tracing::{debug, warn};

use crate::error::BuildError;

/// Largest coin inventory that fits one transaction: a merge per extra
/// coin, the split and the contract call.
pub const MAX_CONSOLIDATED_COINS: usize = MAX_COMMANDS - 1;

/// Drop repeated listings of the same coin object, keeping the first.
///
/// Overlapping pages can list a coin twice; counting it twice would
/// overstate the inventory and merge the accumulator into itself.
pub(crate) fn distinct_coins(coins: Vec<CoinObject>) -> Vec<CoinObject> {
    let mut seen = HashSet::with_capacity(coins.len());
    let listed = coins.len();
    let distinct: Vec<CoinObject> = coins
        .into_iter()
        .filter(|coin| seen.insert(coin.coin_object_id))
        .collect();

    if distinct.len() < listed {
        warn!("Dropped {} repeated coin listings", listed - distinct.len());
    }
    distinct
}

/// Check a listed inventory against the requested amount.
///
/// The balance query already passed, but the listing is a separate read and
/// may disagree with it; the listed total is what the transaction spends.
pub(crate) fn check_inventory(
    coin_type: &CoinType,
    coins: &[CoinObject],
    amount: Amount,
) -> Result<(), BuildError> {
    let total: u128 = coins.iter().map(|coin| coin.balance as u128).sum();
    if total < amount as u128 {
        return Err(BuildError::InsufficientFunds {
            coin_type: coin_type.clone(),
            requested: amount,
            available: total as Amount,
        });
    }

    if coins.len() > MAX_CONSOLIDATED_COINS {
        return Err(BuildError::TooManyCoinObjects {
            count: coins.len(),
            max: MAX_CONSOLIDATED_COINS,
        });
    }

    Ok(())
}

/// Merge every coin into the first one listed; returns the accumulator.
pub(crate) fn consolidate(
    tx: &mut PendingTransaction,
    coin_type: &CoinType,
    coins: &[CoinObject],
) -> Result<Argument, BuildError> {
    let (first, rest) = coins
        .split_first()
        .ok_or_else(|| BuildError::InsufficientFunds {
            coin_type: coin_type.clone(),
            requested: 1,
            available: 0,
        })?;

    let accumulator = tx.object(first.coin_object_id)?;
    for coin in rest {
        let source = tx.object(coin.coin_object_id)?;
        tx.merge_coins(accumulator, vec![source])?;
    }

    debug!(
        "Consolidated {} {} coins into {}",
        coins.len(),
        coin_type,
        first.coin_object_id
    );
    Ok(accumulator)
}

/// Split exactly `amount` off the accumulator; returns the new coin.
pub(crate) fn split_exact(
    tx: &mut PendingTransaction,
    accumulator: Argument,
    amount: Amount,
) -> Result<Argument, BuildError> {
    let outputs = tx.split_coins(accumulator, &[amount])?;
    outputs
        .into_iter()
        .next()
        .ok_or_else(|| BuildError::InvalidAmount("split produced no coin".to_string()))
}
