use rwas_core::types::registry::{STAKE_MODULE, USER_STAKED_AMOUNT_FUNCTION};
use rwas_core::{Amount, MoveCall, PendingTransaction, StakePoolSnapshot};
use rwas_ledger::{DevInspectResults, LedgerQueryService, QueryError};
use tracing::{debug, warn};

use crate::builder::{parse_address, TransactionBuilder};
use crate::error::BuildError;

impl<L: LedgerQueryService> TransactionBuilder<L> {
    /// Fetch the staking pool and validate its shape
    pub async fn stake_pool_snapshot(&self) -> Result<StakePoolSnapshot, BuildError> {
        let object = match self.ledger.get_object(&self.registry.stake_pool).await {
            Ok(object) => object,
            Err(QueryError::ObjectNotFound(id)) => {
                return Err(BuildError::MalformedPoolData(format!("stake pool {id} not found")))
            }
            Err(e) => return Err(e.into()),
        };

        let snapshot = StakePoolSnapshot::from_object(&object)
            .map_err(|e| BuildError::MalformedPoolData(e.to_string()))?;
        debug!(
            "Stake pool {}: total staked {}, {} stakers",
            snapshot.id, snapshot.total_staked, snapshot.user_stakes.size
        );
        Ok(snapshot)
    }

    /// Amount currently staked by `user`, read through a simulated view call.
    ///
    /// A failed simulation is reported as [`BuildError::ViewCall`], never as a
    /// zero stake.
    pub async fn user_stake_amount(&self, user: &str) -> Result<Amount, BuildError> {
        let user = parse_address(user)?;

        let mut tx = PendingTransaction::new();
        tx.set_sender(user);
        let pool = tx.object(self.registry.stake_pool)?;
        let who = tx.pure_address(user)?;
        tx.move_call(MoveCall {
            package: self.registry.package_id,
            module: STAKE_MODULE.to_string(),
            function: USER_STAKED_AMOUNT_FUNCTION.to_string(),
            type_arguments: vec![],
            arguments: vec![pool, who],
        })?;

        let results = self
            .ledger
            .dev_inspect(&user, &tx)
            .await
            .map_err(|e| BuildError::ViewCall(e.to_string()))?;

        decode_u64_return(&results).inspect_err(|e| warn!("Stake view for {} unavailable: {}", user, e))
    }
}

/// First return value of the last command, as a little-endian `u64`
fn decode_u64_return(results: &DevInspectResults) -> Result<u64, BuildError> {
    if let Some(error) = &results.error {
        return Err(BuildError::ViewCall(format!("execution failed: {error}")));
    }

    let value = results
        .results
        .last()
        .and_then(|result| result.return_values.first())
        .ok_or_else(|| BuildError::ViewCall("no return value".to_string()))?;

    if value.type_tag != "u64" {
        return Err(BuildError::ViewCall(format!(
            "expected u64 return, got {}",
            value.type_tag
        )));
    }

    let bytes: [u8; 8] = value.bytes.as_slice().try_into().map_err(|_| {
        BuildError::ViewCall(format!("expected 8 bytes, got {}", value.bytes.len()))
    })?;
    Ok(u64::from_le_bytes(bytes))
}
