use rwas_core::types::registry::{
    MINT_FUNCTION, PURCHASE_FUNCTION, STAKE_FUNCTION, STAKE_MODULE, YIELD_TOKEN_MODULE,
};
use rwas_core::{
    Address, Amount, Argument, CoinObject, CoinType, ContractRegistry, MoveCall, PendingTransaction,
    YieldToken,
};
use rwas_ledger::{inventory, LedgerQueryService, DEFAULT_PAGE_SIZE};
use tracing::{debug, info, warn};

use crate::error::BuildError;
use crate::spend;

/// Configuration for transaction building
#[derive(Debug, Clone)]
pub struct BuilderConfig {
    /// Page size requested when listing coin objects
    pub page_size: usize,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        BuilderConfig {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Builds unsigned transactions against a ledger and a fixed contract registry.
///
/// Each build runs balance check, inventory listing, consolidation, split and
/// call assembly in sequence and owns its transaction until it returns it.
/// Two concurrent builds for the same owner may both pass the balance check
/// against the same coins; the ledger rejects whichever executes second.
pub struct TransactionBuilder<L> {
    pub(crate) ledger: L,
    pub(crate) registry: ContractRegistry,
    config: BuilderConfig,
}

impl<L: LedgerQueryService> TransactionBuilder<L> {
    pub fn new(ledger: L, registry: ContractRegistry) -> Self {
        Self::with_config(ledger, registry, BuilderConfig::default())
    }

    pub fn with_config(ledger: L, registry: ContractRegistry, config: BuilderConfig) -> Self {
        TransactionBuilder {
            ledger,
            registry,
            config,
        }
    }

    pub fn registry(&self) -> &ContractRegistry {
        &self.registry
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Spendable balance of `coin_type` held by `owner`
    pub async fn spendable_balance(&self, owner: &str, coin_type: &CoinType) -> Result<Amount, BuildError> {
        let owner = parse_address(owner)?;
        Ok(inventory::spendable_balance(&self.ledger, &owner, coin_type).await?)
    }

    /// Every coin object of `coin_type` held by `owner`, in ledger order
    pub async fn list_coin_objects(
        &self,
        owner: &str,
        coin_type: &CoinType,
    ) -> Result<Vec<CoinObject>, BuildError> {
        let owner = parse_address(owner)?;
        Ok(inventory::list_coin_objects(&self.ledger, &owner, coin_type, self.config.page_size).await?)
    }

    /// Stake `amount` of the governance token from `owner` into the pool
    pub async fn stake(&self, owner: &str, amount: Amount) -> Result<PendingTransaction, BuildError> {
        let owner = parse_address(owner)?;
        check_amount(amount)?;
        info!("Building stake of {} for {}", amount, owner);

        let coin_type = self.registry.governance_token.coin_type.clone();
        let mut tx = PendingTransaction::new();
        tx.set_sender(owner);

        let coin = self.fund(&mut tx, &owner, &coin_type, amount).await?;
        let pool = tx.object(self.registry.stake_pool)?;
        let clock = tx.object(self.registry.clock)?;
        tx.move_call(MoveCall {
            package: self.registry.package_id,
            module: STAKE_MODULE.to_string(),
            function: STAKE_FUNCTION.to_string(),
            type_arguments: vec![],
            arguments: vec![pool, coin, clock],
        })?;

        info!("Built stake transaction with {} commands", tx.commands().len());
        Ok(tx)
    }

    /// Mint `amount` of a yield token to `recipient` under the admin capability.
    ///
    /// Creates new supply, so no balance or inventory is consulted.
    pub fn mint(&self, symbol: &str, amount: Amount, recipient: &str) -> Result<PendingTransaction, BuildError> {
        let recipient = parse_address(recipient)?;
        check_amount(amount)?;
        let token = self.yield_token(symbol)?;
        info!("Building mint of {} {} to {}", amount, token.symbol, recipient);

        let mut tx = PendingTransaction::new();
        let admin_cap = tx.object(self.registry.admin_cap)?;
        let info = tx.object(token.info_object)?;
        let amount = tx.pure_u64(amount)?;
        let recipient = tx.pure_address(recipient)?;
        tx.move_call(MoveCall {
            package: self.registry.package_id,
            module: YIELD_TOKEN_MODULE.to_string(),
            function: MINT_FUNCTION.to_string(),
            type_arguments: vec![token.coin_type.clone()],
            arguments: vec![admin_cap, info, amount, recipient],
        })?;

        Ok(tx)
    }

    /// Purchase yield tokens for `amount` of stablecoin paid by `recipient`
    pub async fn purchase(
        &self,
        symbol: &str,
        amount: Amount,
        recipient: &str,
    ) -> Result<PendingTransaction, BuildError> {
        let recipient = parse_address(recipient)?;
        check_amount(amount)?;
        let token = self.yield_token(symbol)?;
        info!("Building purchase of {} with {} stablecoin for {}", token.symbol, amount, recipient);

        let stablecoin = self.registry.stablecoin.coin_type.clone();
        let mut tx = PendingTransaction::new();
        tx.set_sender(recipient);

        let payment = self.fund(&mut tx, &recipient, &stablecoin, amount).await?;
        let info = tx.object(token.info_object)?;
        let recipient_arg = tx.pure_address(recipient)?;
        tx.move_call(MoveCall {
            package: self.registry.package_id,
            module: YIELD_TOKEN_MODULE.to_string(),
            function: PURCHASE_FUNCTION.to_string(),
            type_arguments: vec![token.coin_type.clone(), stablecoin],
            arguments: vec![info, payment, recipient_arg],
        })?;

        info!("Built purchase transaction with {} commands", tx.commands().len());
        Ok(tx)
    }

    /// Balance check, inventory listing, consolidation and exact split.
    /// Returns the split coin, the only coin the contract call may reference.
    async fn fund(
        &self,
        tx: &mut PendingTransaction,
        owner: &Address,
        coin_type: &CoinType,
        amount: Amount,
    ) -> Result<Argument, BuildError> {
        let available = inventory::spendable_balance(&self.ledger, owner, coin_type).await?;
        if available < amount {
            warn!(
                "Insufficient {} for {}: requested {}, available {}",
                coin_type, owner, amount, available
            );
            return Err(BuildError::InsufficientFunds {
                coin_type: coin_type.clone(),
                requested: amount,
                available,
            });
        }

        let listed =
            inventory::list_coin_objects(&self.ledger, owner, coin_type, self.config.page_size).await?;
        let coins = spend::distinct_coins(listed);
        debug!("Listed {} {} coins for {}", coins.len(), coin_type, owner);
        spend::check_inventory(coin_type, &coins, amount)?;

        let accumulator = spend::consolidate(tx, coin_type, &coins)?;
        spend::split_exact(tx, accumulator, amount)
    }

    fn yield_token(&self, symbol: &str) -> Result<&YieldToken, BuildError> {
        self.registry
            .yield_token(symbol)
            .ok_or_else(|| BuildError::UnknownYieldToken(symbol.to_string()))
    }
}

pub(crate) fn parse_address(s: &str) -> Result<Address, BuildError> {
    Address::parse(s).map_err(|_| BuildError::InvalidAddress(s.to_string()))
}

fn check_amount(amount: Amount) -> Result<(), BuildError> {
    if amount == 0 {
        return Err(BuildError::InvalidAmount("amount must be positive".to_string()));
    }
    Ok(())
}
