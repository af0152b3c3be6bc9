use std::path::Path;

use anyhow::Result;
use rwas_core::types::registry::{STAKE_MODULE, USER_STAKED_AMOUNT_FUNCTION};
use rwas_core::{serialize, Address, ContractRegistry, ObjectContent, ObjectData, ObjectId};
use rwas_ledger::{LedgerSnapshot, MemoryLedger, ReturnValue, ViewFixture, DEFAULT_PAGE_SIZE};
use rwas_txbuilder::BuilderConfig;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Deployed contract identifiers
    pub registry: ContractRegistry,

    /// Coin objects requested per listing page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl ClientConfig {
    /// Configuration targeting the testnet deployment
    pub fn testnet() -> Result<Self> {
        Ok(ClientConfig {
            registry: ContractRegistry::testnet()?,
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    /// Load config from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ClientConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn builder_config(&self) -> BuilderConfig {
        BuilderConfig {
            page_size: self.page_size,
        }
    }
}

/// Load a ledger snapshot file into an in-process ledger
pub fn load_ledger(path: &Path) -> Result<MemoryLedger> {
    let content = std::fs::read_to_string(path)?;
    let snapshot: LedgerSnapshot = serialize::from_json(&content)?;
    Ok(MemoryLedger::from_snapshot(snapshot))
}

/// Save a ledger snapshot to file
pub fn save_ledger(snapshot: &LedgerSnapshot, path: &Path) -> Result<()> {
    std::fs::write(path, serialize::to_json_pretty(snapshot)?)?;
    Ok(())
}

/// Generate a sample ledger for testing: `owner` holds a few RWAS and USDC
/// coins, and the stake pool and stake view are populated.
pub fn generate_sample_ledger(registry: &ContractRegistry, owner: Address) -> LedgerSnapshot {
    let mut ledger = MemoryLedger::new();

    let rwas = &registry.governance_token.coin_type;
    ledger.mint_coin(owner, rwas, 3_000_000_000);
    ledger.mint_coin(owner, rwas, 4_000_000_000);
    ledger.mint_coin(owner, rwas, 500_000_000);

    let usdc = &registry.stablecoin.coin_type;
    ledger.mint_coin(owner, usdc, 100_000_000);
    ledger.mint_coin(owner, usdc, 250_000_000);

    ledger.insert_object(ObjectData {
        object_id: registry.stake_pool,
        version: 1,
        content: Some(ObjectContent::MoveObject {
            type_: format!("{}::{}::StakePool", registry.package_id, STAKE_MODULE),
            fields: json!({
                "id": { "id": registry.stake_pool.to_string() },
                "total_staked": "2000000000",
                "reward_rate": "10",
                "reward_treasury": "1000000000000",
                "user_stakes": {
                    "type": "0x2::table::Table<address, u64>",
                    "fields": { "id": { "id": ObjectId::random().to_string() }, "size": "1" }
                }
            }),
        }),
    });

    ledger.set_view(ViewFixture {
        module: STAKE_MODULE.to_string(),
        function: USER_STAKED_AMOUNT_FUNCTION.to_string(),
        return_values: vec![ReturnValue::u64(2_000_000_000)],
        error: None,
    });

    ledger.snapshot()
}

/// Generate a sample configuration and ledger for a fresh random owner
pub fn generate_sample_config() -> Result<(ClientConfig, LedgerSnapshot, Address)> {
    let config = ClientConfig::testnet()?;
    let owner = Address::random();
    let snapshot = generate_sample_ledger(&config.registry, owner);
    Ok((config, snapshot, owner))
}
