use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;
use crate::types::address::ObjectId;
use crate::types::coin::CoinType;

/// Staking module and its entry points
pub const STAKE_MODULE: &str = "stake";
pub const STAKE_FUNCTION: &str = "stake";
/// Read-only view returning a user's staked amount as `u64`
pub const USER_STAKED_AMOUNT_FUNCTION: &str = "get_user_staked_amount";

/// Yield token module and its entry points
pub const YIELD_TOKEN_MODULE: &str = "yield_token";
pub const MINT_FUNCTION: &str = "mint";
pub const PURCHASE_FUNCTION: &str = "purchase_yield_token";

/// Module defining the governance coin
pub const RWAS_MODULE: &str = "rwas";

/// Ledger network the identifiers were deployed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Devnet,
    Testnet,
    Mainnet,
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Network::Devnet => "devnet",
            Network::Testnet => "testnet",
            Network::Mainnet => "mainnet",
        };
        f.write_str(name)
    }
}

/// A fungible coin known to the marketplace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinInfo {
    pub symbol: String,
    pub coin_type: CoinType,
    pub decimals: u8,
}

/// A per-property yield token and its on-ledger info object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YieldToken {
    pub symbol: String,
    pub coin_type: CoinType,
    pub decimals: u8,
    /// Shared object holding the token's sale state
    pub info_object: ObjectId,
}

/// Identifiers of the deployed contracts on one network.
///
/// Built once (from a preset or a config file) and passed to the
/// transaction builder; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractRegistry {
    pub network: Network,
    pub package_id: ObjectId,
    pub stake_pool: ObjectId,
    pub admin_cap: ObjectId,
    #[serde(default = "default_clock")]
    pub clock: ObjectId,
    pub governance_token: CoinInfo,
    pub stablecoin: CoinInfo,
    pub yield_tokens: Vec<YieldToken>,
}

fn default_clock() -> ObjectId {
    ObjectId::CLOCK
}

impl ContractRegistry {
    /// Identifiers of the testnet deployment
    pub fn testnet() -> Result<Self, CoreError> {
        let package_id =
            ObjectId::parse("0x6c6522852b4a8a36497eec262a0ee46872fcf69718f15e4a99050794d7ff7117")?;
        let palm_package =
            ObjectId::parse("0x3273ac789deb8d84b487a9f387f99399facd1963f45ea51e298bab93b9188989")?;

        Ok(ContractRegistry {
            network: Network::Testnet,
            package_id,
            stake_pool: ObjectId::parse(
                "0xea4c478327a73251d3f33e498704b945c210fa80e23e33c49c48058231dea46d",
            )?,
            admin_cap: ObjectId::parse(
                "0x021fe66ad7525d641f3c479328ddd65ad8fcfa8336a92a22adbf3a0cd408215a",
            )?,
            clock: ObjectId::CLOCK,
            governance_token: CoinInfo {
                symbol: "RWAS".to_string(),
                coin_type: CoinType::new(package_id, RWAS_MODULE, "RWAS")?,
                decimals: 9,
            },
            stablecoin: CoinInfo {
                symbol: "USDC".to_string(),
                coin_type: CoinType::new(package_id, "usdc", "USDC")?,
                decimals: 6,
            },
            yield_tokens: vec![YieldToken {
                symbol: "PALM".to_string(),
                coin_type: CoinType::new(palm_package, "palm", "PALM")?,
                decimals: 9,
                info_object: ObjectId::parse(
                    "0x598c420649c681243309ee2346629e4b0660cebded05e1a100aee643f4509eb9",
                )?,
            }],
        })
    }

    /// Look up a yield token by symbol (case-insensitive)
    pub fn yield_token(&self, symbol: &str) -> Option<&YieldToken> {
        self.yield_tokens
            .iter()
            .find(|token| token.symbol.eq_ignore_ascii_case(symbol))
    }

    /// Decimals of any registered coin type
    pub fn decimals_of(&self, coin_type: &CoinType) -> Option<u8> {
        if *coin_type == self.governance_token.coin_type {
            return Some(self.governance_token.decimals);
        }
        if *coin_type == self.stablecoin.coin_type {
            return Some(self.stablecoin.decimals);
        }
        self.yield_tokens
            .iter()
            .find(|token| token.coin_type == *coin_type)
            .map(|token| token.decimals)
    }

    /// Resolve a symbol (RWAS, USDC or a yield token) to its coin type
    pub fn coin_type_by_symbol(&self, symbol: &str) -> Option<&CoinType> {
        if self.governance_token.symbol.eq_ignore_ascii_case(symbol) {
            return Some(&self.governance_token.coin_type);
        }
        if self.stablecoin.symbol.eq_ignore_ascii_case(symbol) {
            return Some(&self.stablecoin.coin_type);
        }
        self.yield_token(symbol).map(|token| &token.coin_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_testnet_registry() {
        let registry = ContractRegistry::testnet().unwrap();
        assert_eq!(registry.network, Network::Testnet);
        assert_eq!(registry.clock, ObjectId::CLOCK);
        assert_eq!(
            registry.governance_token.coin_type.to_string(),
            "0x6c6522852b4a8a36497eec262a0ee46872fcf69718f15e4a99050794d7ff7117::rwas::RWAS"
        );
        assert_eq!(registry.stablecoin.decimals, 6);
    }

    #[test]
    fn test_symbol_lookup() {
        let registry = ContractRegistry::testnet().unwrap();
        assert!(registry.yield_token("palm").is_some());
        assert!(registry.yield_token("DWTN").is_none());
        assert_eq!(
            registry.coin_type_by_symbol("usdc"),
            Some(&registry.stablecoin.coin_type)
        );
        assert_eq!(registry.decimals_of(&registry.governance_token.coin_type), Some(9));
    }

    #[test]
    fn test_registry_json_roundtrip() {
        let registry = ContractRegistry::testnet().unwrap();
        let json = serde_json::to_string(&registry).unwrap();
        let back: ContractRegistry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, registry);
    }
}
