//! Mint build and read-only view integration tests

use std::sync::Arc;

use rwas_core::{
    Address, Command, ContractRegistry, ObjectContent, ObjectData, PureArg,
};
use rwas_ledger::{LedgerCall, MemoryLedger, ReturnValue, ViewFixture};
use rwas_txbuilder::{BuildError, TransactionBuilder};
use serde_json::json;

fn stake_view(return_values: Vec<ReturnValue>, error: Option<&str>) -> ViewFixture {
    ViewFixture {
        module: "stake".to_string(),
        function: "get_user_staked_amount".to_string(),
        return_values,
        error: error.map(str::to_string),
    }
}

fn pool_object(registry: &ContractRegistry, fields: serde_json::Value) -> ObjectData {
    ObjectData {
        object_id: registry.stake_pool,
        version: 40,
        content: Some(ObjectContent::MoveObject {
            type_: format!("{}::stake::StakePool", registry.package_id),
            fields,
        }),
    }
}

#[tokio::test]
async fn test_mint_scenario() {
    let registry = ContractRegistry::testnet().unwrap();
    let ledger = Arc::new(MemoryLedger::new());
    let builder = TransactionBuilder::new(ledger.clone(), registry.clone());
    let recipient = Address::random();

    let tx = builder.mint("PALM", 1_000, &recipient.to_string()).unwrap();

    assert_eq!(tx.commands().len(), 1);
    let Command::MoveCall(call) = &tx.commands()[0] else {
        panic!("expected a contract call");
    };
    let palm = registry.yield_token("PALM").unwrap();
    assert_eq!(call.module, "yield_token");
    assert_eq!(call.function, "mint");
    assert_eq!(call.type_arguments, vec![palm.coin_type.clone()]);
    assert_eq!(tx.input_object(call.arguments[0]), Some(registry.admin_cap));
    assert_eq!(tx.input_object(call.arguments[1]), Some(palm.info_object));
    assert_eq!(tx.input_pure(call.arguments[2]), Some(&PureArg::U64(1_000)));
    assert_eq!(tx.input_pure(call.arguments[3]), Some(&PureArg::Address(recipient)));

    // No balance query, no listing, no merge or split
    assert!(ledger.calls().await.is_empty());
    assert_eq!(tx.merge_count(), 0);
    assert!(tx.sender().is_none());
}

#[tokio::test]
async fn test_mint_invalid_recipient() {
    let builder = TransactionBuilder::new(MemoryLedger::new(), ContractRegistry::testnet().unwrap());
    let err = builder.mint("PALM", 1_000, "0x6").unwrap_err();
    assert!(matches!(err, BuildError::InvalidAddress(_)));
}

#[tokio::test]
async fn test_user_stake_amount_via_view_call() {
    let registry = ContractRegistry::testnet().unwrap();
    let user = Address::random();
    let mut ledger = MemoryLedger::new();
    ledger.set_view(stake_view(vec![ReturnValue::u64(5_000_000_000)], None));
    let ledger = Arc::new(ledger);
    let builder = TransactionBuilder::new(ledger.clone(), registry);

    let staked = builder.user_stake_amount(&user.to_string()).await.unwrap();

    assert_eq!(staked, 5_000_000_000);
    assert_eq!(ledger.calls().await, vec![LedgerCall::DevInspect { sender: user }]);
}

#[tokio::test]
async fn test_zero_stake_is_not_an_error() {
    let mut ledger = MemoryLedger::new();
    ledger.set_view(stake_view(vec![ReturnValue::u64(0)], None));
    let builder = TransactionBuilder::new(ledger, ContractRegistry::testnet().unwrap());

    let staked = builder.user_stake_amount(&Address::random().to_string()).await.unwrap();
    assert_eq!(staked, 0);
}

#[tokio::test]
async fn test_failed_view_is_not_zero() {
    let mut aborted = MemoryLedger::new();
    aborted.set_view(stake_view(vec![], Some("MoveAbort in stake::get_user_staked_amount")));
    let builder = TransactionBuilder::new(aborted, ContractRegistry::testnet().unwrap());
    let err = builder
        .user_stake_amount(&Address::random().to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, BuildError::ViewCall(_)));

    // Contract without the view function
    let builder = TransactionBuilder::new(MemoryLedger::new(), ContractRegistry::testnet().unwrap());
    let err = builder
        .user_stake_amount(&Address::random().to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, BuildError::ViewCall(_)));

    // Ledger unreachable
    let mut offline = MemoryLedger::new();
    offline.set_unreachable(true);
    let builder = TransactionBuilder::new(offline, ContractRegistry::testnet().unwrap());
    let err = builder
        .user_stake_amount(&Address::random().to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, BuildError::ViewCall(_)));
}

#[tokio::test]
async fn test_stake_pool_snapshot() {
    let registry = ContractRegistry::testnet().unwrap();
    let mut ledger = MemoryLedger::new();
    ledger.insert_object(pool_object(
        &registry,
        json!({
            "id": { "id": registry.stake_pool.to_string() },
            "total_staked": "12000000000",
            "reward_rate": "10",
            "reward_treasury": "500000000000",
            "user_stakes": {
                "type": "0x2::table::Table<address, u64>",
                "fields": { "id": { "id": "0x77" }, "size": "2" }
            }
        }),
    ));
    let builder = TransactionBuilder::new(ledger, registry.clone());

    let snapshot = builder.stake_pool_snapshot().await.unwrap();

    assert_eq!(snapshot.id, registry.stake_pool);
    assert_eq!(snapshot.total_staked, 12_000_000_000);
    assert_eq!(snapshot.reward_rate, 10);
    assert_eq!(snapshot.reward_treasury, 500_000_000_000);
    assert_eq!(snapshot.user_stakes.size, 2);
}

#[tokio::test]
async fn test_malformed_pool_data() {
    let registry = ContractRegistry::testnet().unwrap();

    // Object missing entirely
    let builder = TransactionBuilder::new(MemoryLedger::new(), registry.clone());
    assert!(matches!(
        builder.stake_pool_snapshot().await,
        Err(BuildError::MalformedPoolData(_))
    ));

    // Object present without the expected fields
    let mut ledger = MemoryLedger::new();
    ledger.insert_object(pool_object(&registry, json!({ "id": { "id": "0x1" } })));
    let builder = TransactionBuilder::new(ledger, registry.clone());
    assert!(matches!(
        builder.stake_pool_snapshot().await,
        Err(BuildError::MalformedPoolData(_))
    ));

    // Object without content
    let mut ledger = MemoryLedger::new();
    ledger.insert_object(ObjectData {
        object_id: registry.stake_pool,
        version: 1,
        content: None,
    });
    let builder = TransactionBuilder::new(ledger, registry);
    assert!(matches!(
        builder.stake_pool_snapshot().await,
        Err(BuildError::MalformedPoolData(_))
    ));
}
