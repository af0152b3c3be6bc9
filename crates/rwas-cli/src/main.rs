use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use clap::Parser;
use rwas_core::{format_amount, parse_amount, serialize, PendingTransaction};
use rwas_ledger::MemoryLedger;
use rwas_txbuilder::{BuildError, TransactionBuilder};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

mod cli;
mod config;

use cli::{Cli, Commands};
use config::{generate_sample_config, load_ledger, save_ledger, ClientConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for command output
    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let _subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init => init_config(&cli.config, &cli.ledger)?,
        command => {
            let builder = open_builder(&cli.config, &cli.ledger)?;
            run_command(&builder, command).await?;
        }
    }

    Ok(())
}

/// Run a query or build command against the loaded ledger
async fn run_command(builder: &TransactionBuilder<MemoryLedger>, command: Commands) -> Result<()> {
    match command {
        Commands::Init => {}
        Commands::Balance { owner, symbol } => {
            show_balance(builder, &owner, &symbol).await?;
        }
        Commands::Coins { owner, symbol } => {
            show_coins(builder, &owner, &symbol).await?;
        }
        Commands::Stake { owner, amount, out } => {
            let amount = parse_amount(&amount, builder.registry().governance_token.decimals)?;
            let tx = builder.stake(&owner, amount).await?;
            emit_transaction(&tx, out)?;
        }
        Commands::Mint {
            symbol,
            amount,
            recipient,
            out,
        } => {
            let decimals = builder
                .registry()
                .yield_token(&symbol)
                .map(|token| token.decimals)
                .ok_or_else(|| BuildError::UnknownYieldToken(symbol.clone()))?;
            let tx = builder.mint(&symbol, parse_amount(&amount, decimals)?, &recipient)?;
            emit_transaction(&tx, out)?;
        }
        Commands::Purchase {
            symbol,
            amount,
            recipient,
            out,
        } => {
            let amount = parse_amount(&amount, builder.registry().stablecoin.decimals)?;
            let tx = builder.purchase(&symbol, amount, &recipient).await?;
            emit_transaction(&tx, out)?;
        }
        Commands::Pool => {
            show_pool(builder).await?;
        }
        Commands::UserStake { user } => {
            let staked = builder.user_stake_amount(&user).await?;
            let token = &builder.registry().governance_token;
            println!("{} {}", format_amount(staked, token.decimals), token.symbol);
        }
    }

    Ok(())
}

/// Initialize a sample configuration and ledger snapshot
fn init_config(config_path: &Path, ledger_path: &Path) -> Result<()> {
    info!("Generating sample configuration");

    let (config, snapshot, owner) = generate_sample_config()?;
    config.save(config_path)?;
    save_ledger(&snapshot, ledger_path)?;

    info!("Configuration saved to {:?}", config_path);
    info!("Ledger snapshot saved to {:?}", ledger_path);

    println!("\nConfiguration file created: {}", config_path.display());
    println!("Ledger snapshot created:    {}", ledger_path.display());
    println!("Sample owner: {}", owner);
    println!("\nTo build a stake transaction, run:");
    println!("  rwas stake --owner {} --amount 5", owner);

    Ok(())
}

fn open_builder(config_path: &Path, ledger_path: &Path) -> Result<TransactionBuilder<MemoryLedger>> {
    if !config_path.exists() {
        error!(
            "Configuration file not found: {:?}. Run 'rwas init' to create one.",
            config_path
        );
        return Err(anyhow!("Configuration file not found"));
    }
    let config = ClientConfig::load(config_path)?;

    info!("Loading ledger snapshot from {:?}", ledger_path);
    let ledger = load_ledger(ledger_path)?;

    let builder_config = config.builder_config();
    Ok(TransactionBuilder::with_config(ledger, config.registry, builder_config))
}

async fn show_balance(builder: &TransactionBuilder<MemoryLedger>, owner: &str, symbol: &str) -> Result<()> {
    let coin_type = builder
        .registry()
        .coin_type_by_symbol(symbol)
        .ok_or_else(|| anyhow!("Unknown coin symbol: {}", symbol))?
        .clone();
    let decimals = builder.registry().decimals_of(&coin_type).unwrap_or(0);

    let balance = builder.spendable_balance(owner, &coin_type).await?;
    println!("{} {}", format_amount(balance, decimals), symbol.to_uppercase());
    Ok(())
}

async fn show_coins(builder: &TransactionBuilder<MemoryLedger>, owner: &str, symbol: &str) -> Result<()> {
    let coin_type = builder
        .registry()
        .coin_type_by_symbol(symbol)
        .ok_or_else(|| anyhow!("Unknown coin symbol: {}", symbol))?
        .clone();
    let decimals = builder.registry().decimals_of(&coin_type).unwrap_or(0);

    let coins = builder.list_coin_objects(owner, &coin_type).await?;
    println!("{} coin objects of {}", coins.len(), coin_type);
    for coin in coins {
        println!(
            "  {}  v{}  {}",
            coin.coin_object_id,
            coin.version,
            format_amount(coin.balance, decimals)
        );
    }
    Ok(())
}

async fn show_pool(builder: &TransactionBuilder<MemoryLedger>) -> Result<()> {
    let pool = builder.stake_pool_snapshot().await?;
    println!("Stake Pool:");
    println!("{}", serialize::to_json_pretty(&pool)?);
    Ok(())
}

/// Print an unsigned transaction and its digest, optionally writing it to a file
fn emit_transaction(tx: &PendingTransaction, out: Option<PathBuf>) -> Result<()> {
    let json = serialize::to_json_pretty(tx)?;
    let digest = tx.digest()?;

    if let Some(path) = out {
        std::fs::write(&path, &json)?;
        info!("Transaction saved to {:?}", path);
    }

    println!("{}", json);
    println!("Digest: {}", digest);
    Ok(())
}
