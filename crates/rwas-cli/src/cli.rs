use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// RWAS - real-estate tokenization marketplace client
#[derive(Parser)]
#[command(name = "rwas")]
#[command(about = "Build unsigned RWAS marketplace transactions")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "rwas.json")]
    pub config: PathBuf,

    /// Path to ledger snapshot file
    #[arg(short, long, global = true, default_value = "ledger.json")]
    pub ledger: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a sample configuration and ledger snapshot
    Init,

    /// Show the spendable balance of a coin
    Balance {
        /// Owner address
        #[arg(long)]
        owner: String,
        /// Coin symbol (RWAS, USDC or a yield token)
        #[arg(long, default_value = "RWAS")]
        symbol: String,
    },

    /// List the coin objects held for a coin
    Coins {
        /// Owner address
        #[arg(long)]
        owner: String,
        /// Coin symbol (RWAS, USDC or a yield token)
        #[arg(long, default_value = "RWAS")]
        symbol: String,
    },

    /// Build a stake transaction
    Stake {
        /// Staking address
        #[arg(long)]
        owner: String,
        /// Amount of RWAS, e.g. 5 or 0.25
        #[arg(long)]
        amount: String,
        /// Output file (JSON)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Build a yield token mint transaction (admin)
    Mint {
        /// Yield token symbol
        #[arg(long)]
        symbol: String,
        /// Amount of yield token
        #[arg(long)]
        amount: String,
        /// Recipient address
        #[arg(long)]
        recipient: String,
        /// Output file (JSON)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Build a yield token purchase transaction
    Purchase {
        /// Yield token symbol
        #[arg(long)]
        symbol: String,
        /// Amount of stablecoin to pay
        #[arg(long)]
        amount: String,
        /// Paying and receiving address
        #[arg(long)]
        recipient: String,
        /// Output file (JSON)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Show the staking pool
    Pool,

    /// Show the amount staked by a user
    UserStake {
        /// User address
        #[arg(long)]
        user: String,
    },
}
