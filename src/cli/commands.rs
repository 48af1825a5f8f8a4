use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "ledger-chain")]
pub struct Opt {
    #[arg(long = "config", global = true, help = "Path to a TOML ledger config")]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(name = "createwallet", about = "Create a new wallet and print its keys")]
    Createwallet,
    #[command(name = "sign", about = "Sign a transfer with a wallet's keys")]
    Sign {
        #[arg(long = "private-key", help = "Sender private key (64 hex chars)")]
        private_key: String,
        #[arg(long = "public-key", help = "Sender public key (128 hex chars)")]
        public_key: String,
        #[arg(help = "Sender address")]
        sender: String,
        #[arg(help = "Recipient address")]
        recipient: String,
        #[arg(help = "Amount to transfer")]
        amount: f64,
    },
    #[command(
        name = "demo",
        about = "Run a signed transfer between two fresh wallets and mine it"
    )]
    Demo {
        #[arg(default_value_t = 10.0, help = "Amount to transfer")]
        amount: f64,
    },
    #[command(
        name = "mine-loop",
        about = "Mine on a schedule until the given number of blocks are sealed"
    )]
    MineLoop {
        #[arg(long = "blocks", default_value_t = 1, help = "Blocks to seal before stopping")]
        blocks: usize,
    },
}
