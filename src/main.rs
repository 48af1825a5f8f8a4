// Thin CLI over the ledger core. Everything here is wiring: parse arguments,
// load configuration, call the service layer and print JSON.

use clap::Parser;
use ledger_chain::{
    Blockchain, Command, LedgerConfig, NodeService, Opt, Result, TransactionRecord, Wallet,
    WalletService,
};
use log::{error, info, LevelFilter};
use std::process;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(200);

fn main() {
    env_logger::builder().filter_level(LevelFilter::Info).init();

    let opt = Opt::parse();

    if let Err(e) = run_command(opt) {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn load_config(opt: &Opt) -> Result<LedgerConfig> {
    let config = match &opt.config {
        Some(path) => LedgerConfig::load(path)?,
        None => LedgerConfig::default(),
    };
    config.with_env_overrides()
}

fn run_command(opt: Opt) -> Result<()> {
    let config = load_config(&opt)?;
    match opt.command {
        Command::Createwallet => {
            let info = WalletService::new().create_wallet()?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Command::Sign {
            private_key,
            public_key,
            sender,
            recipient,
            amount,
        } => {
            let signature = WalletService::new()
                .sign_transaction(&private_key, &public_key, &sender, &recipient, amount)?;
            println!("{signature}");
        }
        Command::Demo { amount } => {
            let miner = Wallet::new()?;
            let node = NodeService::new(Arc::new(Blockchain::new(miner.get_address(), config)?));
            let alice = Wallet::new()?;
            let bob = Wallet::new()?;

            submit_transfer(&node, &alice, bob.get_address(), amount)?;
            node.trigger_mine()?.into_result()?;

            println!("{}", serde_json::to_string_pretty(&node.read_chain()?)?);
            for (name, address) in [
                ("alice", alice.get_address()),
                ("bob", bob.get_address()),
                ("miner", miner.get_address()),
            ] {
                println!("{name} {address}: {}", node.balance(address)?.amount);
            }
        }
        Command::MineLoop { blocks } => {
            let interval = config.mining_interval();
            let miner = Wallet::new()?;
            let node = NodeService::new(Arc::new(Blockchain::new(miner.get_address(), config)?));
            let sender = Wallet::new()?;
            node.start_scheduled_mining(interval)?;

            for _ in 0..blocks {
                let target = node.get_ledger().get_chain_length()? + 1;
                submit_transfer(&node, &sender, miner.get_address(), 1.0)?;
                while node.get_ledger().get_chain_length()? < target {
                    thread::sleep(POLL_INTERVAL);
                }
                info!("Chain length is now {target}");
            }
            node.shutdown()?;
            println!("{}", serde_json::to_string_pretty(&node.read_chain()?)?);
        }
    }
    Ok(())
}

fn submit_transfer(
    node: &NodeService,
    from: &Wallet,
    to: &str,
    amount: f64,
) -> Result<()> {
    let tx = TransactionRecord::new(from.get_address(), to, amount);
    let signature = from.sign(&tx)?;
    node.submit_transaction(
        tx.get_sender(),
        tx.get_recipient(),
        tx.get_amount(),
        &from.get_public_key().to_hex(),
        &signature.to_hex(),
    )?
    .into_result()?;
    Ok(())
}
