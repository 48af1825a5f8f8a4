//! Test utilities for ledger testing

use crate::config::LedgerConfig;
use crate::core::{Blockchain, TransactionRecord};
use crate::error::Result;
use crate::wallet::{Signature, Wallet};

/// Difficulty 1 keeps mining in the microsecond range
pub fn fast_config() -> LedgerConfig {
    LedgerConfig {
        difficulty: 1,
        cancel_check_interval: 64,
        ..LedgerConfig::default()
    }
}

/// Create an in-memory ledger with fast mining
pub fn create_test_ledger(miner_address: &str) -> Blockchain {
    Blockchain::new(miner_address, fast_config()).expect("fast config is valid")
}

/// Create test wallets with distinct addresses
pub fn create_test_wallets(count: usize) -> Result<Vec<Wallet>> {
    (0..count).map(|_| Wallet::new()).collect()
}

/// Build a transfer from `wallet` and sign it
pub fn signed_transfer(
    wallet: &Wallet,
    recipient: &str,
    amount: f64,
) -> (TransactionRecord, Signature) {
    let tx = TransactionRecord::new(wallet.get_address(), recipient, amount);
    let signature = wallet.sign(&tx).expect("signing with a fresh wallet succeeds");
    (tx, signature)
}

/// Submit a signed transfer straight to the ledger
pub fn submit_signed_transfer(
    ledger: &Blockchain,
    wallet: &Wallet,
    recipient: &str,
    amount: f64,
) -> bool {
    let (tx, signature) = signed_transfer(wallet, recipient, amount);
    ledger.add_transaction(
        tx.get_sender(),
        tx.get_recipient(),
        tx.get_amount(),
        Some(wallet.get_public_key()),
        Some(&signature),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_ledger() {
        let ledger = create_test_ledger("miner");
        assert_eq!(ledger.get_chain_length().unwrap(), 1);
        assert_eq!(ledger.get_config().difficulty, 1);
    }

    #[test]
    fn test_create_test_wallets() {
        let wallets = create_test_wallets(5).unwrap();
        assert_eq!(wallets.len(), 5);

        // All addresses should be unique
        for i in 0..wallets.len() {
            for j in i + 1..wallets.len() {
                assert_ne!(wallets[i].get_address(), wallets[j].get_address());
            }
        }
    }

    #[test]
    fn test_submit_signed_transfer() {
        let ledger = create_test_ledger("miner");
        let wallet = Wallet::new().unwrap();
        assert!(submit_signed_transfer(&ledger, &wallet, "bob", 1.0));
        assert_eq!(ledger.get_pending_count().unwrap(), 1);
    }
}
