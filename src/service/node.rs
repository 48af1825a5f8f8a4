// Node-facing interface: what a transport adapter calls to read the chain,
// submit transfers and drive mining. Hex decoding happens here so the ledger
// only ever sees typed keys and signatures.

use crate::core::{Admission, BlockView, Blockchain, MineOutcome, MiningScheduler, TransactionView};
use crate::error::{BlockchainError, Result};
use crate::wallet::{derive_address, PublicKey, Signature};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolView {
    pub transactions: Vec<TransactionView>,
    pub length: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmountView {
    pub amount: f64,
}

/// Inbound transfer as decoded from a transport payload; every field is required
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub sender_address: Option<String>,
    pub recipient_address: Option<String>,
    pub sender_public_key: Option<String>,
    pub amount: Option<f64>,
    pub signature: Option<String>,
}

fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| BlockchainError::MalformedSubmission(format!("missing field {field}")))
}

pub struct NodeService {
    ledger: Arc<Blockchain>,
    scheduler: Mutex<Option<MiningScheduler>>,
}

impl NodeService {
    pub fn new(ledger: Arc<Blockchain>) -> NodeService {
        NodeService {
            ledger,
            scheduler: Mutex::new(None),
        }
    }

    pub fn get_ledger(&self) -> &Arc<Blockchain> {
        &self.ledger
    }

    pub fn read_chain(&self) -> Result<Vec<BlockView>> {
        Ok(self
            .ledger
            .get_chain()?
            .iter()
            .map(|block| block.to_view())
            .collect())
    }

    pub fn read_pending_pool(&self) -> Result<PoolView> {
        let transactions: Vec<TransactionView> = self
            .ledger
            .get_pending_transactions()?
            .iter()
            .map(|tx| tx.to_view())
            .collect();
        Ok(PoolView {
            length: transactions.len(),
            transactions,
        })
    }

    /// Decode and admit a signed transfer.
    ///
    /// Decoding failures are errors; a bad signature is `Ok(Admission::InvalidSignature)`.
    pub fn submit_transaction(
        &self,
        sender: &str,
        recipient: &str,
        amount: f64,
        sender_public_key_hex: &str,
        signature_hex: &str,
    ) -> Result<Admission> {
        if sender == self.ledger.get_config().mining_sender {
            warn!("Rejected submission using the reserved mining sender");
            return Err(BlockchainError::MalformedSubmission(
                "sender address is reserved for mining rewards".to_string(),
            ));
        }
        if !amount.is_finite() || amount <= 0.0 {
            return Err(BlockchainError::MalformedSubmission(format!(
                "amount must be a positive number, got {amount}"
            )));
        }

        let public_key = PublicKey::from_hex(sender_public_key_hex)?;
        let signature = Signature::from_hex(signature_hex)?;
        if derive_address(&public_key) != sender {
            warn!("Rejected submission: public key does not belong to {sender}");
            return Err(BlockchainError::MalformedSubmission(
                "public key does not match sender address".to_string(),
            ));
        }

        self.ledger.try_add_transaction(
            sender,
            recipient,
            amount,
            Some(&public_key),
            Some(&signature),
        )
    }

    pub fn submit_request(&self, request: &TransactionRequest) -> Result<Admission> {
        let sender = required(&request.sender_address, "sender_address")?;
        let recipient = required(&request.recipient_address, "recipient_address")?;
        let public_key = required(&request.sender_public_key, "sender_public_key")?;
        let signature = required(&request.signature, "signature")?;
        let amount = request
            .amount
            .ok_or_else(|| BlockchainError::MalformedSubmission("missing field amount".to_string()))?;
        self.submit_transaction(sender, recipient, amount, public_key, signature)
    }

    pub fn trigger_mine(&self) -> Result<MineOutcome> {
        self.ledger.try_mine()
    }

    fn scheduler_slot(&self) -> Result<MutexGuard<'_, Option<MiningScheduler>>> {
        self.scheduler
            .lock()
            .map_err(|_| BlockchainError::Mining("scheduler lock poisoned".to_string()))
    }

    /// Returns false if a schedule is already running.
    /// Fails once the ledger has been shut down.
    pub fn start_scheduled_mining(&self, interval: Duration) -> Result<bool> {
        if self.ledger.is_shut_down() {
            return Err(BlockchainError::MiningCancelled);
        }
        let mut slot = self.scheduler_slot()?;
        if slot.as_ref().map(|s| s.is_running()).unwrap_or(false) {
            return Ok(false);
        }
        *slot = Some(MiningScheduler::start(Arc::clone(&self.ledger), interval));
        Ok(true)
    }

    /// Stop the schedule if one is running; returns the number of blocks it sealed
    pub fn stop_scheduled_mining(&self) -> Result<Option<usize>> {
        let scheduler = self.scheduler_slot()?.take();
        Ok(scheduler.map(MiningScheduler::stop))
    }

    pub fn balance(&self, address: &str) -> Result<AmountView> {
        Ok(AmountView {
            amount: self.ledger.balance(address)?,
        })
    }

    /// Cancel any in-flight search, then stop the schedule
    pub fn shutdown(&self) -> Result<()> {
        self.ledger.shutdown();
        if let Some(sealed) = self.stop_scheduled_mining()? {
            info!("Node shut down; scheduled mining sealed {sealed} blocks");
        }
        Ok(())
    }
}
