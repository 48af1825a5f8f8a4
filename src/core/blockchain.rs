// This is the ledger: the append-only chain plus the pool of pending transfers.
// Every mutation goes through one write lock, so admission and mining are
// serialized and a mining cycle always sees a stable pool.

use crate::config::LedgerConfig;
use crate::core::{Block, BlockHash, CancelHandle, PowOutcome, ProofOfWork, TransactionRecord};
use crate::error::{BlockchainError, Result};
use crate::storage::MemoryPool;
use crate::utils::{current_timestamp, ecdsa_p256_sha256_sign_verify};
use crate::wallet::{PublicKey, Signature};
use log::{debug, error, info, warn};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Outcome of offering a transfer to the pending pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Accepted,
    InvalidSignature,
    /// A non-reward record arrived without a public key or signature
    MissingCredentials,
    /// Only produced when strict balance checking is enabled
    InsufficientBalance,
}

impl Admission {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Admission::Accepted)
    }

    pub fn into_result(self) -> Result<()> {
        match self {
            Admission::Accepted => Ok(()),
            Admission::InvalidSignature => Err(BlockchainError::InvalidSignature),
            Admission::MissingCredentials => Err(BlockchainError::MalformedSubmission(
                "public key and signature are required".to_string(),
            )),
            Admission::InsufficientBalance => Err(BlockchainError::InsufficientFunds(
                "sender balance is below the transfer amount".to_string(),
            )),
        }
    }
}

/// Outcome of one mining cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MineOutcome {
    Sealed {
        height: usize,
        hash: BlockHash,
        nonce: u64,
    },
    /// Nothing pending; no block was produced
    EmptyPool,
    /// The search was cancelled; chain and pool are unchanged
    Cancelled,
}

impl MineOutcome {
    pub fn is_sealed(&self) -> bool {
        matches!(self, MineOutcome::Sealed { .. })
    }

    pub fn into_result(self) -> Result<(usize, BlockHash)> {
        match self {
            MineOutcome::Sealed { height, hash, .. } => Ok((height, hash)),
            MineOutcome::EmptyPool => Err(BlockchainError::EmptyPoolOnMine),
            MineOutcome::Cancelled => Err(BlockchainError::MiningCancelled),
        }
    }
}

struct LedgerState {
    chain: Vec<Block>,
    pool: MemoryPool,
}

pub struct Blockchain {
    state: RwLock<LedgerState>,
    miner_address: String,
    config: LedgerConfig,
    cancel: CancelHandle,
}

impl Blockchain {
    /// Create a ledger holding only the genesis block
    pub fn new(miner_address: &str, config: LedgerConfig) -> Result<Blockchain> {
        config.validate()?;
        let timestamp = match config.genesis_timestamp {
            Some(timestamp) => timestamp,
            None => current_timestamp()?,
        };
        let genesis = Block::generate_genesis_block(timestamp);
        info!("Created genesis block {}", genesis.hash());

        Ok(Blockchain {
            state: RwLock::new(LedgerState {
                chain: vec![genesis],
                pool: MemoryPool::new(),
            }),
            miner_address: miner_address.to_string(),
            config,
            cancel: CancelHandle::new(),
        })
    }

    pub fn with_default_config(miner_address: &str) -> Result<Blockchain> {
        Self::new(miner_address, LedgerConfig::default())
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, LedgerState>> {
        self.state.read().map_err(|_| {
            BlockchainError::UnreachableChainState("ledger lock poisoned".to_string())
        })
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, LedgerState>> {
        self.state.write().map_err(|_| {
            BlockchainError::UnreachableChainState("ledger lock poisoned".to_string())
        })
    }

    pub fn get_miner_address(&self) -> &str {
        self.miner_address.as_str()
    }

    pub fn get_config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Abort any running proof-of-work search and refuse to seal further blocks
    pub fn shutdown(&self) {
        info!("Shutting down ledger, cancelling mining");
        self.cancel.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn add_transaction(
        &self,
        sender: &str,
        recipient: &str,
        amount: f64,
        sender_public_key: Option<&PublicKey>,
        signature: Option<&Signature>,
    ) -> bool {
        match self.try_add_transaction(sender, recipient, amount, sender_public_key, signature) {
            Ok(admission) => admission.is_accepted(),
            Err(e) => {
                error!("Failed to admit transaction: {e}");
                false
            }
        }
    }

    pub fn try_add_transaction(
        &self,
        sender: &str,
        recipient: &str,
        amount: f64,
        sender_public_key: Option<&PublicKey>,
        signature: Option<&Signature>,
    ) -> Result<Admission> {
        let tx = TransactionRecord::new(sender, recipient, amount);

        if sender == self.config.mining_sender {
            debug!("Admitting mining reward record for {recipient}");
            self.write_state()?.pool.add(tx);
            return Ok(Admission::Accepted);
        }

        let (Some(public_key), Some(signature)) = (sender_public_key, signature) else {
            warn!("Rejected transaction from {sender}: missing public key or signature");
            return Ok(Admission::MissingCredentials);
        };

        // Signature checks need no ledger state and run outside the lock
        if !verify_signature(public_key, signature, &tx) {
            warn!("Rejected transaction from {sender}: invalid signature");
            return Ok(Admission::InvalidSignature);
        }

        let mut state = self.write_state()?;
        if self.config.strict_balance {
            let available = balance_of(&state.chain, sender);
            if available < amount {
                warn!("Rejected transaction from {sender}: balance {available} below {amount}");
                return Ok(Admission::InsufficientBalance);
            }
        }

        state.pool.add(tx);
        Ok(Admission::Accepted)
    }

    pub fn mine(&self) -> bool {
        match self.try_mine() {
            Ok(outcome) => outcome.is_sealed(),
            Err(e) => {
                error!("Mining failed: {e}");
                false
            }
        }
    }

    /// Seal the pending pool plus a reward record into a new block.
    ///
    /// The write lock is held from the pool snapshot until the pool is reset.
    pub fn try_mine(&self) -> Result<MineOutcome> {
        self.try_mine_with(&CancelHandle::new())
    }

    /// Like [`Blockchain::try_mine`], but the search also stops when `cancel`
    /// is tripped. Cancelling through `cancel` leaves the ledger able to mine.
    pub fn try_mine_with(&self, cancel: &CancelHandle) -> Result<MineOutcome> {
        let mut state = self.write_state()?;
        if state.pool.is_empty() {
            debug!("No pending transactions, nothing to mine");
            return Ok(MineOutcome::EmptyPool);
        }

        let mut transactions = state.pool.get_all();
        transactions.push(TransactionRecord::new(
            &self.config.mining_sender,
            &self.miner_address,
            self.config.mining_reward,
        ));

        let prev_hash = last_block(&state.chain)?.hash();
        let pow = ProofOfWork::new(transactions, prev_hash, self.config.difficulty)?;
        let stop = || self.cancel.is_cancelled() || cancel.is_cancelled();
        let nonce = match pow.run_with(stop, self.config.cancel_check_interval) {
            PowOutcome::Found(nonce) => nonce,
            PowOutcome::Cancelled => {
                warn!("Mining cancelled, {} pending transactions kept", state.pool.len());
                return Ok(MineOutcome::Cancelled);
            }
            PowOutcome::Exhausted => {
                return Err(BlockchainError::Mining(
                    "nonce space exhausted without a valid proof".to_string(),
                ));
            }
        };

        let block = pow.seal(nonce);
        let hash = block.hash();
        append_block(&mut state.chain, block, self.config.difficulty)?;
        state.pool.clear();

        let height = state.chain.len() - 1;
        info!("Sealed block {height} with nonce {nonce}: {hash}");
        Ok(MineOutcome::Sealed {
            height,
            hash,
            nonce,
        })
    }

    /// Net amount received by `address` over every confirmed block.
    /// Pending transactions are not counted.
    pub fn balance(&self, address: &str) -> Result<f64> {
        let state = self.read_state()?;
        Ok(balance_of(&state.chain, address))
    }

    pub fn get_chain(&self) -> Result<Vec<Block>> {
        Ok(self.read_state()?.chain.clone())
    }

    pub fn get_chain_length(&self) -> Result<usize> {
        Ok(self.read_state()?.chain.len())
    }

    pub fn get_last_block_hash(&self) -> Result<BlockHash> {
        let state = self.read_state()?;
        Ok(last_block(&state.chain)?.hash())
    }

    pub fn get_pending_transactions(&self) -> Result<Vec<TransactionRecord>> {
        Ok(self.read_state()?.pool.get_all())
    }

    pub fn get_pending_count(&self) -> Result<usize> {
        Ok(self.read_state()?.pool.len())
    }

    /// Re-check genesis shape, hash links and proof-of-work over the whole chain
    pub fn validate_chain(&self) -> Result<()> {
        let state = self.read_state()?;
        check_chain(&state.chain, self.config.difficulty).map_err(|e| {
            error!("{e}");
            e
        })
    }
}

pub fn verify_signature(
    public_key: &PublicKey,
    signature: &Signature,
    tx: &TransactionRecord,
) -> bool {
    let signature_bytes = signature.to_fixed_bytes();
    ecdsa_p256_sha256_sign_verify(
        &public_key.to_uncompressed(),
        &signature_bytes,
        &tx.canonical_bytes(),
    )
}

fn balance_of(chain: &[Block], address: &str) -> f64 {
    let mut amount = 0.0;
    for block in chain {
        for tx in block.get_transactions() {
            if tx.get_sender() == address {
                amount -= tx.get_amount();
            }
            if tx.get_recipient() == address {
                amount += tx.get_amount();
            }
        }
    }
    amount
}

fn last_block(chain: &[Block]) -> Result<&Block> {
    chain.last().ok_or_else(|| {
        error!("Chain invariant violated: chain is empty");
        BlockchainError::UnreachableChainState("chain is empty".to_string())
    })
}

fn append_block(chain: &mut Vec<Block>, block: Block, difficulty: usize) -> Result<()> {
    let tip = last_block(chain)?.hash();
    if *block.get_prev_hash() != tip {
        error!(
            "Chain invariant violated: block links to {} but tip is {tip}",
            block.get_prev_hash()
        );
        return Err(BlockchainError::UnreachableChainState(format!(
            "new block does not link to tip {tip}"
        )));
    }
    if !ProofOfWork::validate(&block, difficulty) {
        error!("Chain invariant violated: sealed block {} fails proof-of-work", block.hash());
        return Err(BlockchainError::UnreachableChainState(
            "sealed block fails proof-of-work".to_string(),
        ));
    }
    chain.push(block);
    Ok(())
}

fn check_chain(chain: &[Block], difficulty: usize) -> Result<()> {
    let genesis = chain.first().ok_or_else(|| {
        BlockchainError::UnreachableChainState("chain is empty".to_string())
    })?;
    if genesis.get_nonce() != 0
        || !genesis.get_transactions().is_empty()
        || *genesis.get_prev_hash() != Block::zero().hash()
    {
        return Err(BlockchainError::UnreachableChainState(
            "genesis block is malformed".to_string(),
        ));
    }

    for (height, pair) in chain.windows(2).enumerate() {
        let (prev, current) = (&pair[0], &pair[1]);
        if *current.get_prev_hash() != prev.hash() {
            return Err(BlockchainError::UnreachableChainState(format!(
                "block {} does not link to block {height}",
                height + 1
            )));
        }
        if !ProofOfWork::validate(current, difficulty) {
            return Err(BlockchainError::UnreachableChainState(format!(
                "block {} fails proof-of-work",
                height + 1
            )));
        }
    }
    Ok(())
}
