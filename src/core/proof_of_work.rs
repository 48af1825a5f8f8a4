use crate::core::codec::encode_block;
use crate::core::monetary::MAX_DIFFICULTY;
use crate::core::{Block, BlockHash, TransactionRecord};
use crate::error::{BlockchainError, Result};
use crate::utils::sha256_array;
use log::{debug, info};
use num_bigint::BigUint;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// Nonce occupies the first 8 bytes of the canonical block encoding
const NONCE_LEN: usize = 8;

/// Result of a nonce search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowOutcome {
    Found(u64),
    /// Cancellation was observed before a nonce was found
    Cancelled,
    /// The whole nonce space was searched without a hit
    Exhausted,
}

/// Shared cancellation flag checked cooperatively by the search loop
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> CancelHandle {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

pub struct ProofOfWork {
    candidate: Block,
    target: BigUint,
    difficulty: usize,
}

impl ProofOfWork {
    /// Fixes the candidate's timestamp now; only the nonce varies during the search
    pub fn new(
        transactions: Vec<TransactionRecord>,
        prev_hash: BlockHash,
        difficulty: usize,
    ) -> Result<ProofOfWork> {
        let candidate = Block::new(0, prev_hash, transactions)?;
        Self::from_candidate(candidate, difficulty)
    }

    pub fn from_candidate(candidate: Block, difficulty: usize) -> Result<ProofOfWork> {
        Ok(ProofOfWork {
            candidate,
            target: Self::target_for(difficulty)?,
            difficulty,
        })
    }

    /// `difficulty` leading zero hex digits is the same as `hash < 2^(256 - 4 * difficulty)`
    pub fn target_for(difficulty: usize) -> Result<BigUint> {
        if difficulty > MAX_DIFFICULTY {
            return Err(BlockchainError::Config(format!(
                "Difficulty {difficulty} exceeds the maximum of {MAX_DIFFICULTY}"
            )));
        }
        Ok(BigUint::from(1u32) << (256 - 4 * difficulty))
    }

    pub fn get_difficulty(&self) -> usize {
        self.difficulty
    }

    pub fn get_candidate(&self) -> &Block {
        &self.candidate
    }

    fn prepare_data(&self) -> Vec<u8> {
        encode_block(&self.candidate)
    }

    fn hash_meets_target(&self, hash: &[u8]) -> bool {
        BigUint::from_bytes_be(hash) < self.target
    }

    /// Search nonces from 0 upwards, checking `cancel` every `check_interval` iterations
    pub fn run(&self, cancel: &CancelHandle, check_interval: u64) -> PowOutcome {
        self.run_with(|| cancel.is_cancelled(), check_interval)
    }

    /// Same search, stopping once `should_stop` returns true at a check point
    pub fn run_with<F>(&self, should_stop: F, check_interval: u64) -> PowOutcome
    where
        F: Fn() -> bool,
    {
        let check_interval = check_interval.max(1);
        let mut data = self.prepare_data();
        info!(
            "Mining on top of {} with difficulty {}",
            self.candidate.get_prev_hash(),
            self.difficulty
        );

        let mut nonce: u64 = 0;
        loop {
            if nonce % check_interval == 0 && should_stop() {
                info!("Proof-of-work cancelled at nonce {nonce}");
                return PowOutcome::Cancelled;
            }

            data[..NONCE_LEN].copy_from_slice(&nonce.to_be_bytes());
            let hash = sha256_array(&data);
            if self.hash_meets_target(&hash) {
                debug!("Found nonce {nonce}: {}", BlockHash::from_bytes(hash));
                return PowOutcome::Found(nonce);
            }

            nonce = match nonce.checked_add(1) {
                Some(next) => next,
                None => return PowOutcome::Exhausted,
            };
        }
    }

    /// The candidate with `nonce` filled in
    pub fn seal(&self, nonce: u64) -> Block {
        self.candidate.with_nonce(nonce)
    }

    /// Check a sealed block's own hash against `difficulty`
    pub fn validate(block: &Block, difficulty: usize) -> bool {
        meets_difficulty(&block.hash(), difficulty)
    }
}

/// True when the first `difficulty` hex digits of `hash` are all `'0'`
pub fn meets_difficulty(hash: &BlockHash, difficulty: usize) -> bool {
    match ProofOfWork::target_for(difficulty) {
        Ok(target) => BigUint::from_bytes_be(hash.as_bytes()) < target,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_transactions() -> Vec<TransactionRecord> {
        vec![
            TransactionRecord::new("alice", "bob", 1.5),
            TransactionRecord::new(crate::core::MINING_SENDER, "miner", 10.0),
        ]
    }

    fn mine(difficulty: usize) -> Block {
        let pow =
            ProofOfWork::new(sample_transactions(), BlockHash::from_bytes([9; 32]), difficulty)
                .unwrap();
        match pow.run(&CancelHandle::new(), 1024) {
            PowOutcome::Found(nonce) => pow.seal(nonce),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn test_found_nonce_has_leading_zero_hex_digits() {
        for difficulty in [1usize, 2, 4] {
            let block = mine(difficulty);
            let hex = block.hash_hex();
            assert_eq!(&hex[..difficulty], "0".repeat(difficulty));
            assert!(ProofOfWork::validate(&block, difficulty));
        }
    }

    #[test]
    fn test_found_nonce_is_the_first_valid_one() {
        let pow = ProofOfWork::new(sample_transactions(), BlockHash::zero(), 2).unwrap();
        let PowOutcome::Found(nonce) = pow.run(&CancelHandle::new(), 1) else {
            panic!("expected a nonce");
        };
        for earlier in 0..nonce {
            assert!(!ProofOfWork::validate(&pow.seal(earlier), 2));
        }
    }

    #[test]
    fn test_seal_keeps_candidate_timestamp() {
        let pow = ProofOfWork::new(sample_transactions(), BlockHash::zero(), 1).unwrap();
        let sealed = pow.seal(99);
        assert_eq!(sealed.get_timestamp(), pow.get_candidate().get_timestamp());
        assert_eq!(sealed.get_nonce(), 99);
    }

    #[test]
    fn test_cancelled_before_start() {
        let pow = ProofOfWork::new(sample_transactions(), BlockHash::zero(), 64).unwrap();
        let cancel = CancelHandle::new();
        cancel.cancel();
        assert_eq!(pow.run(&cancel, 1024), PowOutcome::Cancelled);
    }

    #[test]
    fn test_cancel_from_another_thread_stops_search() {
        // Difficulty 64 is unreachable in practice, so only cancellation ends the loop
        let pow = ProofOfWork::new(sample_transactions(), BlockHash::zero(), 64).unwrap();
        let cancel = CancelHandle::new();
        let remote = cancel.clone();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(50));
            remote.cancel();
        });
        assert_eq!(pow.run(&cancel, 256), PowOutcome::Cancelled);
        handle.join().unwrap();
    }

    #[test]
    fn test_run_with_checks_predicate_at_interval() {
        let pow = ProofOfWork::new(sample_transactions(), BlockHash::zero(), 64).unwrap();
        let checks = std::cell::Cell::new(0u32);
        let outcome = pow.run_with(
            || {
                checks.set(checks.get() + 1);
                checks.get() > 3
            },
            16,
        );
        assert_eq!(outcome, PowOutcome::Cancelled);
        assert_eq!(checks.get(), 4);
    }

    #[test]
    fn test_difficulty_zero_accepts_first_nonce() {
        let pow = ProofOfWork::new(vec![], BlockHash::zero(), 0).unwrap();
        assert_eq!(pow.run(&CancelHandle::new(), 1), PowOutcome::Found(0));
    }

    #[test]
    fn test_target_shrinks_with_difficulty() {
        let easy = ProofOfWork::target_for(1).unwrap();
        let hard = ProofOfWork::target_for(2).unwrap();
        assert!(hard < easy);
        assert!(ProofOfWork::target_for(65).is_err());
    }

    #[test]
    fn test_meets_difficulty_matches_hex_prefix() {
        let mut bytes = [0xffu8; 32];
        bytes[0] = 0x00;
        bytes[1] = 0x0f;
        let hash = BlockHash::from_bytes(bytes);
        assert!(meets_difficulty(&hash, 3));
        assert!(!meets_difficulty(&hash, 4));
    }
}
