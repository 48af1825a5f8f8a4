//! Core ledger functionality
//!
//! This module contains the fundamental ledger components including
//! blocks, transactions, the canonical codec, the chain itself and
//! proof-of-work mining.

pub mod block;
pub mod blockchain;
pub mod codec;
pub mod monetary;
pub mod proof_of_work;
pub mod scheduler;
pub mod transaction;

pub use block::{Block, BlockHash, BlockView};
pub use blockchain::{verify_signature, Admission, Blockchain, MineOutcome};
pub use codec::{encode_block, encode_transaction};
pub use monetary::{MINING_DIFFICULTY, MINING_INTERVAL_SECS, MINING_REWARD, MINING_SENDER};
pub use proof_of_work::{meets_difficulty, CancelHandle, PowOutcome, ProofOfWork};
pub use scheduler::MiningScheduler;
pub use transaction::{TransactionRecord, TransactionView};
