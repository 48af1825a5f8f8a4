//! Mining constants for the ledger
//!
//! These are the defaults behind [`crate::config::LedgerConfig`]; a node
//! can override any of them through its configuration.

/// Reserved sender identifier for system-generated reward records.
/// Records from this sender are admitted without a signature.
pub const MINING_SENDER: &str = "0x0";

/// Reward credited to the miner for every sealed block
pub const MINING_REWARD: f64 = 10.0;

/// Leading zero hex digits required in a sealed block's hash
pub const MINING_DIFFICULTY: usize = 4;

/// Period of the scheduled mining trigger
pub const MINING_INTERVAL_SECS: u64 = 30;

/// Proof-of-work iterations between cancellation checks
pub const CANCEL_CHECK_INTERVAL: u64 = 1024;

/// Largest difficulty a SHA-256 hex digest can satisfy
pub const MAX_DIFFICULTY: usize = 64;
