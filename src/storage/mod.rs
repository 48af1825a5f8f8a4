//! In-memory storage
//!
//! The ledger keeps its chain and pending transactions in memory only.

pub mod memory_pool;

pub use memory_pool::MemoryPool;
