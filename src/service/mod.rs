//! Adapter-facing interfaces
//!
//! Thin entry points that transport layers (HTTP, CLI) call into. They
//! decode hex, validate requests and shape results into serializable views.

pub mod node;
pub mod wallet;

pub use node::{AmountView, NodeService, PoolView, TransactionRequest};
pub use wallet::{WalletInfo, WalletService, WalletTransactionRequest};
