//! # Ledger Chain - a minimal signed, proof-of-work ledger
//!
//! An append-only chain of blocks, each bundling value transfers and sealed
//! by a leading-zero proof-of-work search. Transfers are authorised with
//! ECDSA P-256 signatures and accounts are Base58Check addresses derived
//! from the signer's public key.
//!
//! ## How the code is organized
//! - `core/`: blocks, transfers, the canonical codec, the ledger and mining
//! - `wallet/`: key pairs, address derivation, signing, key/signature hex codec
//! - `service/`: node- and wallet-facing entry points for transport adapters
//! - `storage/`: the in-memory pending pool
//! - `config/`: mining parameters and admission policy
//! - `utils/`: hashing, Base58 and ECDSA primitives
//! - `cli/`: command-line argument parsing for the binary
//!
//! ## Flow of a transfer
//! 1. A wallet builds a [`TransactionRecord`] and signs its canonical bytes
//! 2. [`NodeService::submit_transaction`] decodes the hex key and signature
//! 3. [`Blockchain::add_transaction`] re-derives the canonical digest, verifies
//!    the signature and appends the record to the pending pool
//! 4. [`Blockchain::mine`] seals the pool plus a reward record into a block
//!
//! The ledger keeps everything in memory; one instance is shared between
//! adapters through an `Arc`.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod service;
pub mod storage;
pub mod utils;
pub mod wallet;

#[cfg(test)]
pub mod testnet;

pub use cli::{Command, Opt};
pub use config::LedgerConfig;
pub use crate::core::{
    verify_signature, Admission, Block, BlockHash, BlockView, Blockchain, CancelHandle,
    MineOutcome, MiningScheduler, PowOutcome, ProofOfWork, TransactionRecord, TransactionView,
    MINING_SENDER,
};
pub use error::{BlockchainError, Result};
pub use service::{
    AmountView, NodeService, PoolView, TransactionRequest, WalletInfo, WalletService,
    WalletTransactionRequest,
};
pub use storage::MemoryPool;
pub use wallet::{derive_address, validate_address, PrivateKey, PublicKey, Signature, Wallet};
