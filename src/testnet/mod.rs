//! Test helpers
//!
//! Fast-mining ledgers, throwaway wallets and signed transfers for unit tests.

pub mod test_utils;

pub use test_utils::*;
