//! Wallet management and cryptographic operations
//!
//! This module handles key generation, address derivation, transaction
//! signing, and the hex codec for keys and signatures.

pub mod keys;
#[allow(clippy::module_inception)]
pub mod wallet;

pub use keys::{PrivateKey, PublicKey, Signature, FIELD_LEN};
pub use wallet::{
    convert_address, derive_address, hash_pub_key, validate_address, Wallet,
    ADDRESS_CHECK_SUM_LEN, ADDRESS_PAYLOAD_LEN,
};
