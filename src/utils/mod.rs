//! Utility functions and helpers
//!
//! Hashing, Base58 and the ECDSA P-256 primitives used by the wallet and
//! the ledger's signature check.

pub mod crypto;

pub use crypto::{
    base58_decode, base58_encode, current_timestamp, ecdsa_p256_sha256_sign,
    ecdsa_p256_sha256_sign_verify, key_pair_from_parts,
    key_pair_from_pkcs8, new_key_pair, private_scalar_from_pkcs8, ripemd160_digest, sha256_array,
    sha256_digest, PRIVATE_KEY_LEN, UNCOMPRESSED_POINT_LEN,
};
