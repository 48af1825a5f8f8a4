use ring::digest::{Context, SHA256};
use ring::rand::SystemRandom;
use ring::signature::{EcdsaKeyPair, ECDSA_P256_SHA256_FIXED, ECDSA_P256_SHA256_FIXED_SIGNING};
use ripemd::{Digest as RipemdDigest, Ripemd160};

use crate::error::{BlockchainError, Result};
use std::time::{SystemTime, UNIX_EPOCH};

/// Length of a P-256 private scalar in bytes
pub const PRIVATE_KEY_LEN: usize = 32;

/// Length of an uncompressed SEC1 P-256 point (0x04 || x || y)
pub const UNCOMPRESSED_POINT_LEN: usize = 65;

// ring 0.17 emits PKCS#8 v1 documents for P-256 from a fixed template:
// header (36 bytes) || private scalar (32) || public key tag (5) || 0x04 || x || y
// The template is internal to ring and must be rechecked on a ring upgrade;
// test_private_scalar_rebuilds_same_key_pair fails if it drifts.
const PKCS8_P256_HEADER: [u8; 36] = [
    0x30, 0x81, 0x87, 0x02, 0x01, 0x00, 0x30, 0x13, 0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x3d,
    0x02, 0x01, 0x06, 0x08, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x03, 0x01, 0x07, 0x04, 0x6d, 0x30,
    0x6b, 0x02, 0x01, 0x01, 0x04, 0x20,
];
const PKCS8_P256_PUBLIC_TAG: [u8; 5] = [0xa1, 0x44, 0x03, 0x42, 0x00];
const PKCS8_P256_LEN: usize =
    PKCS8_P256_HEADER.len() + PRIVATE_KEY_LEN + PKCS8_P256_PUBLIC_TAG.len() + UNCOMPRESSED_POINT_LEN;

/// Nanoseconds since the Unix epoch
pub fn current_timestamp() -> Result<i64> {
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| BlockchainError::Crypto(format!("System time error: {e}")))?
        .as_nanos();

    // Ensure the timestamp fits in i64
    if duration > i64::MAX as u128 {
        return Err(BlockchainError::Crypto("Timestamp overflow".to_string()));
    }

    Ok(duration as i64)
}

pub fn sha256_digest(data: &[u8]) -> Vec<u8> {
    let mut context = Context::new(&SHA256);
    context.update(data);
    let digest = context.finish();
    digest.as_ref().to_vec()
}

/// SHA-256 as a fixed 32-byte array
pub fn sha256_array(data: &[u8]) -> [u8; 32] {
    let mut context = Context::new(&SHA256);
    context.update(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(context.finish().as_ref());
    out
}

pub fn ripemd160_digest(data: &[u8]) -> Vec<u8> {
    let mut hasher = Ripemd160::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

pub fn base58_encode(data: &[u8]) -> String {
    bs58::encode(data).into_string()
}

pub fn base58_decode(data: &str) -> Result<Vec<u8>> {
    bs58::decode(data)
        .into_vec()
        .map_err(|e| BlockchainError::InvalidAddress(format!("Invalid base58 encoding: {e}")))
}

/// Generate a fresh P-256 key pair as a PKCS#8 document
pub fn new_key_pair() -> Result<Vec<u8>> {
    let rng = SystemRandom::new();
    let pkcs8 = EcdsaKeyPair::generate_pkcs8(&ECDSA_P256_SHA256_FIXED_SIGNING, &rng)
        .map_err(|e| BlockchainError::Crypto(format!("Failed to generate ECDSA key pair: {e}")))?
        .as_ref()
        .to_vec();
    Ok(pkcs8)
}

pub fn key_pair_from_pkcs8(pkcs8: &[u8]) -> Result<EcdsaKeyPair> {
    let rng = SystemRandom::new();
    EcdsaKeyPair::from_pkcs8(&ECDSA_P256_SHA256_FIXED_SIGNING, pkcs8, &rng)
        .map_err(|e| BlockchainError::Crypto(format!("Failed to create key pair from PKCS8: {e}")))
}

/// Rebuild a signing key from a raw private scalar and its uncompressed public point.
/// ring checks that the two halves belong together.
pub fn key_pair_from_parts(private_key: &[u8], public_point: &[u8]) -> Result<EcdsaKeyPair> {
    let rng = SystemRandom::new();
    EcdsaKeyPair::from_private_key_and_public_key(
        &ECDSA_P256_SHA256_FIXED_SIGNING,
        private_key,
        public_point,
        &rng,
    )
    .map_err(|e| BlockchainError::Decoding(format!("Private and public key do not match: {e}")))
}

/// Extract the raw private scalar from a ring-generated P-256 PKCS#8 document
pub fn private_scalar_from_pkcs8(pkcs8: &[u8]) -> Result<Vec<u8>> {
    if pkcs8.len() != PKCS8_P256_LEN || !pkcs8.starts_with(&PKCS8_P256_HEADER) {
        return Err(BlockchainError::Decoding(
            "Unsupported PKCS8 layout for P-256 private key".to_string(),
        ));
    }
    let start = PKCS8_P256_HEADER.len();
    let end = start + PRIVATE_KEY_LEN;
    if pkcs8[end..end + PKCS8_P256_PUBLIC_TAG.len()] != PKCS8_P256_PUBLIC_TAG {
        return Err(BlockchainError::Decoding(
            "Unsupported PKCS8 layout for P-256 public key".to_string(),
        ));
    }
    Ok(pkcs8[start..end].to_vec())
}

/// Sign `message` with ECDSA P-256 over SHA-256(message).
///
/// ring derives each nonce from fresh `SystemRandom` output mixed with the key
/// and the message digest, so two signatures never share a nonce.
pub fn ecdsa_p256_sha256_sign(key_pair: &EcdsaKeyPair, message: &[u8]) -> Result<Vec<u8>> {
    let rng = SystemRandom::new();
    let signature = key_pair
        .sign(&rng, message)
        .map_err(|e| BlockchainError::Crypto(format!("Failed to sign message: {e}")))?
        .as_ref()
        .to_vec();
    Ok(signature)
}

pub fn ecdsa_p256_sha256_sign_verify(public_key: &[u8], signature: &[u8], message: &[u8]) -> bool {
    let peer_public_key =
        ring::signature::UnparsedPublicKey::new(&ECDSA_P256_SHA256_FIXED, public_key);
    let result = peer_public_key.verify(message, signature.as_ref());
    result.is_ok()
}
