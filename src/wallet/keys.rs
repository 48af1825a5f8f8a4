//! Fixed-width hex codec for key material and signatures
//!
//! Every value is lowercase hex with each half padded to the P-256 field
//! width (32 bytes, 64 hex characters) and concatenated without separators.

use crate::error::{BlockchainError, Result};
use crate::utils::{PRIVATE_KEY_LEN, UNCOMPRESSED_POINT_LEN};
use data_encoding::HEXLOWER;
use num_bigint::BigUint;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Width of one curve coordinate or signature half in bytes
pub const FIELD_LEN: usize = 32;

const SEC1_UNCOMPRESSED_TAG: u8 = 0x04;

fn decode_fixed_hex(input: &str, expected_bytes: usize, what: &str) -> Result<Vec<u8>> {
    if input.len() != expected_bytes * 2 {
        return Err(BlockchainError::Decoding(format!(
            "{what} must be {} hex characters, got {}",
            expected_bytes * 2,
            input.len()
        )));
    }
    HEXLOWER
        .decode(input.as_bytes())
        .map_err(|e| BlockchainError::Decoding(format!("Invalid {what} hex: {e}")))
}

/// Public point on P-256 stored as `x || y`
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey {
    point: [u8; FIELD_LEN * 2],
}

impl PublicKey {
    /// From the SEC1 uncompressed form `0x04 || x || y`
    pub fn from_uncompressed(bytes: &[u8]) -> Result<PublicKey> {
        if bytes.len() != UNCOMPRESSED_POINT_LEN || bytes[0] != SEC1_UNCOMPRESSED_TAG {
            return Err(BlockchainError::Decoding(
                "Public key must be a 65-byte uncompressed point".to_string(),
            ));
        }
        Self::from_xy(&bytes[1..])
    }

    /// From the 64-byte concatenation `x || y`
    pub fn from_xy(bytes: &[u8]) -> Result<PublicKey> {
        let point: [u8; FIELD_LEN * 2] = bytes.try_into().map_err(|_| {
            BlockchainError::Decoding(format!(
                "Public key must be {} bytes, got {}",
                FIELD_LEN * 2,
                bytes.len()
            ))
        })?;
        Ok(PublicKey { point })
    }

    pub fn from_hex(input: &str) -> Result<PublicKey> {
        let bytes = decode_fixed_hex(input, FIELD_LEN * 2, "public key")?;
        Self::from_xy(&bytes)
    }

    pub fn to_hex(&self) -> String {
        HEXLOWER.encode(&self.point)
    }

    pub fn x(&self) -> &[u8] {
        &self.point[..FIELD_LEN]
    }

    pub fn y(&self) -> &[u8] {
        &self.point[FIELD_LEN..]
    }

    /// `x || y`, the input to address derivation
    pub fn as_xy(&self) -> &[u8] {
        &self.point
    }

    pub fn to_uncompressed(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(UNCOMPRESSED_POINT_LEN);
        out.push(SEC1_UNCOMPRESSED_TAG);
        out.extend_from_slice(&self.point);
        out
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

/// Private scalar, wiped from memory on drop
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    scalar: [u8; PRIVATE_KEY_LEN],
}

impl PrivateKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<PrivateKey> {
        let scalar: [u8; PRIVATE_KEY_LEN] = bytes.try_into().map_err(|_| {
            BlockchainError::Decoding(format!(
                "Private key must be {PRIVATE_KEY_LEN} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(PrivateKey { scalar })
    }

    pub fn from_hex(input: &str) -> Result<PrivateKey> {
        let mut bytes = decode_fixed_hex(input, PRIVATE_KEY_LEN, "private key")?;
        let key = Self::from_bytes(&bytes);
        bytes.zeroize();
        key
    }

    pub fn to_hex(&self) -> String {
        HEXLOWER.encode(&self.scalar)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.scalar
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey").finish_non_exhaustive()
    }
}

/// ECDSA signature halves `(r, s)`, each at most [`FIELD_LEN`] bytes wide
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    r: BigUint,
    s: BigUint,
}

fn check_half(half: &BigUint, name: &str) -> Result<()> {
    if half.bits() > (FIELD_LEN * 8) as u64 {
        return Err(BlockchainError::Decoding(format!(
            "Signature half {name} does not fit in {FIELD_LEN} bytes"
        )));
    }
    Ok(())
}

impl Signature {
    pub fn new(r: BigUint, s: BigUint) -> Result<Signature> {
        check_half(&r, "r")?;
        check_half(&s, "s")?;
        Ok(Signature { r, s })
    }

    /// From the fixed 64-byte `r || s` form produced by ring
    pub fn from_bytes(bytes: &[u8]) -> Result<Signature> {
        if bytes.len() != FIELD_LEN * 2 {
            return Err(BlockchainError::Decoding(format!(
                "Signature must be {} bytes, got {}",
                FIELD_LEN * 2,
                bytes.len()
            )));
        }
        Ok(Signature {
            r: BigUint::from_bytes_be(&bytes[..FIELD_LEN]),
            s: BigUint::from_bytes_be(&bytes[FIELD_LEN..]),
        })
    }

    pub fn from_hex(input: &str) -> Result<Signature> {
        let bytes = decode_fixed_hex(input, FIELD_LEN * 2, "signature")?;
        Self::from_bytes(&bytes)
    }

    /// Fixed-width `r || s`, each half left-padded with zeros
    pub fn to_fixed_bytes(&self) -> [u8; FIELD_LEN * 2] {
        let mut out = [0u8; FIELD_LEN * 2];
        for (half, slot) in [&self.r, &self.s].into_iter().zip(out.chunks_mut(FIELD_LEN)) {
            let bytes = half.to_bytes_be();
            slot[FIELD_LEN - bytes.len()..].copy_from_slice(&bytes);
        }
        out
    }

    /// Always 128 lowercase hex characters
    pub fn to_hex(&self) -> String {
        HEXLOWER.encode(&self.to_fixed_bytes())
    }

    pub fn r(&self) -> &BigUint {
        &self.r
    }

    pub fn s(&self) -> &BigUint {
        &self.s
    }
}
