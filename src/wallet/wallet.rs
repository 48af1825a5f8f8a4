use crate::core::TransactionRecord;
use crate::error::{BlockchainError, Result};
use crate::utils::{
    base58_decode, base58_encode, ecdsa_p256_sha256_sign, key_pair_from_parts,
    key_pair_from_pkcs8, new_key_pair, private_scalar_from_pkcs8, ripemd160_digest,
    sha256_digest,
};
use crate::wallet::{PrivateKey, PublicKey, Signature};
use ring::signature::KeyPair;
use zeroize::Zeroize;

const VERSION: u8 = 0x00;
pub const ADDRESS_CHECK_SUM_LEN: usize = 4;
const PUB_KEY_HASH_LEN: usize = 20;
/// version + pub_key_hash + checksum
pub const ADDRESS_PAYLOAD_LEN: usize = 1 + PUB_KEY_HASH_LEN + ADDRESS_CHECK_SUM_LEN;

/// A P-256 identity: key pair plus the address derived from it
#[derive(Clone)]
pub struct Wallet {
    private_key: PrivateKey,
    public_key: PublicKey,
    address: String,
}

impl Wallet {
    pub fn new() -> Result<Wallet> {
        let mut pkcs8 = new_key_pair()?;
        let wallet = Self::from_pkcs8(&pkcs8);
        pkcs8.zeroize();
        wallet
    }

    fn from_pkcs8(pkcs8: &[u8]) -> Result<Wallet> {
        let key_pair = key_pair_from_pkcs8(pkcs8)?;
        let public_key = PublicKey::from_uncompressed(key_pair.public_key().as_ref())?;
        let mut scalar = private_scalar_from_pkcs8(pkcs8)?;
        let private_key = PrivateKey::from_bytes(&scalar);
        scalar.zeroize();
        Ok(Self::from_parts(private_key?, public_key))
    }

    /// Rebuild a wallet from its hex halves; fails if they do not belong together
    pub fn from_hex(private_key_hex: &str, public_key_hex: &str) -> Result<Wallet> {
        let private_key = PrivateKey::from_hex(private_key_hex)?;
        let public_key = PublicKey::from_hex(public_key_hex)?;
        key_pair_from_parts(private_key.as_bytes(), &public_key.to_uncompressed())?;
        Ok(Self::from_parts(private_key, public_key))
    }

    fn from_parts(private_key: PrivateKey, public_key: PublicKey) -> Wallet {
        let address = derive_address(&public_key);
        Wallet {
            private_key,
            public_key,
            address,
        }
    }

    pub fn get_address(&self) -> &str {
        self.address.as_str()
    }

    pub fn get_public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn get_private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// Sign the canonical bytes of `tx`. ECDSA runs over their SHA-256 digest.
    pub fn sign(&self, tx: &TransactionRecord) -> Result<Signature> {
        self.sign_message(&tx.canonical_bytes())
    }

    pub fn sign_message(&self, message: &[u8]) -> Result<Signature> {
        let key_pair = key_pair_from_parts(
            self.private_key.as_bytes(),
            &self.public_key.to_uncompressed(),
        )
        .map_err(|e| BlockchainError::Crypto(e.to_string()))?;
        let raw = ecdsa_p256_sha256_sign(&key_pair, message)?;
        Signature::from_bytes(&raw)
    }
}

/// RIPEMD160(SHA256(x || y))
pub fn hash_pub_key(public_key: &PublicKey) -> Vec<u8> {
    let pub_key_sha256 = sha256_digest(public_key.as_xy());
    ripemd160_digest(pub_key_sha256.as_slice())
}

fn checksum(payload: &[u8]) -> Vec<u8> {
    let first_sha = sha256_digest(payload);
    let second_sha = sha256_digest(first_sha.as_slice());
    second_sha[0..ADDRESS_CHECK_SUM_LEN].to_vec()
}

pub fn derive_address(public_key: &PublicKey) -> String {
    convert_address(&hash_pub_key(public_key))
}

pub fn convert_address(pub_key_hash: &[u8]) -> String {
    let mut payload: Vec<u8> = Vec::with_capacity(ADDRESS_PAYLOAD_LEN);
    payload.push(VERSION);
    payload.extend(pub_key_hash);
    let checksum = checksum(payload.as_slice());
    payload.extend(checksum.as_slice());
    base58_encode(payload.as_slice())
}

pub fn validate_address(address: &str) -> bool {
    let payload = match base58_decode(address) {
        Ok(payload) => payload,
        Err(_) => return false,
    };

    if payload.len() != ADDRESS_PAYLOAD_LEN || payload[0] != VERSION {
        return false;
    }

    let (versioned, actual_checksum) = payload.split_at(payload.len() - ADDRESS_CHECK_SUM_LEN);
    actual_checksum == checksum(versioned).as_slice()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::verify_signature;

    #[test]
    fn test_new_wallet_has_valid_address() {
        let wallet = Wallet::new().unwrap();
        assert!(validate_address(wallet.get_address()));
        assert!(wallet.get_address().starts_with('1'));
        assert_eq!(wallet.get_public_key().to_hex().len(), 128);
        assert_eq!(wallet.get_private_key().to_hex().len(), 64);
    }

    #[test]
    fn test_address_is_pure_function_of_public_key() {
        let wallet = Wallet::new().unwrap();
        let again = derive_address(wallet.get_public_key());
        assert_eq!(again, wallet.get_address());

        let other = Wallet::new().unwrap();
        assert_ne!(other.get_address(), wallet.get_address());
    }

    #[test]
    fn test_address_payload_layout() {
        let wallet = Wallet::new().unwrap();
        let payload = base58_decode(wallet.get_address()).unwrap();
        assert_eq!(payload.len(), 25);
        assert_eq!(payload[0], 0x00);
        assert_eq!(&payload[1..21], hash_pub_key(wallet.get_public_key()).as_slice());
    }

    #[test]
    fn test_known_public_key_address() {
        // Fixed point bytes, so the address must never change across releases
        let key = PublicKey::from_xy(&[0x01; 64]).unwrap();
        let address = derive_address(&key);
        assert_eq!(address, "136xFXCuuUMECJUD9dJH5nY8hVqv4iiWzE");
        assert!(validate_address(&address));
    }

    #[test]
    fn test_validate_address_rejects_corruption() {
        let wallet = Wallet::new().unwrap();
        let mut payload = base58_decode(wallet.get_address()).unwrap();
        payload[5] ^= 0x01;
        assert!(!validate_address(&base58_encode(&payload)));
        assert!(!validate_address("not-base58-0OIl"));
        assert!(!validate_address(&base58_encode(&[0u8; 10])));
    }

    #[test]
    fn test_from_hex_round_trip() {
        let wallet = Wallet::new().unwrap();
        let restored = Wallet::from_hex(
            &wallet.get_private_key().to_hex(),
            &wallet.get_public_key().to_hex(),
        )
        .unwrap();
        assert_eq!(restored.get_address(), wallet.get_address());
    }

    #[test]
    fn test_from_hex_rejects_mismatched_halves() {
        let a = Wallet::new().unwrap();
        let b = Wallet::new().unwrap();
        let result = Wallet::from_hex(&a.get_private_key().to_hex(), &b.get_public_key().to_hex());
        assert!(matches!(result, Err(BlockchainError::Decoding(_))));
    }

    #[test]
    fn test_signature_verifies_against_record() {
        let wallet = Wallet::new().unwrap();
        let tx = TransactionRecord::new(wallet.get_address(), "recipient", 4.25);
        let signature = wallet.sign(&tx).unwrap();
        assert!(verify_signature(wallet.get_public_key(), &signature, &tx));

        let other = Wallet::new().unwrap();
        assert!(!verify_signature(other.get_public_key(), &signature, &tx));
    }
}
