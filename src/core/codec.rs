//! Canonical byte encoding for hashing and signing
//!
//! The layout here is fixed and independent of any wire format:
//!
//! - transaction: `u32 len ‖ sender ‖ u32 len ‖ recipient ‖ f64 bits`
//! - block: `u64 nonce ‖ prev_hash[32] ‖ i64 timestamp ‖ u32 count ‖ transaction*`
//!
//! All integers are big-endian. The signer and the verifier both call
//! [`encode_transaction`], so an encoding change breaks every signature.

use crate::core::{Block, TransactionRecord};

fn put_str(out: &mut Vec<u8>, value: &str) {
    out.extend((value.len() as u32).to_be_bytes());
    out.extend(value.as_bytes());
}

/// Negative zero is folded into zero so both spellings of 0 sign identically
fn amount_bits(amount: f64) -> u64 {
    if amount == 0.0 {
        0.0f64.to_bits()
    } else {
        amount.to_bits()
    }
}

pub fn encode_transaction(tx: &TransactionRecord) -> Vec<u8> {
    let mut out = Vec::with_capacity(16 + tx.get_sender().len() + tx.get_recipient().len());
    put_str(&mut out, tx.get_sender());
    put_str(&mut out, tx.get_recipient());
    out.extend(amount_bits(tx.get_amount()).to_be_bytes());
    out
}

pub fn encode_block(block: &Block) -> Vec<u8> {
    let mut out = vec![];
    out.extend(block.get_nonce().to_be_bytes());
    out.extend(block.get_prev_hash().as_bytes());
    out.extend(block.get_timestamp().to_be_bytes());
    out.extend((block.get_transactions().len() as u32).to_be_bytes());
    for tx in block.get_transactions() {
        out.extend(encode_transaction(tx));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BlockHash;

    #[test]
    fn test_transaction_layout() {
        let tx = TransactionRecord::new("ab", "c", 1.0);
        let bytes = encode_transaction(&tx);

        let mut expected = vec![0, 0, 0, 2, b'a', b'b', 0, 0, 0, 1, b'c'];
        expected.extend(1.0f64.to_bits().to_be_bytes());
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_field_boundaries_are_unambiguous() {
        let a = TransactionRecord::new("ab", "c", 1.0);
        let b = TransactionRecord::new("a", "bc", 1.0);
        assert_ne!(encode_transaction(&a), encode_transaction(&b));
    }

    #[test]
    fn test_negative_zero_matches_zero() {
        let pos = TransactionRecord::new("a", "b", 0.0);
        let neg = TransactionRecord::new("a", "b", -0.0);
        assert_eq!(encode_transaction(&pos), encode_transaction(&neg));
    }

    #[test]
    fn test_amount_precision_is_preserved() {
        let a = TransactionRecord::new("a", "b", 0.1);
        let b = TransactionRecord::new("a", "b", 0.1f32 as f64);
        assert_ne!(encode_transaction(&a), encode_transaction(&b));
    }

    #[test]
    fn test_block_layout_length() {
        let tx = TransactionRecord::new("a", "b", 5.0);
        let block = Block::with_timestamp(42, 7, BlockHash::zero(), vec![tx.clone()]);
        let bytes = encode_block(&block);
        assert_eq!(bytes.len(), 8 + 32 + 8 + 4 + encode_transaction(&tx).len());
        assert_eq!(&bytes[..8], &7u64.to_be_bytes());
        assert_eq!(&bytes[40..48], &42i64.to_be_bytes());
    }
}
