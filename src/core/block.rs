use crate::core::codec::encode_block;
use crate::core::{TransactionRecord, TransactionView};
use crate::error::Result;
use crate::utils::{current_timestamp, sha256_array};
use data_encoding::HEXLOWER;
use serde::{Deserialize, Serialize};
use std::fmt;

/// SHA-256 digest of a block's canonical encoding
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BlockHash([u8; 32]);

impl BlockHash {
    pub fn zero() -> BlockHash {
        BlockHash([0u8; 32])
    }

    pub fn from_bytes(bytes: [u8; 32]) -> BlockHash {
        BlockHash(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        HEXLOWER.encode(&self.0)
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockHash({})", self.to_hex())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    timestamp: i64,
    nonce: u64,
    prev_hash: BlockHash,
    transactions: Vec<TransactionRecord>,
}

impl Block {
    /// Stamps the block with the current time in nanoseconds
    pub fn new(
        nonce: u64,
        prev_hash: BlockHash,
        transactions: Vec<TransactionRecord>,
    ) -> Result<Block> {
        Ok(Self::with_timestamp(
            current_timestamp()?,
            nonce,
            prev_hash,
            transactions,
        ))
    }

    pub fn with_timestamp(
        timestamp: i64,
        nonce: u64,
        prev_hash: BlockHash,
        transactions: Vec<TransactionRecord>,
    ) -> Block {
        Block {
            timestamp,
            nonce,
            prev_hash,
            transactions,
        }
    }

    /// The all-zero block whose hash anchors the genesis block
    pub fn zero() -> Block {
        Self::with_timestamp(0, 0, BlockHash::zero(), vec![])
    }

    pub fn generate_genesis_block(timestamp: i64) -> Block {
        Self::with_timestamp(timestamp, 0, Block::zero().hash(), vec![])
    }

    /// Same contents and timestamp, different nonce
    pub fn with_nonce(&self, nonce: u64) -> Block {
        Block {
            nonce,
            ..self.clone()
        }
    }

    pub fn hash(&self) -> BlockHash {
        BlockHash(sha256_array(&encode_block(self)))
    }

    pub fn hash_hex(&self) -> String {
        self.hash().to_hex()
    }

    pub fn get_transactions(&self) -> &[TransactionRecord] {
        self.transactions.as_slice()
    }

    pub fn get_prev_hash(&self) -> &BlockHash {
        &self.prev_hash
    }

    pub fn get_timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn get_nonce(&self) -> u64 {
        self.nonce
    }

    pub fn to_view(&self) -> BlockView {
        BlockView {
            hash: self.hash_hex(),
            prev_hash: self.prev_hash.to_hex(),
            nonce: self.nonce,
            timestamp: self.timestamp,
            transactions: self.transactions.iter().map(|tx| tx.to_view()).collect(),
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "nonce:     {}", self.nonce)?;
        writeln!(f, "prev_hash: {}", self.prev_hash)?;
        write!(f, "timestamp: {}", self.timestamp)?;
        for tx in &self.transactions {
            write!(f, "\n{tx}")?;
        }
        Ok(())
    }
}

/// Serializable block as surfaced to the node adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockView {
    pub hash: String,
    pub prev_hash: String,
    pub nonce: u64,
    pub timestamp: i64,
    pub transactions: Vec<TransactionView>,
}
