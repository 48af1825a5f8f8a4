//! Error handling for the ledger
//!
//! Expected rejections (bad signatures, empty pools, cancelled searches) are
//! reported through outcome enums. The variants here cover everything that
//! the caller has to translate into a failure.

use std::fmt;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, BlockchainError>;

/// Error types for ledger, wallet and codec operations
#[derive(Debug, Clone, PartialEq)]
pub enum BlockchainError {
    /// Cryptographic library errors (key generation, signing)
    Crypto(String),
    /// Configuration errors
    Config(String),
    /// File I/O errors, such as an unreadable config file
    Io(String),
    /// JSON encoding errors for wire views
    Serialization(String),
    /// Signature verification failed
    InvalidSignature,
    /// Missing or unparseable fields in an inbound request
    MalformedSubmission(String),
    /// Hex, key or signature decoding failure
    Decoding(String),
    /// Sender's confirmed balance does not cover the transfer
    InsufficientFunds(String),
    /// Mining attempted with nothing to seal
    EmptyPoolOnMine,
    /// A chain invariant was found broken; indicates a bug
    UnreachableChainState(String),
    /// Mining errors
    Mining(String),
    /// Proof-of-work search was cancelled
    MiningCancelled,
    /// Invalid address format
    InvalidAddress(String),
}

impl fmt::Display for BlockchainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockchainError::Crypto(msg) => write!(f, "Cryptographic error: {msg}"),
            BlockchainError::Config(msg) => write!(f, "Configuration error: {msg}"),
            BlockchainError::Io(msg) => write!(f, "I/O error: {msg}"),
            BlockchainError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            BlockchainError::InvalidSignature => write!(f, "Invalid transaction signature"),
            BlockchainError::MalformedSubmission(msg) => {
                write!(f, "Malformed submission: {msg}")
            }
            BlockchainError::Decoding(msg) => write!(f, "Decoding error: {msg}"),
            BlockchainError::InsufficientFunds(msg) => write!(f, "Insufficient funds: {msg}"),
            BlockchainError::EmptyPoolOnMine => write!(f, "No pending transactions to mine"),
            BlockchainError::UnreachableChainState(msg) => {
                write!(f, "Chain invariant violated: {msg}")
            }
            BlockchainError::Mining(msg) => write!(f, "Mining error: {msg}"),
            BlockchainError::MiningCancelled => write!(f, "Mining was cancelled"),
            BlockchainError::InvalidAddress(addr) => write!(f, "Invalid address: {addr}"),
        }
    }
}

impl std::error::Error for BlockchainError {}

impl From<std::io::Error> for BlockchainError {
    fn from(err: std::io::Error) -> Self {
        BlockchainError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for BlockchainError {
    fn from(err: toml::de::Error) -> Self {
        BlockchainError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for BlockchainError {
    fn from(err: serde_json::Error) -> Self {
        BlockchainError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invariant_violation_is_displayed_distinctly() {
        let err = BlockchainError::UnreachableChainState("broken link at 3".to_string());
        assert_eq!(err.to_string(), "Chain invariant violated: broken link at 3");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: BlockchainError = io.into();
        assert!(matches!(err, BlockchainError::Io(msg) if msg.contains("missing")));
    }
}
