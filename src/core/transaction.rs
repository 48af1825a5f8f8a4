// A transaction here is a plain value transfer between two opaque addresses.
// The ledger never looks inside an address, it only compares strings.

use crate::core::codec::encode_transaction;
use crate::utils::sha256_array;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    sender_address: String,
    recipient_address: String,
    amount: f64,
}

impl TransactionRecord {
    pub fn new(sender_address: &str, recipient_address: &str, amount: f64) -> TransactionRecord {
        TransactionRecord {
            sender_address: sender_address.to_string(),
            recipient_address: recipient_address.to_string(),
            amount,
        }
    }

    pub fn get_sender(&self) -> &str {
        self.sender_address.as_str()
    }

    pub fn get_recipient(&self) -> &str {
        self.recipient_address.as_str()
    }

    pub fn get_amount(&self) -> f64 {
        self.amount
    }

    /// Canonical bytes, the only input to signing and verification
    pub fn canonical_bytes(&self) -> Vec<u8> {
        encode_transaction(self)
    }

    /// SHA-256 of the canonical bytes
    pub fn digest(&self) -> [u8; 32] {
        sha256_array(&self.canonical_bytes())
    }

    pub fn to_view(&self) -> TransactionView {
        TransactionView {
            sender_address: self.sender_address.clone(),
            recipient_address: self.recipient_address.clone(),
            amount: self.amount,
        }
    }
}

impl fmt::Display for TransactionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "-".repeat(50))?;
        writeln!(f, "sender_address:    {}", self.sender_address)?;
        writeln!(f, "recipient_address: {}", self.recipient_address)?;
        write!(f, "amount:            {:.1}", self.amount)
    }
}

/// Wire representation used by adapters. Never fed to the hasher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionView {
    pub sender_address: String,
    pub recipient_address: String,
    pub amount: f64,
}

impl From<&TransactionView> for TransactionRecord {
    fn from(view: &TransactionView) -> Self {
        TransactionRecord::new(&view.sender_address, &view.recipient_address, view.amount)
    }
}
