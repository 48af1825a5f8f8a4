// Wallet-facing interface: key creation and signing for a transport adapter.

use crate::core::TransactionRecord;
use crate::error::{BlockchainError, Result};
use crate::service::TransactionRequest;
use crate::wallet::Wallet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Everything a client needs to hold an identity
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletInfo {
    pub address: String,
    pub public_key_hex: String,
    pub private_key_hex: String,
}

impl fmt::Debug for WalletInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletInfo")
            .field("address", &self.address)
            .field("public_key_hex", &self.public_key_hex)
            .finish_non_exhaustive()
    }
}

/// Transfer request as entered by a wallet user; amount arrives as text
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct WalletTransactionRequest {
    pub sender_private_key: Option<String>,
    pub sender_public_key: Option<String>,
    pub sender_address: Option<String>,
    pub recipient_address: Option<String>,
    pub amount: Option<String>,
}

fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| BlockchainError::MalformedSubmission(format!("missing field {field}")))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WalletService;

impl WalletService {
    pub fn new() -> WalletService {
        WalletService
    }

    pub fn create_wallet(&self) -> Result<WalletInfo> {
        let wallet = Wallet::new()?;
        Ok(WalletInfo {
            address: wallet.get_address().to_string(),
            public_key_hex: wallet.get_public_key().to_hex(),
            private_key_hex: wallet.get_private_key().to_hex(),
        })
    }

    /// Canonically encode the transfer and sign it, returning the signature hex.
    /// The public half is needed to rebuild the signing key.
    pub fn sign_transaction(
        &self,
        private_key_hex: &str,
        public_key_hex: &str,
        sender: &str,
        recipient: &str,
        amount: f64,
    ) -> Result<String> {
        let wallet = Wallet::from_hex(private_key_hex, public_key_hex)?;
        let tx = TransactionRecord::new(sender, recipient, amount);
        Ok(wallet.sign(&tx)?.to_hex())
    }

    /// Validate a wallet request, sign it and produce the node-facing request
    pub fn build_transaction_request(
        &self,
        request: &WalletTransactionRequest,
    ) -> Result<TransactionRequest> {
        let private_key = required(&request.sender_private_key, "sender_private_key")?;
        let public_key = required(&request.sender_public_key, "sender_public_key")?;
        let sender = required(&request.sender_address, "sender_address")?;
        let recipient = required(&request.recipient_address, "recipient_address")?;
        let amount_text = required(&request.amount, "amount")?;

        let amount: f64 = amount_text.trim().parse().map_err(|e| {
            BlockchainError::MalformedSubmission(format!("invalid amount {amount_text:?}: {e}"))
        })?;
        if !amount.is_finite() || amount <= 0.0 {
            return Err(BlockchainError::MalformedSubmission(format!(
                "amount must be a positive number, got {amount_text}"
            )));
        }

        let signature = self.sign_transaction(private_key, public_key, sender, recipient, amount)?;
        Ok(TransactionRequest {
            sender_address: Some(sender.to_string()),
            recipient_address: Some(recipient.to_string()),
            sender_public_key: Some(public_key.to_string()),
            amount: Some(amount),
            signature: Some(signature),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::verify_signature;
    use crate::wallet::{validate_address, PublicKey, Signature};

    #[test]
    fn test_create_wallet_fields() {
        let info = WalletService::new().create_wallet().unwrap();
        assert!(validate_address(&info.address));
        assert_eq!(info.public_key_hex.len(), 128);
        assert_eq!(info.private_key_hex.len(), 64);
        assert!(!format!("{info:?}").contains(&info.private_key_hex));
    }

    #[test]
    fn test_sign_transaction_verifies() {
        let service = WalletService::new();
        let info = service.create_wallet().unwrap();
        let signature_hex = service
            .sign_transaction(
                &info.private_key_hex,
                &info.public_key_hex,
                &info.address,
                "bob",
                10.0,
            )
            .unwrap();
        assert_eq!(signature_hex.len(), 128);

        let public_key = PublicKey::from_hex(&info.public_key_hex).unwrap();
        let signature = Signature::from_hex(&signature_hex).unwrap();
        let tx = TransactionRecord::new(&info.address, "bob", 10.0);
        assert!(verify_signature(&public_key, &signature, &tx));
    }

    #[test]
    fn test_sign_transaction_rejects_bad_key() {
        let service = WalletService::new();
        let err = service
            .sign_transaction("abc", &"00".repeat(64), "a", "b", 1.0)
            .unwrap_err();
        assert!(matches!(err, BlockchainError::Decoding(_)));
    }

    #[test]
    fn test_build_request_parses_amount() {
        let service = WalletService::new();
        let info = service.create_wallet().unwrap();
        let request = WalletTransactionRequest {
            sender_private_key: Some(info.private_key_hex.clone()),
            sender_public_key: Some(info.public_key_hex.clone()),
            sender_address: Some(info.address.clone()),
            recipient_address: Some("bob".to_string()),
            amount: Some(" 2.5 ".to_string()),
        };
        let built = service.build_transaction_request(&request).unwrap();
        assert_eq!(built.amount, Some(2.5));
        assert_eq!(built.sender_public_key.as_deref(), Some(info.public_key_hex.as_str()));
        assert_eq!(built.signature.map(|s| s.len()), Some(128));
    }

    #[test]
    fn test_build_request_rejects_missing_and_unparseable_fields() {
        let service = WalletService::new();
        let mut request = WalletTransactionRequest {
            sender_private_key: Some("00".repeat(32)),
            sender_public_key: Some("00".repeat(64)),
            sender_address: Some("alice".to_string()),
            recipient_address: None,
            amount: Some("1".to_string()),
        };
        assert!(matches!(
            service.build_transaction_request(&request),
            Err(BlockchainError::MalformedSubmission(_))
        ));

        request.recipient_address = Some("bob".to_string());
        request.amount = Some("ten".to_string());
        assert!(matches!(
            service.build_transaction_request(&request),
            Err(BlockchainError::MalformedSubmission(_))
        ));
    }
}
