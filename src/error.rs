//! Error types for the tic-tac-toe client
//!
//! Every failure surfaced by the crate is one [`Error`] value. Only the
//! "receipt not found yet" condition inside the receipt poller is retried
//! internally; everything else terminates the operation.

use alloy::primitives::{Address, TxHash};

/// Crate-wide result alias
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Typed failure of a client operation
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing or invalid binding, profile, ABI entry or configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Bad caller input, rejected before any network call
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Missing or malformed key material, or the signer refused to sign
    #[error("Signing error: {0}")]
    Signing(String),

    /// A JSON-RPC call failed (transport error or node rejection)
    #[error("Network error in {method}: {message}")]
    Network {
        method: &'static str,
        message: String,
    },

    /// Polling budget exhausted without ever seeing a receipt
    #[error("No receipt for transaction {hash} after {attempts} attempts")]
    ReceiptTimeout { hash: TxHash, attempts: u32 },

    /// Receipt found but its status is not success
    #[error("Transaction {hash} failed on-chain (status: {status:?})")]
    OnChainFailure { hash: TxHash, status: Option<u64> },

    /// Transaction succeeded but the expected log is absent
    #[error("Transaction {hash} succeeded but emitted no {event} event from {address}")]
    EventNotFound {
        hash: TxHash,
        event: &'static str,
        address: Address,
    },

    /// Return data or log payload did not match the expected ABI shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// The client was shut down while the operation was waiting
    #[error("Operation cancelled")]
    Cancelled,
}

impl Error {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub(crate) fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    pub(crate) fn network(method: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Network {
            method,
            message: err.to_string(),
        }
    }

    /// Whether retrying the whole operation (with a fresh nonce) could help
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::ReceiptTimeout { .. })
    }
}
