//! Key material and transaction signing
//!
//! Keys live in a [`KeyRing`] indexed by player. Transactions are signed
//! locally as EIP-155 legacy transactions and submitted raw, exactly once.
//! A rejected submission is returned to the caller and never retried here,
//! since resending needs a fresh nonce.

mod local;

pub use local::KeyRing;

use crate::error::{Error, Result};
use crate::rpc::EthRpc;
use crate::tx::UnsignedTransaction;
use alloy::consensus::{SignableTransaction, Signed, TxEnvelope, TxLegacy};
use alloy::eips::Encodable2718;
use alloy::network::TxSignerSync;
use alloy::primitives::{Bytes, TxHash};
use alloy::signers::local::PrivateKeySigner;

/// A signed legacy transaction ready for `eth_sendRawTransaction`
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    inner: Signed<TxLegacy>,
    raw: Bytes,
}

impl SignedTransaction {
    /// Hash of the signed transaction as the network computes it
    pub fn hash(&self) -> TxHash {
        *self.inner.hash()
    }

    /// Network encoding (RLP for legacy transactions)
    pub fn raw(&self) -> &Bytes {
        &self.raw
    }

    pub fn tx(&self) -> &TxLegacy {
        self.inner.tx()
    }

    pub fn signed(&self) -> &Signed<TxLegacy> {
        &self.inner
    }
}

/// Sign with EIP-155 replay protection (the chain id is part of the signed payload)
pub fn sign(unsigned: &UnsignedTransaction, key: &PrivateKeySigner) -> Result<SignedTransaction> {
    let mut tx = unsigned.to_legacy();
    let signature = key
        .sign_transaction_sync(&mut tx)
        .map_err(|e| Error::Signing(e.to_string()))?;

    let signed = tx.into_signed(signature);
    let raw = Bytes::from(TxEnvelope::Legacy(signed.clone()).encoded_2718());

    Ok(SignedTransaction { inner: signed, raw })
}

/// Sign and submit; returns the hash reported by the node
pub async fn sign_and_send<R: EthRpc>(
    rpc: &R,
    unsigned: &UnsignedTransaction,
    key: &PrivateKeySigner,
) -> Result<TxHash> {
    let signed = sign(unsigned, key)?;
    let local_hash = signed.hash();

    tracing::debug!(
        nonce = unsigned.nonce,
        gas_limit = unsigned.gas_limit,
        to = %unsigned.to,
        "Submitting transaction {}",
        local_hash
    );

    let hash = rpc.send_raw_transaction(signed.raw.clone()).await?;
    if hash != local_hash {
        tracing::warn!("Node reported hash {} for locally computed {}", hash, local_hash);
    }

    tracing::info!("Transaction sent: {}", hash);
    Ok(hash)
}
