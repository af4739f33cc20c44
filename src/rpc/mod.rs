//! JSON-RPC client abstraction
//!
//! [`EthRpc`] is the narrow set of node calls the client needs. The
//! production implementation is [`HttpRpc`]; tests drive the same code
//! through a scripted mock.

mod http;
#[cfg(test)]
pub(crate) mod mock;

pub use http::HttpRpc;

use crate::error::Result;
use crate::types::Receipt;
use alloy::primitives::{Address, Bytes, TxHash, U256};

/// Parameters of an `eth_call` / `eth_estimateGas` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    pub from: Option<Address>,
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
    pub gas_price: Option<u128>,
}

impl CallRequest {
    /// Read-only call with no sender
    pub fn new(to: Address, data: impl Into<Bytes>) -> Self {
        Self {
            from: None,
            to,
            value: U256::ZERO,
            data: data.into(),
            gas_price: None,
        }
    }

    pub fn with_from(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }

    pub fn with_gas_price(mut self, gas_price: u128) -> Self {
        self.gas_price = Some(gas_price);
        self
    }
}

/// Node calls used by the transaction lifecycle and contract reads
///
/// Every method is a suspension point. Implementations map transport and
/// node errors to [`crate::Error::Network`].
pub trait EthRpc: Send + Sync {
    /// `eth_getTransactionCount` at the `pending` block tag
    fn pending_nonce(&self, address: Address)
        -> impl std::future::Future<Output = Result<u64>> + Send;

    /// `eth_gasPrice`
    fn gas_price(&self) -> impl std::future::Future<Output = Result<u128>> + Send;

    /// `eth_estimateGas`
    fn estimate_gas(
        &self,
        request: CallRequest,
    ) -> impl std::future::Future<Output = Result<u64>> + Send;

    /// `eth_call` against the latest block
    fn call(&self, request: CallRequest) -> impl std::future::Future<Output = Result<Bytes>> + Send;

    /// `eth_sendRawTransaction`
    fn send_raw_transaction(
        &self,
        raw: Bytes,
    ) -> impl std::future::Future<Output = Result<TxHash>> + Send;

    /// `eth_getTransactionReceipt`; `Ok(None)` while the transaction is not mined
    fn transaction_receipt(
        &self,
        hash: TxHash,
    ) -> impl std::future::Future<Output = Result<Option<Receipt>>> + Send;

    /// `eth_blockNumber`
    fn block_number(&self) -> impl std::future::Future<Output = Result<u64>> + Send;

    /// `eth_chainId`
    fn chain_id(&self) -> impl std::future::Future<Output = Result<u64>> + Send;
}
