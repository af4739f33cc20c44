//! Unsigned legacy transaction assembly

use crate::error::{Error, Result};
use crate::rpc::{CallRequest, EthRpc};
use alloy::consensus::TxLegacy;
use alloy::primitives::{Address, Bytes, TxKind, U256};

/// What to call; nonce, gas and chain id are filled in by [`TxBuilder`]
#[derive(Debug, Clone)]
pub struct TxRequest {
    /// Target contract address
    pub to: Address,
    /// Encoded calldata
    pub data: Bytes,
    /// Known-safe gas ceiling; `None` estimates via `eth_estimateGas`
    pub gas_limit: Option<u64>,
}

impl TxRequest {
    /// Create a new transaction request
    pub fn new(to: Address, data: impl Into<Bytes>) -> Self {
        Self {
            to,
            data: data.into(),
            gas_limit: None,
        }
    }

    /// Set gas limit
    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    pub fn with_optional_gas_limit(mut self, gas_limit: Option<u64>) -> Self {
        self.gas_limit = gas_limit;
        self
    }
}

/// Legacy (pre-1559) transaction fields, built fresh for every write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    pub nonce: u64,
    pub gas_price: u128,
    pub gas_limit: u64,
    pub to: Address,
    /// Always zero: none of the game calls are payable
    pub value: U256,
    pub data: Bytes,
    pub chain_id: u64,
}

impl UnsignedTransaction {
    pub fn to_legacy(&self) -> TxLegacy {
        TxLegacy {
            chain_id: Some(self.chain_id),
            nonce: self.nonce,
            gas_price: self.gas_price,
            gas_limit: self.gas_limit,
            to: TxKind::Call(self.to),
            value: self.value,
            input: self.data.clone(),
        }
    }
}

/// Fills in nonce, gas price and gas limit from the node
pub struct TxBuilder<'a, R> {
    rpc: &'a R,
    chain_id: u64,
}

impl<'a, R: EthRpc> TxBuilder<'a, R> {
    pub fn new(rpc: &'a R, chain_id: u64) -> Self {
        Self { rpc, chain_id }
    }

    /// Assemble an unsigned transaction from `from` to `request.to`
    ///
    /// The nonce is read at the `pending` tag so back-to-back writes from
    /// one signer get consecutive nonces.
    pub async fn build(&self, from: Address, request: TxRequest) -> Result<UnsignedTransaction> {
        let nonce = self.rpc.pending_nonce(from).await?;
        let gas_price = self.rpc.gas_price().await?;

        let gas_limit = match request.gas_limit {
            Some(limit) => limit,
            None => {
                let estimate = CallRequest::new(request.to, request.data.clone())
                    .with_from(from)
                    .with_gas_price(gas_price);
                self.rpc.estimate_gas(estimate).await?
            }
        };

        tracing::debug!(
            nonce,
            gas_price,
            gas_limit,
            estimated = request.gas_limit.is_none(),
            "Built transaction to {}",
            request.to
        );

        Ok(UnsignedTransaction {
            nonce,
            gas_price,
            gas_limit,
            to: request.to,
            value: U256::ZERO,
            data: request.data,
            chain_id: self.chain_id,
        })
    }
}

/// Use the configured chain id, or ask the node when none is configured
pub async fn resolve_chain_id<R: EthRpc>(rpc: &R, configured: Option<u64>) -> Result<u64> {
    if let Some(chain_id) = configured {
        return Ok(chain_id);
    }
    rpc.chain_id()
        .await
        .map_err(|e| Error::config(format!("chain id cannot be resolved: {e}")))
}
