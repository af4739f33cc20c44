//! HTTP JSON-RPC client backed by an alloy provider

use super::{CallRequest, EthRpc};
use crate::error::{Error, Result};
use crate::types::Receipt;
use alloy::network::{Ethereum, TransactionBuilder};
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::providers::{Provider, ProviderBuilder, RootProvider};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy::transports::http::reqwest::Url;
use std::sync::Arc;

/// Client for one RPC endpoint
///
/// The provider is built without fillers: nonce, gas and chain id are
/// chosen explicitly by the transaction builder, and signing happens
/// locally before `eth_sendRawTransaction`.
#[derive(Clone)]
pub struct HttpRpc {
    provider: Arc<RootProvider<Ethereum>>,
    url: Url,
}

impl HttpRpc {
    /// Create a client for the given endpoint
    pub fn connect(rpc_url: impl AsRef<str>) -> Result<Self> {
        let url: Url = rpc_url
            .as_ref()
            .parse()
            .map_err(|e| Error::config(format!("Invalid RPC URL {:?}: {e}", rpc_url.as_ref())))?;

        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .network::<Ethereum>()
            .connect_http(url.clone());

        Ok(Self {
            provider: Arc::new(provider),
            url,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl std::fmt::Debug for HttpRpc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRpc").field("url", &self.url.as_str()).finish()
    }
}

fn to_transaction_request(request: CallRequest) -> TransactionRequest {
    let mut tx = TransactionRequest::default()
        .with_to(request.to)
        .with_value(request.value)
        .with_input(request.data);

    if let Some(from) = request.from {
        tx = tx.with_from(from);
    }
    if let Some(gas_price) = request.gas_price {
        tx = tx.with_gas_price(gas_price);
    }
    tx
}

impl EthRpc for HttpRpc {
    async fn pending_nonce(&self, address: Address) -> Result<u64> {
        self.provider
            .get_transaction_count(address)
            .pending()
            .await
            .map_err(|e| Error::network("eth_getTransactionCount", e))
    }

    async fn gas_price(&self) -> Result<u128> {
        self.provider
            .get_gas_price()
            .await
            .map_err(|e| Error::network("eth_gasPrice", e))
    }

    async fn estimate_gas(&self, request: CallRequest) -> Result<u64> {
        self.provider
            .estimate_gas(to_transaction_request(request))
            .await
            .map_err(|e| Error::network("eth_estimateGas", e))
    }

    async fn call(&self, request: CallRequest) -> Result<Bytes> {
        self.provider
            .call(to_transaction_request(request))
            .await
            .map_err(|e| Error::network("eth_call", e))
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> Result<TxHash> {
        let pending = self
            .provider
            .send_raw_transaction(&raw)
            .await
            .map_err(|e| Error::network("eth_sendRawTransaction", e))?;

        Ok(*pending.tx_hash())
    }

    async fn transaction_receipt(&self, hash: TxHash) -> Result<Option<Receipt>> {
        let receipt: Option<TransactionReceipt> = self
            .provider
            .get_transaction_receipt(hash)
            .await
            .map_err(|e| Error::network("eth_getTransactionReceipt", e))?;

        Ok(receipt.map(Receipt::from))
    }

    async fn block_number(&self) -> Result<u64> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| Error::network("eth_blockNumber", e))
    }

    async fn chain_id(&self) -> Result<u64> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| Error::network("eth_chainId", e))
    }
}
