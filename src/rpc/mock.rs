//! Scripted in-memory RPC for tests

use super::{CallRequest, EthRpc};
use crate::error::{Error, Result};
use crate::types::{LogEntry, Receipt};
use alloy::primitives::{keccak256, Address, Bytes, TxHash, B256};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::time::Instant;

/// Response to one `eth_getTransactionReceipt` query
pub(crate) enum ReceiptStep {
    NotFound,
    Found(Receipt),
    Fail(&'static str),
}

#[derive(Default)]
struct MockState {
    nonce: u64,
    gas_price: u128,
    gas_estimate: u64,
    chain_id: Option<u64>,
    block_number: u64,
    reject_send: Option<String>,
    receipt_script: VecDeque<ReceiptStep>,
    /// Receipt template returned once the script runs out; its hash is
    /// replaced with the queried one
    mined: Option<Receipt>,
    call_responses: HashMap<[u8; 4], Bytes>,
    sent: Vec<Bytes>,
    estimates: Vec<CallRequest>,
    calls: HashMap<&'static str, usize>,
    receipt_queries: Vec<Instant>,
}

/// Cloneable handle; clones share the same state
#[derive(Clone, Default)]
pub(crate) struct MockRpc {
    state: Arc<Mutex<MockState>>,
}

impl MockRpc {
    pub fn new() -> Self {
        let mock = Self::default();
        {
            let mut state = mock.state.lock().unwrap();
            state.gas_price = 1_000_000_000;
            state.gas_estimate = 120_000;
            state.chain_id = Some(31337);
            state.block_number = 42;
        }
        mock
    }

    pub fn with_nonce(self, nonce: u64) -> Self {
        self.state.lock().unwrap().nonce = nonce;
        self
    }

    pub fn with_chain_id(self, chain_id: Option<u64>) -> Self {
        self.state.lock().unwrap().chain_id = chain_id;
        self
    }

    pub fn with_gas_estimate(self, gas: u64) -> Self {
        self.state.lock().unwrap().gas_estimate = gas;
        self
    }

    pub fn rejecting_sends(self, message: &str) -> Self {
        self.state.lock().unwrap().reject_send = Some(message.to_string());
        self
    }

    /// Queue receipt responses consumed one per query
    pub fn with_receipt_script(self, steps: impl IntoIterator<Item = ReceiptStep>) -> Self {
        self.state.lock().unwrap().receipt_script.extend(steps);
        self
    }

    /// Every query after the script is exhausted returns this receipt
    pub fn mining(self, receipt: Receipt) -> Self {
        self.state.lock().unwrap().mined = Some(receipt);
        self
    }

    pub fn with_call_response(self, selector: [u8; 4], data: impl Into<Bytes>) -> Self {
        self.state
            .lock()
            .unwrap()
            .call_responses
            .insert(selector, data.into());
        self
    }

    pub fn count(&self, method: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .get(method)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.state.lock().unwrap().calls.values().sum()
    }

    pub fn sent(&self) -> Vec<Bytes> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn estimates(&self) -> Vec<CallRequest> {
        self.state.lock().unwrap().estimates.clone()
    }

    pub fn receipt_query_times(&self) -> Vec<Instant> {
        self.state.lock().unwrap().receipt_queries.clone()
    }

    fn record(&self, method: &'static str) -> std::sync::MutexGuard<'_, MockState> {
        let mut state = self.state.lock().unwrap();
        *state.calls.entry(method).or_default() += 1;
        state
    }
}

/// Successful receipt carrying the given logs
pub(crate) fn receipt_with_logs(logs: Vec<LogEntry>) -> Receipt {
    Receipt {
        transaction_hash: B256::ZERO,
        status: Some(1),
        block_number: Some(42),
        gas_used: 90_000,
        logs,
    }
}

/// Concatenate 32-byte words into return data
pub(crate) fn words(words: &[B256]) -> Bytes {
    words
        .iter()
        .flat_map(|word| word.0)
        .collect::<Vec<u8>>()
        .into()
}

pub(crate) fn bool_word(value: bool) -> B256 {
    let mut word = B256::ZERO;
    word[31] = u8::from(value);
    word
}

impl EthRpc for MockRpc {
    async fn pending_nonce(&self, _address: Address) -> Result<u64> {
        Ok(self.record("eth_getTransactionCount").nonce)
    }

    async fn gas_price(&self) -> Result<u128> {
        Ok(self.record("eth_gasPrice").gas_price)
    }

    async fn estimate_gas(&self, request: CallRequest) -> Result<u64> {
        let mut state = self.record("eth_estimateGas");
        state.estimates.push(request);
        Ok(state.gas_estimate)
    }

    async fn call(&self, request: CallRequest) -> Result<Bytes> {
        let state = self.record("eth_call");
        let selector: [u8; 4] = request
            .data
            .get(..4)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| Error::network("eth_call", "call data too short"))?;

        state
            .call_responses
            .get(&selector)
            .cloned()
            .ok_or_else(|| Error::network("eth_call", "execution reverted"))
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> Result<TxHash> {
        let mut state = self.record("eth_sendRawTransaction");
        if let Some(message) = &state.reject_send {
            return Err(Error::network("eth_sendRawTransaction", message));
        }
        let hash = keccak256(&raw);
        state.sent.push(raw);
        state.nonce += 1;
        Ok(hash)
    }

    async fn transaction_receipt(&self, hash: TxHash) -> Result<Option<Receipt>> {
        let mut state = self.record("eth_getTransactionReceipt");
        state.receipt_queries.push(Instant::now());

        match state.receipt_script.pop_front() {
            Some(ReceiptStep::NotFound) => Ok(None),
            Some(ReceiptStep::Found(receipt)) => Ok(Some(receipt)),
            Some(ReceiptStep::Fail(message)) => {
                Err(Error::network("eth_getTransactionReceipt", message))
            }
            None => Ok(state.mined.clone().map(|mut receipt| {
                receipt.transaction_hash = hash;
                receipt
            })),
        }
    }

    async fn block_number(&self) -> Result<u64> {
        Ok(self.record("eth_blockNumber").block_number)
    }

    async fn chain_id(&self) -> Result<u64> {
        self.record("eth_chainId")
            .chain_id
            .ok_or_else(|| Error::network("eth_chainId", "method not supported"))
    }
}
