//! Transaction receipt and log types
//!
//! A trimmed view of the node's receipt: only the fields the decoder reads.
//! The status stays optional because pre-Byzantium style receipts carry a
//! state root instead of a status code.

use alloy::consensus::{Eip658Value, TxReceipt};
use alloy::primitives::{Address, Bytes, TxHash, B256};
use alloy::rpc::types::TransactionReceipt;

/// Receipt status value meaning success
pub const STATUS_SUCCESS: u64 = 1;

/// Mined transaction outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub transaction_hash: TxHash,
    /// `Some(1)` success, `Some(0)` revert, `None` when the node omits it
    pub status: Option<u64>,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    pub logs: Vec<LogEntry>,
}

impl Receipt {
    /// Whether the receipt reports success
    pub fn succeeded(&self) -> bool {
        self.status == Some(STATUS_SUCCESS)
    }
}

/// One log emitted during execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Emitting contract
    pub address: Address,
    /// `topics[0]` is the event signature hash for non-anonymous events
    pub topics: Vec<B256>,
    pub data: Bytes,
}

impl LogEntry {
    pub fn new(address: Address, topics: Vec<B256>, data: impl Into<Bytes>) -> Self {
        Self {
            address,
            topics,
            data: data.into(),
        }
    }
}

impl From<TransactionReceipt> for Receipt {
    fn from(receipt: TransactionReceipt) -> Self {
        let status = match receipt.inner.status_or_post_state() {
            Eip658Value::Eip658(success) => Some(u64::from(success)),
            Eip658Value::PostState(_) => None,
        };

        let logs = receipt
            .inner
            .logs()
            .iter()
            .map(|log| LogEntry {
                address: log.address(),
                topics: log.topics().to_vec(),
                data: log.data().data.clone(),
            })
            .collect();

        Self {
            transaction_hash: receipt.transaction_hash,
            status,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
            logs,
        }
    }
}
