//! Transaction lifecycle: build, then poll for the receipt

pub mod builder;
pub mod poller;

pub use builder::{resolve_chain_id, TxBuilder, TxRequest, UnsignedTransaction};
pub use poller::ReceiptPoller;
