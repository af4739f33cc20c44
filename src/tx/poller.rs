//! Receipt polling with bounded exponential backoff

use crate::config::PollConfig;
use crate::error::{Error, Result};
use crate::rpc::EthRpc;
use crate::types::Receipt;
use alloy::primitives::TxHash;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Polls `eth_getTransactionReceipt` until the transaction is mined
///
/// Attempt `i` (1-based) is followed, if it found nothing, by a sleep of
/// `min(max_delay, initial_delay * factor^(i-1))`. There is no sleep after
/// the last attempt. A query error is retried like "not found" except on
/// the last attempt, where it is returned as-is.
pub struct ReceiptPoller<'a, R> {
    rpc: &'a R,
    config: PollConfig,
    cancel: CancellationToken,
}

impl<'a, R: EthRpc> ReceiptPoller<'a, R> {
    pub fn new(rpc: &'a R, config: PollConfig) -> Self {
        Self {
            rpc,
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Stop waiting as soon as `cancel` fires
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub async fn wait(&self, hash: TxHash) -> Result<Receipt> {
        self.config.validate()?;
        let max_attempts = self.config.max_attempts;
        let mut delay = self.config.initial_delay.min(self.config.max_delay);

        for attempt in 1..=max_attempts {
            if self.cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }

            match self.rpc.transaction_receipt(hash).await {
                Ok(Some(receipt)) => {
                    tracing::debug!(
                        "Receipt for {} found on attempt {}/{}",
                        hash,
                        attempt,
                        max_attempts
                    );
                    return Ok(receipt);
                }
                Ok(None) => {
                    tracing::debug!(
                        "Receipt for {} not available (attempt {}/{})",
                        hash,
                        attempt,
                        max_attempts
                    );
                }
                Err(err) if attempt == max_attempts => return Err(err),
                Err(err) => {
                    tracing::warn!(
                        "Receipt query for {} failed (attempt {}/{}): {}",
                        hash,
                        attempt,
                        max_attempts,
                        err
                    );
                }
            }

            if attempt < max_attempts {
                tokio::select! {
                    _ = self.cancel.cancelled() => return Err(Error::Cancelled),
                    _ = tokio::time::sleep(delay) => {}
                }
                delay = self.next_delay(delay);
            }
        }

        Err(Error::ReceiptTimeout {
            hash,
            attempts: max_attempts,
        })
    }

    fn next_delay(&self, delay: Duration) -> Duration {
        let next = delay.as_secs_f64() * self.config.backoff_factor;
        if next >= self.config.max_delay.as_secs_f64() {
            self.config.max_delay
        } else {
            Duration::from_secs_f64(next)
        }
    }
}
