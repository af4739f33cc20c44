//! Network profiles and client configuration

use crate::address::parse_address;
use crate::constants::{
    DEFAULT_LOCAL_RPC_URL, DEFAULT_MOVE_GAS_LIMIT, DEFAULT_POLL_ATTEMPTS, DEFAULT_POLL_BACKOFF,
    DEFAULT_POLL_INITIAL_DELAY, DEFAULT_POLL_MAX_DELAY, DEFAULT_SEPOLIA_RPC_URL, LOCAL_CHAIN_ID,
    SEPOLIA_CHAIN_ID,
};
use crate::error::{Error, Result};
use crate::signer::KeyRing;
use alloy::primitives::Address;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// One network the client can talk to: endpoint, chain, keys and factory
///
/// Exactly one profile is active per client; switching profiles drops
/// every binding derived from the previous one.
#[derive(Debug, Clone)]
pub struct NetworkProfile {
    /// Human-readable name ("local", "sepolia", ...)
    pub name: String,
    /// RPC endpoint URL
    pub rpc_url: String,
    /// Chain ID; asked from the node when `None`
    pub chain_id: Option<u64>,
    /// Player signing keys
    pub keys: KeyRing,
    /// Deployed factory address
    pub factory: Option<Address>,
}

impl NetworkProfile {
    pub fn new(name: impl Into<String>, rpc_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rpc_url: rpc_url.into(),
            chain_id: None,
            keys: KeyRing::default(),
            factory: None,
        }
    }

    /// Local Hardhat node
    ///
    /// Reads `LOCAL_RPC_URL`, `PRIVATE_KEY_HARDHAT_0` and `PRIVATE_KEY_HARDHAT_1`.
    pub fn local() -> Self {
        Self::new("local", env_or("LOCAL_RPC_URL", DEFAULT_LOCAL_RPC_URL))
            .with_chain_id(LOCAL_CHAIN_ID)
            .with_keys(KeyRing::from_hex_keys([
                env_or("PRIVATE_KEY_HARDHAT_0", ""),
                env_or("PRIVATE_KEY_HARDHAT_1", ""),
            ]))
    }

    /// Sepolia testnet
    ///
    /// Reads `SEPOLIA_RPC_URL`, `PRIVATE_KEY_PLAYER1` and `PRIVATE_KEY_PLAYER2`.
    pub fn sepolia() -> Self {
        Self::new("sepolia", env_or("SEPOLIA_RPC_URL", DEFAULT_SEPOLIA_RPC_URL))
            .with_chain_id(SEPOLIA_CHAIN_ID)
            .with_keys(KeyRing::from_hex_keys([
                env_or("PRIVATE_KEY_PLAYER1", ""),
                env_or("PRIVATE_KEY_PLAYER2", ""),
            ]))
    }

    /// Create custom configuration with specific RPC URL
    pub fn with_rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
        self.rpc_url = rpc_url.into();
        self
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    pub fn with_keys(mut self, keys: KeyRing) -> Self {
        self.keys = keys;
        self
    }

    /// Set the factory address
    pub fn with_factory(mut self, factory: Address) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Take the factory address from a deployment file
    pub fn with_deployment(mut self, deployment: &Deployment) -> Result<Self> {
        self.factory = deployment.factory()?;
        Ok(self)
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Deployment output written by the contract deploy script
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub factory_address: Option<String>,
    pub game_implementation_address: Option<String>,
}

impl Deployment {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::config(format!("invalid deployment file: {e}")))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    /// Validated factory address, if the deployment lists one
    pub fn factory(&self) -> Result<Option<Address>> {
        self.factory_address
            .as_deref()
            .map(|text| {
                parse_address(text)
                    .map_err(|e| Error::config(format!("deployment factoryAddress: {e}")))
            })
            .transpose()
    }
}

/// Receipt polling budget
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollConfig {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_factor: f64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_POLL_ATTEMPTS,
            initial_delay: DEFAULT_POLL_INITIAL_DELAY,
            max_delay: DEFAULT_POLL_MAX_DELAY,
            backoff_factor: DEFAULT_POLL_BACKOFF,
        }
    }
}

impl PollConfig {
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_backoff_factor(mut self, factor: f64) -> Self {
        self.backoff_factor = factor;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(Error::config("poll max_attempts must be at least 1"));
        }
        if !self.backoff_factor.is_finite() || self.backoff_factor < 1.0 {
            return Err(Error::config(format!(
                "poll backoff factor must be a finite number >= 1.0, got {}",
                self.backoff_factor
            )));
        }
        Ok(())
    }
}

/// Gas limit policy per write operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasPolicy {
    /// Fixed ceiling for `makeMove`; skips `eth_estimateGas`
    pub move_gas_limit: u64,
    /// Fixed limit for `createGame`; `None` estimates
    pub create_gas_limit: Option<u64>,
}

impl Default for GasPolicy {
    fn default() -> Self {
        Self {
            move_gas_limit: DEFAULT_MOVE_GAS_LIMIT,
            create_gas_limit: None,
        }
    }
}

/// Client-wide options independent of the active network
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClientOptions {
    pub poll: PollConfig,
    pub gas: GasPolicy,
}

impl ClientOptions {
    pub fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    pub fn with_gas(mut self, gas: GasPolicy) -> Self {
        self.gas = gas;
        self
    }
}
