//! Constants and defaults for the tic-tac-toe client

use std::time::Duration;

/// Board dimension (3x3)
pub const BOARD_SIZE: usize = 3;

/// Zero address as text; an empty board cell or "no winner"
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Length of a textual address including the `0x` prefix
pub const ADDRESS_TEXT_LEN: usize = 42;

/// Hardhat / anvil default chain id
pub const LOCAL_CHAIN_ID: u64 = 31337;

/// Sepolia testnet chain id
pub const SEPOLIA_CHAIN_ID: u64 = 11155111;

/// Default RPC endpoint of a local Hardhat node
pub const DEFAULT_LOCAL_RPC_URL: &str = "http://127.0.0.1:8545";

/// Placeholder Sepolia endpoint, overridden by `SEPOLIA_RPC_URL`
pub const DEFAULT_SEPOLIA_RPC_URL: &str = "https://sepolia.infura.io/v3/REPLACE_ME";

/// Gas ceiling for `makeMove`, sent without an estimation round trip
pub const DEFAULT_MOVE_GAS_LIMIT: u64 = 500_000;

/// Receipt polling defaults
pub const DEFAULT_POLL_ATTEMPTS: u32 = 5;
pub const DEFAULT_POLL_INITIAL_DELAY: Duration = Duration::from_secs(5);
pub const DEFAULT_POLL_MAX_DELAY: Duration = Duration::from_secs(45);
pub const DEFAULT_POLL_BACKOFF: f64 = 2.0;

/// Bundled contract artifacts (`{"abi": [...]}` documents)
pub const FACTORY_ARTIFACT: &str = include_str!("../abi/TicTacToeFactory.json");
pub const GAME_ARTIFACT: &str = include_str!("../abi/MultiPlayerTicTacToe.json");
