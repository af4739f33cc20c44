//! Tic-tac-toe on Ethereum
//!
//! A Rust client for a two-contract tic-tac-toe game: a factory that deploys
//! games and a per-game board contract players take turns on.
//!
//! # Features
//!
//! - Create a game through the factory and bind to it
//! - Join an existing game by address
//! - Make moves as either player (locally signed legacy transactions)
//! - Read the board, the winner and whether the game has ended
//!
//! # Example
//!
//! ```rust,ignore
//! use tictactoe_chain::{
//!     parse_address, ClientOptions, ContractAbis, NetworkProfile, TicTacToeClient,
//! };
//!
//! #[tokio::main]
//! async fn main() -> tictactoe_chain::Result<()> {
//!     let factory = parse_address("0xa0B53DbDb0052403E38BBC31f01367aC6782118E")?;
//!     let profile = NetworkProfile::local().with_factory(factory);
//!     let abis = ContractAbis::bundled()?;
//!     let client = TicTacToeClient::connect(profile, abis, ClientOptions::default())?;
//!
//!     let game = client.create_game(0).await?;
//!     client.make_move(0, 1, 1).await?;
//!     client.make_move(1, 0, 0).await?;
//!     println!("{game}\n{}", client.board().await?);
//!
//!     Ok(())
//! }
//! ```

pub mod abi;
pub mod address;
pub mod binding;
pub mod client;
pub mod config;
pub mod constants;
pub mod contracts;
pub mod decoder;
pub mod error;
pub mod rpc;
pub mod signer;
pub mod tx;
pub mod types;

// Re-export main types for convenience
pub use abi::{ContractAbi, ContractAbis, DecodedOutputs};
pub use address::parse_address;
pub use binding::{ContractBinding, GameBinding};
pub use client::TicTacToeClient;
pub use config::{ClientOptions, Deployment, GasPolicy, NetworkProfile, PollConfig};
pub use error::{Error, Result};
pub use rpc::{CallRequest, EthRpc, HttpRpc};
pub use signer::{KeyRing, SignedTransaction};
pub use tx::{ReceiptPoller, TxBuilder, TxRequest, UnsignedTransaction};
pub use types::{Board, GameStatus, LogEntry, MoveRecord, Receipt};
