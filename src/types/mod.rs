//! Value types for the user-facing API

pub mod board;
pub mod receipt;

pub use board::{Board, GameStatus, MoveRecord};
pub use receipt::{LogEntry, Receipt, STATUS_SUCCESS};
