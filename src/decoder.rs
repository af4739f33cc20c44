//! Receipt validation, log extraction and return-value decoding

use crate::abi::DecodedOutputs;
use crate::address::address_from_topic;
use crate::constants::BOARD_SIZE;
use crate::contracts::{IMultiPlayerTicTacToe, ITicTacToeFactory};
use crate::error::{Error, Result};
use crate::types::{Board, LogEntry, MoveRecord, Receipt};
use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, B256};
use alloy::sol_types::SolEvent;

/// Treat anything but status 1 (including a missing status) as failure
pub fn ensure_success(receipt: &Receipt) -> Result<()> {
    if receipt.succeeded() {
        Ok(())
    } else {
        Err(Error::OnChainFailure {
            hash: receipt.transaction_hash,
            status: receipt.status,
        })
    }
}

/// Identifies the one log a transaction is expected to emit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogFilter {
    pub event: &'static str,
    pub address: Address,
    pub signature: B256,
    pub topic_count: usize,
}

impl LogFilter {
    /// `GameCreated(address indexed)` emitted by the factory
    pub fn game_created(factory: Address) -> Self {
        Self {
            event: "GameCreated",
            address: factory,
            signature: ITicTacToeFactory::GameCreated::SIGNATURE_HASH,
            topic_count: 2,
        }
    }

    /// `MoveMade(address indexed, uint8, uint8)` emitted by a game
    pub fn move_made(game: Address) -> Self {
        Self {
            event: "MoveMade",
            address: game,
            signature: IMultiPlayerTicTacToe::MoveMade::SIGNATURE_HASH,
            topic_count: 2,
        }
    }

    pub fn matches(&self, log: &LogEntry) -> bool {
        log.address == self.address
            && log.topics.len() == self.topic_count
            && log.topics.first() == Some(&self.signature)
    }
}

/// First log (in emission order) matching the filter
///
/// The receipt must already have passed [`ensure_success`]; a failed
/// receipt is reported as such regardless of its logs.
pub fn find_log<'r>(receipt: &'r Receipt, filter: &LogFilter) -> Result<&'r LogEntry> {
    ensure_success(receipt)?;
    receipt
        .logs
        .iter()
        .find(|log| filter.matches(log))
        .ok_or(Error::EventNotFound {
            hash: receipt.transaction_hash,
            event: filter.event,
            address: filter.address,
        })
}

/// Indexed address parameter carried in `topics[index]`
pub fn indexed_address(log: &LogEntry, index: usize) -> Result<Address> {
    log.topics
        .get(index)
        .map(address_from_topic)
        .ok_or_else(|| Error::decode(format!("log has no topic {index}")))
}

/// Address of the game created by a `createGame` transaction
pub fn created_game(receipt: &Receipt, factory: Address) -> Result<Address> {
    let log = find_log(receipt, &LogFilter::game_created(factory))?;
    let game = indexed_address(log, 1)?;
    if game == Address::ZERO {
        return Err(Error::decode("GameCreated carried the zero address"));
    }
    Ok(game)
}

/// Best-effort `MoveMade` decode; `None` when absent or malformed
pub fn move_made(receipt: &Receipt, game: Address) -> Option<MoveRecord> {
    let filter = LogFilter::move_made(game);
    let log = receipt.logs.iter().find(|log| filter.matches(log))?;

    match IMultiPlayerTicTacToe::MoveMade::decode_raw_log(log.topics.iter().copied(), &log.data) {
        Ok(event) => Some(MoveRecord {
            player: event.player,
            row: event.row,
            col: event.col,
        }),
        Err(e) => {
            tracing::warn!("Malformed MoveMade log in {}: {}", receipt.transaction_hash, e);
            None
        }
    }
}

/// Decode the `getBoardState` result (`address[3][3]`, one unnamed output)
pub fn decode_board(outputs: &DecodedOutputs) -> Result<Board> {
    let value = outputs
        .get("")
        .ok_or_else(|| Error::decode("getBoardState: missing unnamed output"))?;

    let rows = fixed_array(value, "board")?;
    let mut cells = [[Address::ZERO; BOARD_SIZE]; BOARD_SIZE];
    for (r, row) in rows.iter().enumerate() {
        let row = fixed_array(row, "board row")?;
        for (c, cell) in row.iter().enumerate() {
            cells[r][c] = cell
                .as_address()
                .ok_or_else(|| Error::decode(format!("board cell ({r},{c}) is not an address")))?;
        }
    }
    Ok(Board::new(cells))
}

fn fixed_array<'v>(value: &'v DynSolValue, what: &str) -> Result<&'v [DynSolValue]> {
    let items = value
        .as_fixed_array()
        .ok_or_else(|| Error::decode(format!("{what} is not a fixed-size array")))?;
    if items.len() != BOARD_SIZE {
        return Err(Error::decode(format!(
            "{what} has {} entries, expected {}",
            items.len(),
            BOARD_SIZE
        )));
    }
    Ok(items)
}

/// First declared output as a bool
pub fn first_bool(outputs: &DecodedOutputs, function: &str) -> Result<bool> {
    outputs
        .first()
        .and_then(DynSolValue::as_bool)
        .ok_or_else(|| Error::decode(format!("{function}: first output is not a bool")))
}

/// First declared output as an address
pub fn first_address(outputs: &DecodedOutputs, function: &str) -> Result<Address> {
    outputs
        .first()
        .and_then(DynSolValue::as_address)
        .ok_or_else(|| Error::decode(format!("{function}: first output is not an address")))
}
