//! Board snapshot and game status

use crate::address::short;
use crate::constants::BOARD_SIZE;
use alloy::primitives::Address;
use std::fmt;

/// 3x3 grid read from `getBoardState`; the zero address marks an empty cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Board {
    cells: [[Address; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    pub fn new(cells: [[Address; BOARD_SIZE]; BOARD_SIZE]) -> Self {
        Self { cells }
    }

    /// Occupant of a cell, `None` when out of range
    pub fn cell(&self, row: usize, col: usize) -> Option<Address> {
        self.cells.get(row)?.get(col).copied()
    }

    /// Whether a cell is on the board and unoccupied
    pub fn is_empty(&self, row: usize, col: usize) -> bool {
        self.cell(row, col) == Some(Address::ZERO)
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(|cell| *cell != Address::ZERO)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let rendered: Vec<String> = row
                .iter()
                .map(|cell| {
                    if *cell == Address::ZERO {
                        format!("{:^11}", ".")
                    } else {
                        short(cell)
                    }
                })
                .collect();
            write!(f, "{}", rendered.join(" | "))?;
        }
        Ok(())
    }
}

/// Outcome flags read from the game contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameStatus {
    pub ended: bool,
    /// `None` while running or after a draw
    pub winner: Option<Address>,
}

impl GameStatus {
    pub fn is_draw(&self) -> bool {
        self.ended && self.winner.is_none()
    }
}

/// Decoded `MoveMade` event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    pub player: Address,
    pub row: u8,
    pub col: u8,
}
