//! MultiPlayerTicTacToe (per-game board) contract bindings

use alloy::sol;

sol! {
    /// One game of tic-tac-toe between two addresses
    interface IMultiPlayerTicTacToe {
        /// Place the caller's mark at (row, col), both in 0..=2
        function makeMove(uint8 row, uint8 col) external;

        /// Full board, zero address for empty cells
        function getBoardState() external view returns (address[3][3] memory);

        function gameEnded() external view returns (bool);

        /// Zero address while running or after a draw
        function winner() external view returns (address);

        function currentPlayer() external view returns (address);

        /// Emitted for every accepted move
        event MoveMade(address indexed player, uint8 row, uint8 col);
    }
}
