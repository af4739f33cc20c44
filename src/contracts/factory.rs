//! TicTacToeFactory contract bindings

use alloy::sol;

sol! {
    /// Factory that clones a new game contract per `createGame` call
    interface ITicTacToeFactory {
        /// Deploys a new game; the creator becomes player one
        function createGame() external returns (address);

        /// Emitted once per created game
        event GameCreated(address indexed gameAddress);
    }
}
