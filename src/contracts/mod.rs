//! Contract bindings for the tic-tac-toe factory and game contracts

pub mod factory;
pub mod game;

pub use factory::*;
pub use game::*;
