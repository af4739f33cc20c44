//! Contract bindings and the game binding state machine

use crate::abi::{ContractAbi, DecodedOutputs};
use crate::error::{Error, Result};
use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, Bytes};
use std::fmt;
use std::sync::Arc;

/// A contract address paired with its parsed ABI
///
/// Never holds the zero address. Cheap to clone; operations clone the
/// binding they start with and keep using it even if the client rebinds.
#[derive(Debug, Clone)]
pub struct ContractBinding {
    address: Address,
    abi: Arc<ContractAbi>,
}

impl ContractBinding {
    pub fn new(address: Address, abi: Arc<ContractAbi>) -> Result<Self> {
        if address == Address::ZERO {
            return Err(Error::invalid_input(format!(
                "cannot bind {} to the zero address",
                abi.name()
            )));
        }
        Ok(Self { address, abi })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn abi(&self) -> &ContractAbi {
        &self.abi
    }

    /// Encoded call data for a function of this contract
    pub fn call_data(&self, function: &str, args: &[DynSolValue]) -> Result<Bytes> {
        self.abi.encode_call(function, args)
    }

    pub fn decode_output(&self, function: &str, data: &[u8]) -> Result<DecodedOutputs> {
        self.abi.decode_output(function, data)
    }
}

impl fmt::Display for ContractBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.abi.name(), self.address)
    }
}

/// The "active game" of a client
#[derive(Debug, Clone, Default)]
pub enum GameBinding {
    #[default]
    Unbound,
    Bound(ContractBinding),
}

impl GameBinding {
    /// State after setting (or clearing, with `None`) the game address
    ///
    /// Pure: the current state is left untouched, and a rejected address
    /// yields an error instead of a half-built binding.
    pub fn set_game_address(address: Option<Address>, abi: &Arc<ContractAbi>) -> Result<Self> {
        match address {
            None => Ok(Self::Unbound),
            Some(address) => ContractBinding::new(address, Arc::clone(abi)).map(Self::Bound),
        }
    }

    pub fn address(&self) -> Option<Address> {
        self.binding().map(ContractBinding::address)
    }

    pub fn is_bound(&self) -> bool {
        matches!(self, Self::Bound(_))
    }

    pub fn binding(&self) -> Option<&ContractBinding> {
        match self {
            Self::Unbound => None,
            Self::Bound(binding) => Some(binding),
        }
    }

    /// The bound game, or `Config("no game")`
    pub fn require(&self) -> Result<&ContractBinding> {
        self.binding()
            .ok_or_else(|| Error::config("no game: create or join a game first"))
    }
}
