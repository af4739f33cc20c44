//! ABI registry built from contract artifact files
//!
//! Artifacts are JSON documents with an `"abi"` array in the standard
//! Ethereum ABI schema. A [`ContractAbi`] maps function names to their
//! encoder/decoder; an unknown name is a configuration error.

use crate::constants::{FACTORY_ARTIFACT, GAME_ARTIFACT};
use crate::contracts::{IMultiPlayerTicTacToe, ITicTacToeFactory};
use crate::error::{Error, Result};
use alloy::dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt};
use alloy::json_abi::{Function, JsonAbi};
use alloy::primitives::{Bytes, B256};
use alloy::sol_types::SolEvent;
use std::path::Path;
use std::sync::Arc;

/// Parsed interface of one contract
#[derive(Debug, Clone)]
pub struct ContractAbi {
    name: String,
    abi: JsonAbi,
}

impl ContractAbi {
    /// Parse an artifact document (`{"abi": [...], ...}`)
    pub fn from_artifact_json(name: impl Into<String>, json: &str) -> Result<Self> {
        let name = name.into();
        let mut document: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| Error::config(format!("{name}: artifact is not valid JSON: {e}")))?;

        let abi = document
            .get_mut("abi")
            .map(serde_json::Value::take)
            .ok_or_else(|| Error::config(format!("{name}: artifact has no \"abi\" array")))?;

        let abi: JsonAbi = serde_json::from_value(abi)
            .map_err(|e| Error::config(format!("{name}: malformed ABI: {e}")))?;

        Ok(Self { name, abi })
    }

    /// Load an artifact file from disk
    pub fn from_artifact_file(name: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        let name = name.into();
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("{name}: cannot read {}: {e}", path.display()))
        })?;
        Self::from_artifact_json(name, &json)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a function by name (first overload)
    pub fn function(&self, name: &str) -> Result<&Function> {
        self.abi
            .function(name)
            .and_then(|overloads| overloads.first())
            .ok_or_else(|| Error::config(format!("{} ABI has no function `{name}`", self.name)))
    }

    /// Signature hash (topic 0) of a declared event
    pub fn event_topic(&self, name: &str) -> Result<B256> {
        self.abi
            .event(name)
            .and_then(|overloads| overloads.first())
            .map(|event| event.selector())
            .ok_or_else(|| Error::config(format!("{} ABI has no event `{name}`", self.name)))
    }

    /// Encode a call: 4-byte selector followed by the ABI-encoded arguments
    pub fn encode_call(&self, name: &str, args: &[DynSolValue]) -> Result<Bytes> {
        let function = self.function(name)?;
        function
            .abi_encode_input(args)
            .map(Bytes::from)
            .map_err(|e| Error::config(format!("{}.{name}: cannot encode arguments: {e}", self.name)))
    }

    /// Decode call data produced by [`Self::encode_call`] back into arguments
    pub fn decode_call(&self, name: &str, data: &[u8]) -> Result<Vec<DynSolValue>> {
        let function = self.function(name)?;
        let (selector, args) = data
            .split_first_chunk::<4>()
            .ok_or_else(|| Error::decode(format!("{name}: call data shorter than a selector")))?;

        if *selector != function.selector().0 {
            return Err(Error::decode(format!(
                "{name}: selector mismatch (expected 0x{}, got 0x{})",
                alloy::primitives::hex::encode(function.selector()),
                alloy::primitives::hex::encode(selector)
            )));
        }

        function
            .abi_decode_input(args)
            .map_err(|e| Error::decode(format!("{name}: bad call arguments: {e}")))
    }

    /// Decode `eth_call` return data against the declared outputs
    pub fn decode_output(&self, name: &str, data: &[u8]) -> Result<DecodedOutputs> {
        let function = self.function(name)?;
        let values = function
            .abi_decode_output(data)
            .map_err(|e| Error::decode(format!("{}.{name}: bad return data: {e}", self.name)))?;

        if values.len() != function.outputs.len() {
            return Err(Error::decode(format!(
                "{}.{name}: expected {} outputs, got {}",
                self.name,
                function.outputs.len(),
                values.len()
            )));
        }

        let names = function.outputs.iter().map(|param| param.name.clone());
        Ok(DecodedOutputs {
            values: names.zip(values).collect(),
        })
    }
}

/// Return values of a call keyed by declared output name
///
/// Unnamed outputs are keyed by the empty string, so a function with one
/// unnamed output is read with `get("")`.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedOutputs {
    values: Vec<(String, DynSolValue)>,
}

impl DecodedOutputs {
    pub fn get(&self, name: &str) -> Option<&DynSolValue> {
        self.values
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn first(&self) -> Option<&DynSolValue> {
        self.values.first().map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The two interfaces the client drives, validated once at construction
#[derive(Debug, Clone)]
pub struct ContractAbis {
    pub factory: Arc<ContractAbi>,
    pub game: Arc<ContractAbi>,
}

impl ContractAbis {
    /// Check both interfaces declare what the client calls and listens for
    pub fn new(factory: ContractAbi, game: ContractAbi) -> Result<Self> {
        factory.function("createGame")?;
        let created = factory.event_topic("GameCreated")?;
        if created != ITicTacToeFactory::GameCreated::SIGNATURE_HASH {
            return Err(Error::config(format!(
                "{}: GameCreated must be declared as {}",
                factory.name(),
                ITicTacToeFactory::GameCreated::SIGNATURE
            )));
        }

        game.function("makeMove")?;
        game.function("getBoardState")?;
        if let Ok(moved) = game.event_topic("MoveMade") {
            if moved != IMultiPlayerTicTacToe::MoveMade::SIGNATURE_HASH {
                tracing::warn!(
                    "{}: MoveMade signature differs from {}, move diagnostics disabled",
                    game.name(),
                    IMultiPlayerTicTacToe::MoveMade::SIGNATURE
                );
            }
        }

        Ok(Self {
            factory: Arc::new(factory),
            game: Arc::new(game),
        })
    }

    /// Artifacts compiled into the crate
    pub fn bundled() -> Result<Self> {
        Self::new(
            ContractAbi::from_artifact_json("TicTacToeFactory", FACTORY_ARTIFACT)?,
            ContractAbi::from_artifact_json("MultiPlayerTicTacToe", GAME_ARTIFACT)?,
        )
    }

    /// Load both artifacts from disk
    pub fn from_files(factory: impl AsRef<Path>, game: impl AsRef<Path>) -> Result<Self> {
        Self::new(
            ContractAbi::from_artifact_file("TicTacToeFactory", factory)?,
            ContractAbi::from_artifact_file("MultiPlayerTicTacToe", game)?,
        )
    }
}
