//! Local private keys indexed by player

use crate::error::{Error, Result};
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;

/// One configured key, kept even when it failed to parse so the error
/// surfaces when that player signs
#[derive(Clone)]
enum KeySlot {
    Ready(PrivateKeySigner),
    Invalid(String),
}

/// Signing keys for the players of one network profile
///
/// Player `i` signs with the `i`-th key. There is no fixed maximum.
#[derive(Clone, Default)]
pub struct KeyRing {
    slots: Vec<KeySlot>,
}

impl KeyRing {
    /// Build from hex-encoded private keys (with or without 0x prefix)
    ///
    /// Malformed keys are recorded rather than rejected; using them fails
    /// with [`Error::Signing`].
    pub fn from_hex_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let slots = keys
            .into_iter()
            .enumerate()
            .map(|(index, key)| match parse_private_key(key.as_ref()) {
                Ok(signer) => KeySlot::Ready(signer),
                Err(reason) => {
                    tracing::warn!("Private key for player {} is unusable: {}", index, reason);
                    KeySlot::Invalid(reason)
                }
            })
            .collect();

        Self { slots }
    }

    /// Build from already-parsed signers
    pub fn from_signers(signers: impl IntoIterator<Item = PrivateKeySigner>) -> Self {
        Self {
            slots: signers.into_iter().map(KeySlot::Ready).collect(),
        }
    }

    /// Number of configured players
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Signing key for a player
    pub fn signer(&self, player: usize) -> Result<&PrivateKeySigner> {
        match self.slots.get(player) {
            Some(KeySlot::Ready(signer)) => Ok(signer),
            Some(KeySlot::Invalid(reason)) => Err(Error::Signing(format!(
                "private key for player {player} is malformed: {reason}"
            ))),
            None => Err(Error::config(format!(
                "no signing key configured for player {player} ({} available)",
                self.slots.len()
            ))),
        }
    }

    /// Address derived from a player's key
    pub fn address(&self, player: usize) -> Result<Address> {
        self.signer(player).map(PrivateKeySigner::address)
    }
}

impl std::fmt::Debug for KeyRing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let players: Vec<String> = self
            .slots
            .iter()
            .map(|slot| match slot {
                KeySlot::Ready(signer) => signer.address().to_string(),
                KeySlot::Invalid(_) => "<invalid key>".to_string(),
            })
            .collect();
        f.debug_struct("KeyRing").field("players", &players).finish()
    }
}

fn parse_private_key(key: &str) -> std::result::Result<PrivateKeySigner, String> {
    let key = key.trim();
    let key = key.strip_prefix("0x").unwrap_or(key);
    if key.is_empty() {
        return Err("empty key".to_string());
    }
    key.parse::<PrivateKeySigner>().map_err(|e| e.to_string())
}
