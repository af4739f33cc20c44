//! Address parsing and rendering
//!
//! Addresses compare as 20-byte values, so lowercase and checksummed text
//! forms of the same address are equal once parsed.

use crate::constants::ADDRESS_TEXT_LEN;
use crate::error::{Error, Result};
use alloy::primitives::{hex, Address, B256};

/// Parse a textual address
///
/// The text must be exactly 42 characters, start with `0x` and contain only
/// hex digits after the prefix. Mixed case is accepted without checksum
/// verification. Surrounding whitespace is not stripped.
pub fn parse_address(text: &str) -> Result<Address> {
    if text.len() != ADDRESS_TEXT_LEN {
        return Err(Error::invalid_input(format!(
            "address must be {} characters, got {}: {:?}",
            ADDRESS_TEXT_LEN,
            text.len(),
            text
        )));
    }

    let digits = text
        .strip_prefix("0x")
        .ok_or_else(|| Error::invalid_input(format!("address must start with 0x: {text:?}")))?;

    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::invalid_input(format!(
            "address contains non-hex characters: {text:?}"
        )));
    }

    let mut bytes = [0u8; 20];
    hex::decode_to_slice(digits, &mut bytes)
        .map_err(|e| Error::invalid_input(format!("invalid address {text:?}: {e}")))?;
    Ok(Address::from(bytes))
}

/// Compare two textual addresses by value
///
/// Returns `false` if either side is not a valid address.
pub fn addresses_equal(a: &str, b: &str) -> bool {
    match (parse_address(a), parse_address(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Lowercase `0x`-prefixed rendering
pub fn to_lower_hex(address: &Address) -> String {
    format!("0x{}", hex::encode(address.as_slice()))
}

/// Short `0x1234…abcd` form for logs and board rendering
pub fn short(address: &Address) -> String {
    let full = to_lower_hex(address);
    format!("{}…{}", &full[..6], &full[full.len() - 4..])
}

/// Extract an indexed address parameter from a 32-byte topic
///
/// Takes the low-order 20 bytes (the last 40 hex characters of the topic).
pub fn address_from_topic(topic: &B256) -> Address {
    Address::from_slice(&topic[12..])
}
