use crate::{Error, Result};
use alloy_primitives::Address;
use std::str::FromStr;

/// Parse a string into an Address.
/// The string should be a 40 character hex string with or without the "0x" prefix.
/// Mixed-case input must carry a valid EIP-55 checksum; all-lower and all-upper
/// input is accepted as is.
pub fn parse_address(address_str: &str) -> Result<Address> {
    let hex = address_str.strip_prefix("0x").unwrap_or(address_str);
    if hex.len() != 40 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::InvalidAddress(address_str.to_string()));
    }

    let has_lower = hex.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = hex.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        Address::parse_checksummed(format!("0x{hex}"), None)
            .map_err(|e| Error::InvalidAddress(format!("{address_str}: {e}")))
    } else {
        Address::from_str(hex).map_err(|e| Error::InvalidAddress(format!("{address_str}: {e}")))
    }
}

/// EIP-55 representation of an address.
pub fn checksum(address: &Address) -> String {
    address.to_checksum(None)
}
