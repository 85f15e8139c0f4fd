//! Hexadecimal quantities as exchanged with EIP-1193 providers.
//!
//! Quantities are `0x` prefixed, big endian and without leading zeros
//! (`"0x0"`, `"0x14a34"`). We are lenient on the leading zeros when decoding.

use crate::error::ParseError;

/// decode a `0x` prefixed hexadecimal quantity
pub fn decode(input: &str) -> Result<u128, ParseError> {
    let digits = strip_prefix(input)?;
    if digits.is_empty() {
        return Err(ParseError::Empty);
    }
    if let Some(invalid) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(ParseError::InvalidHex {
            input: input.to_owned(),
            reason: format!("invalid character `{invalid}'"),
        });
    }

    let digits = digits.trim_start_matches('0');
    if digits.len() > 32 {
        return Err(ParseError::Overflow(input.to_owned()));
    }
    if digits.is_empty() {
        return Ok(0);
    }

    u128::from_str_radix(digits, 16).map_err(|error| ParseError::InvalidHex {
        input: input.to_owned(),
        reason: error.to_string(),
    })
}

/// decode a quantity that must fit in 64 bits (chain ids, block numbers)
pub fn decode_u64(input: &str) -> Result<u64, ParseError> {
    let value = decode(input)?;
    u64::try_from(value).map_err(|_| ParseError::Overflow(input.to_owned()))
}

pub fn encode(value: u128) -> String {
    format!("{value:#x}")
}

pub(crate) fn strip_prefix(input: &str) -> Result<&str, ParseError> {
    input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .ok_or_else(|| ParseError::MissingPrefix(input.to_owned()))
}
