use crate::{error::ParseError, quantity};
use std::{fmt, str::FromStr};

/// An EVM account address (20 bytes).
///
/// Parsing accepts any case (checksummed or not), the address is always
/// displayed in lowercase hexadecimal.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; Self::SIZE]);

impl Address {
    pub const SIZE: usize = 20;

    pub const fn new(bytes: [u8; Self::SIZE]) -> Self {
        Self(bytes)
    }

    pub fn from_hex(input: &str) -> Result<Self, ParseError> {
        let digits = quantity::strip_prefix(input)?;
        let bytes = hex::decode(digits).map_err(|error| ParseError::InvalidHex {
            input: input.to_owned(),
            reason: error.to_string(),
        })?;

        let bytes: [u8; Self::SIZE] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| ParseError::InvalidAddressLength(bytes.len()))?;
        Ok(Self(bytes))
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// abbreviated form for display: `0x1234...5678`
    pub fn short(&self) -> String {
        let hex = self.to_hex();
        format!("{}...{}", &hex[..6], &hex[hex.len() - 4..])
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Address").field(&self.to_hex()).finish()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Address {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl serde::Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}
