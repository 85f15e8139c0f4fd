#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, thiserror::Error)]
pub enum ProviderErrorCode {
    #[error("The user rejected the request")]
    UserRejected,
    #[error("The requested method and/or account has not been authorized by the user")]
    Unauthorized,
    #[error("The provider does not support the requested method")]
    UnsupportedMethod,
    /// The wallet lost the connection to every chain.
    #[error("The provider is disconnected from all chains")]
    Disconnected,
    #[error("The provider is not connected to the requested chain")]
    ChainDisconnected,
    /// Returned by `wallet_switchEthereumChain` when the wallet does not know
    /// the chain yet. It has to be added with `wallet_addEthereumChain`.
    #[error("The chain has not been added to the wallet")]
    UnrecognizedChain,
    /// A previous request of the same kind is still waiting on the user.
    #[error("A request is already pending")]
    RequestPending,
    #[error("An error occured in the provider while executing the request")]
    Internal,
    #[error("Unknown error code `{0}'")]
    Unknown(i64),
}

#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, thiserror::Error, serde::Deserialize,
)]
#[error("{code}. {message}.")]
pub struct ProviderError {
    pub code: ProviderErrorCode,
    #[serde(default)]
    pub message: String,
}

impl ProviderError {
    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self {
            code: ProviderErrorCode::Internal,
            message: message.into(),
        }
    }

    /// the user dismissed the wallet prompt
    pub fn is_user_rejection(&self) -> bool {
        self.code == ProviderErrorCode::UserRejected
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Missing `0x' prefix in `{0}'")]
    MissingPrefix(String),
    #[error("Empty hexadecimal quantity")]
    Empty,
    #[error("Invalid hexadecimal `{input}': {reason}")]
    InvalidHex { input: String, reason: String },
    #[error("Invalid decimal number `{0}'")]
    InvalidDecimal(String),
    #[error("Quantity `{0}' does not fit")]
    Overflow(String),
    #[error("Invalid address length, expected 20 bytes but got {0}")]
    InvalidAddressLength(usize),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Couldn't decode the network configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("At least one network needs to be configured")]
    NoNetwork,
    #[error("Chain id {0} is configured more than once")]
    DuplicateChain(u64),
    #[error("Network {chain_id}: {reason}")]
    InvalidNetwork { chain_id: u64, reason: String },
}

impl<'de> serde::Deserialize<'de> for ProviderErrorCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct Visitor;
        impl serde::de::Visitor<'_> for Visitor {
            type Value = ProviderErrorCode;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(formatter, "Expecting an integer ProviderErrorCode")
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                match v {
                    4001 => Ok(ProviderErrorCode::UserRejected),
                    4100 => Ok(ProviderErrorCode::Unauthorized),
                    4200 => Ok(ProviderErrorCode::UnsupportedMethod),
                    4900 => Ok(ProviderErrorCode::Disconnected),
                    4901 => Ok(ProviderErrorCode::ChainDisconnected),
                    4902 => Ok(ProviderErrorCode::UnrecognizedChain),
                    -32002 => Ok(ProviderErrorCode::RequestPending),
                    -32603 => Ok(ProviderErrorCode::Internal),
                    unknown => Ok(ProviderErrorCode::Unknown(unknown)),
                }
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                let v = i64::try_from(v).map_err(|_| E::custom("error code out of range"))?;
                self.visit_i64(v)
            }

            // javascript numbers reach us as doubles
            fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                if v.fract() != 0.0 {
                    return Err(E::custom(format!("non integer error code {v}")));
                }
                self.visit_i64(v as i64)
            }
        }

        deserializer.deserialize_i64(Visitor)
    }
}
