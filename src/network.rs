use crate::{
    Address,
    error::{ConfigError, ParseError},
    quantity,
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// EIP-155 chain identifier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ChainId(pub u64);

impl ChainId {
    pub const BASE_SEPOLIA: Self = Self(84532);

    /// decode the chain id as returned by `eth_chainId` (`"0x14a34"`)
    pub fn from_hex(input: &str) -> Result<Self, ParseError> {
        quantity::decode_u64(input).map(Self)
    }

    pub fn to_hex(self) -> String {
        quantity::encode(u128::from(self.0))
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// accepts both the decimal form (as displayed) and the `0x` hex form
impl FromStr for ChainId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("0x") || s.starts_with("0X") {
            return Self::from_hex(s);
        }
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::InvalidDecimal(s.to_owned()));
        }
        s.parse()
            .map(Self)
            .map_err(|_| ParseError::Overflow(s.to_owned()))
    }
}

impl From<ChainId> for u64 {
    fn from(chain_id: ChainId) -> Self {
        chain_id.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl NativeCurrency {
    pub fn ether() -> Self {
        Self {
            name: "Ether".to_owned(),
            symbol: "ETH".to_owned(),
            decimals: 18,
        }
    }
}

/// Static description of a supported chain.
///
/// Built once when the application starts and never mutated afterward.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDescriptor {
    pub chain_id: ChainId,
    pub name: String,
    pub native_currency: NativeCurrency,
    pub rpc_url: String,
    pub explorer_url: String,
}

impl NetworkDescriptor {
    pub fn base_sepolia() -> Self {
        Self {
            chain_id: ChainId::BASE_SEPOLIA,
            name: "Base Sepolia".to_owned(),
            native_currency: NativeCurrency::ether(),
            rpc_url: "https://sepolia.base.org".to_owned(),
            explorer_url: "https://sepolia.basescan.org".to_owned(),
        }
    }

    pub fn explorer_address_url(&self, address: &Address) -> String {
        format!("{}/address/{address}", self.explorer_url.trim_end_matches('/'))
    }

    pub fn explorer_tx_url(&self, transaction_hash: &str) -> String {
        format!(
            "{}/tx/{transaction_hash}",
            self.explorer_url.trim_end_matches('/')
        )
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidNetwork {
            chain_id: self.chain_id.0,
            reason: reason.to_owned(),
        };

        if self.name.trim().is_empty() {
            return Err(invalid("empty name"));
        }
        if self.native_currency.symbol.trim().is_empty() {
            return Err(invalid("empty native currency symbol"));
        }
        if self.native_currency.decimals > 36 {
            return Err(invalid("native currency has more than 36 decimals"));
        }
        if !is_http_url(&self.rpc_url) {
            return Err(invalid("rpcUrl must be an http(s) URL"));
        }
        if !is_http_url(&self.explorer_url) {
            return Err(invalid("explorerUrl must be an http(s) URL"));
        }
        Ok(())
    }
}

fn is_http_url(url: &str) -> bool {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .is_some_and(|rest| !rest.is_empty())
}

/// The networks the application supports, the first one being the default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Networks {
    networks: Vec<NetworkDescriptor>,
}

impl Networks {
    pub fn new(networks: Vec<NetworkDescriptor>) -> Result<Self, ConfigError> {
        if networks.is_empty() {
            return Err(ConfigError::NoNetwork);
        }

        for (index, network) in networks.iter().enumerate() {
            network.validate()?;
            if networks[..index]
                .iter()
                .any(|other| other.chain_id == network.chain_id)
            {
                return Err(ConfigError::DuplicateChain(network.chain_id.0));
            }
        }

        Ok(Self { networks })
    }

    /// load the networks from a JSON array of network descriptors
    ///
    /// ```
    /// # use evm_connector::Networks;
    /// let networks = Networks::from_json(r#"[{
    ///     "chainId": 84532,
    ///     "name": "Base Sepolia",
    ///     "nativeCurrency": { "name": "Ether", "symbol": "ETH", "decimals": 18 },
    ///     "rpcUrl": "https://sepolia.base.org",
    ///     "explorerUrl": "https://sepolia.basescan.org"
    /// }]"#).unwrap();
    /// assert_eq!(networks.default_network().name, "Base Sepolia");
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let networks: Vec<NetworkDescriptor> = serde_json::from_str(json)?;
        Self::new(networks)
    }

    pub fn default_network(&self) -> &NetworkDescriptor {
        &self.networks[0]
    }

    pub fn find(&self, chain_id: ChainId) -> Option<&NetworkDescriptor> {
        self.networks
            .iter()
            .find(|network| network.chain_id == chain_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NetworkDescriptor> {
        self.networks.iter()
    }
}

impl Default for Networks {
    fn default() -> Self {
        Self {
            networks: vec![NetworkDescriptor::base_sepolia()],
        }
    }
}
