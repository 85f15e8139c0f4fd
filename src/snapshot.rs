use crate::{
    Address,
    network::{ChainId, NativeCurrency, NetworkDescriptor},
};
use serde::Serialize;

/// Native token balance of the connected account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Balance {
    /// amount in the smallest unit of the currency (wei for ETH)
    #[serde(serialize_with = "serialize_decimal")]
    pub value: u128,
    pub decimals: u8,
    pub symbol: String,
}

impl Balance {
    pub fn new(value: u128, currency: &NativeCurrency) -> Self {
        Self {
            value,
            decimals: currency.decimals,
            symbol: currency.symbol.clone(),
        }
    }

    /// the value expressed in whole units, without trailing zeros
    ///
    /// `1_500_000_000_000_000_000` wei gives `"1.5"`.
    pub fn formatted(&self) -> String {
        let digits = self.value.to_string();
        let decimals = usize::from(self.decimals);
        if decimals == 0 {
            return digits;
        }

        let digits = format!("{digits:0>width$}", width = decimals + 1);
        let (whole, fraction) = digits.split_at(digits.len() - decimals);
        let fraction = fraction.trim_end_matches('0');
        if fraction.is_empty() {
            whole.to_owned()
        } else {
            format!("{whole}.{fraction}")
        }
    }
}

// balances easily exceed what a javascript number holds
fn serialize_decimal<S>(value: &u128, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(value)
}

/// The chain the wallet is currently on, as configured by the application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveChain {
    pub id: ChainId,
    pub name: String,
    pub native_currency: NativeCurrency,
}

impl From<&NetworkDescriptor> for ActiveChain {
    fn from(network: &NetworkDescriptor) -> Self {
        Self {
            id: network.chain_id,
            name: network.name.clone(),
            native_currency: network.native_currency.clone(),
        }
    }
}

/// Point in time view of the wallet connection.
///
/// A snapshot can only be built connected (with an address) or disconnected
/// (with nothing at all), so `is_connected()` always matches the presence of
/// the address and a disconnected snapshot never carries a chain or a balance.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionSnapshot {
    address: Option<Address>,
    is_connected: bool,
    chain_id: Option<ChainId>,
    active_chain: Option<ActiveChain>,
    balance: Option<Balance>,
}

impl ConnectionSnapshot {
    pub fn disconnected() -> Self {
        Self::default()
    }

    pub fn connected(
        address: Address,
        chain_id: Option<ChainId>,
        active_chain: Option<ActiveChain>,
        balance: Option<Balance>,
    ) -> Self {
        Self {
            address: Some(address),
            is_connected: true,
            chain_id,
            active_chain,
            balance,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.is_connected
    }

    pub fn address(&self) -> Option<&Address> {
        self.address.as_ref()
    }

    /// the chain id reported by the wallet, even if the application does not
    /// know about this chain
    pub fn chain_id(&self) -> Option<ChainId> {
        self.chain_id
    }

    /// `None` if disconnected or if the wallet is on a chain that is not
    /// configured
    pub fn active_chain(&self) -> Option<&ActiveChain> {
        self.active_chain.as_ref()
    }

    pub fn balance(&self) -> Option<&Balance> {
        self.balance.as_ref()
    }

    /// the wallet is connected but not on one of the configured chains
    pub fn is_unsupported_chain(&self) -> bool {
        self.is_connected && self.active_chain.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn eth(value: u128) -> Balance {
        Balance::new(value, &NativeCurrency::ether())
    }

    #[test]
    fn balance_formatted() {
        assert_eq!(eth(0).formatted(), "0");
        assert_eq!(eth(1).formatted(), "0.000000000000000001");
        assert_eq!(eth(1_500_000_000_000_000_000).formatted(), "1.5");
        assert_eq!(eth(2_000_000_000_000_000_000).formatted(), "2");
        assert_eq!(eth(123_456_000_000_000_000_000).formatted(), "123.456");

        let usdc = NativeCurrency {
            name: "USD Coin".to_owned(),
            symbol: "USDC".to_owned(),
            decimals: 6,
        };
        assert_eq!(Balance::new(1_250_000, &usdc).formatted(), "1.25");

        let unit = NativeCurrency {
            name: "Unit".to_owned(),
            symbol: "U".to_owned(),
            decimals: 0,
        };
        assert_eq!(Balance::new(42, &unit).formatted(), "42");
    }

    #[test]
    fn disconnected_is_empty() {
        let snapshot = ConnectionSnapshot::disconnected();
        assert!(!snapshot.is_connected());
        assert!(snapshot.address().is_none());
        assert!(snapshot.chain_id().is_none());
        assert!(snapshot.active_chain().is_none());
        assert!(snapshot.balance().is_none());
        assert!(!snapshot.is_unsupported_chain());
    }

    #[test]
    fn connected_on_unknown_chain() {
        let snapshot =
            ConnectionSnapshot::connected(Address::new([1; 20]), Some(ChainId(1)), None, None);
        assert!(snapshot.is_connected());
        assert!(snapshot.address().is_some());
        assert!(snapshot.is_unsupported_chain());
    }

    #[test]
    fn snapshot_json() {
        assert_eq!(
            serde_json::to_value(ConnectionSnapshot::disconnected()).unwrap(),
            json!({
                "address": null,
                "isConnected": false,
                "chainId": null,
                "activeChain": null,
                "balance": null,
            })
        );

        let network = NetworkDescriptor::base_sepolia();
        let snapshot = ConnectionSnapshot::connected(
            Address::new([0x11; 20]),
            Some(network.chain_id),
            Some(ActiveChain::from(&network)),
            Some(eth(42)),
        );
        assert_eq!(
            serde_json::to_value(snapshot).unwrap(),
            json!({
                "address": format!("0x{}", "11".repeat(20)),
                "isConnected": true,
                "chainId": 84532,
                "activeChain": {
                    "id": 84532,
                    "name": "Base Sepolia",
                    "nativeCurrency": { "name": "Ether", "symbol": "ETH", "decimals": 18 },
                },
                "balance": { "value": "42", "decimals": 18, "symbol": "ETH" },
            })
        );
    }
}
