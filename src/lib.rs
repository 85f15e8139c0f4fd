/*!

# EVM wallet connector

This library is meant to be used by web applications that need to interact with
the EVM wallet injected in the page (`window.ethereum`, [EIP-1193]). It exposes
a small and stable surface over the wallet: a snapshot of the connection and two
actions, connect and disconnect.

## Features

- Connect to and disconnect from the injected wallet
- Read the connected account, its chain and its native balance
- Switch the wallet to one of the configured networks
- Be notified of the wallet changes

## Usage

Create a [`Connector`] over the injected wallet, with the networks the
application supports (Base Sepolia by default):

```no_run
use evm_connector::{BrowserProvider, Connector, Networks};

# fn test() -> anyhow::Result<()> {
let provider = BrowserProvider::injected().ok_or(anyhow::anyhow!("no wallet"))?;
let connector = Connector::new(provider, Networks::default());
# Ok(()) }
```

[`Connector::connect`] and [`Connector::disconnect`] return immediately, the
outcome is observed by reading the [`ConnectionSnapshot`] again:

```no_run
# use evm_connector::{BrowserProvider, Connector, Networks};
#
# async fn test() -> anyhow::Result<()> {
# let connector = Connector::new(BrowserProvider::injected().unwrap(), Networks::default());
connector.connect();

let snapshot = connector.snapshot().await;
if let Some(balance) = snapshot.balance() {
    println!("{}: {} {}", snapshot.address().unwrap(), balance.formatted(), balance.symbol);
}
# Ok(()) }
```

A disconnected snapshot is the only failure signal: the wallet is missing,
the user declined or the request is still pending.

[EIP-1193]: https://eips.ethereum.org/EIPS/eip-1193

*/

mod address;
pub mod bindings;
mod connector;
pub mod error;
pub mod ffi;
pub mod network;
pub mod provider;
pub mod quantity;
mod snapshot;

pub use self::{
    address::Address,
    connector::Connector,
    network::{ChainId, NativeCurrency, NetworkDescriptor, Networks},
    provider::{BrowserProvider, ProviderEvent, ProviderRuntime},
    snapshot::{ActiveChain, Balance, ConnectionSnapshot},
};
