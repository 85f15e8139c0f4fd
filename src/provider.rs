use crate::{
    Address,
    error::{ProviderError, ProviderErrorCode},
    ffi::{self, RequestArguments},
    network::{ChainId, NetworkDescriptor},
    quantity,
};
use futures::future::LocalBoxFuture;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::rc::Rc;
use wasm_bindgen::{JsCast as _, JsValue, closure::Closure};

/// Notifications pushed by the wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    /// The exposed accounts changed. An empty list means the user revoked
    /// the access or locked the wallet.
    AccountsChanged(Vec<Address>),
    ChainChanged(ChainId),
    /// The wallet lost the connection to every chain.
    Disconnect(ProviderError),
}

pub type Listener = Rc<dyn Fn(ProviderEvent)>;

/// The capabilities the [`Connector`] relies on.
///
/// The wallet owns the session, this trait only forwards requests. The
/// browser implementation is [`BrowserProvider`].
///
/// [`Connector`]: crate::Connector
#[allow(async_fn_in_trait)]
pub trait ProviderRuntime: 'static {
    /// Unregisters the listener when dropped.
    type Subscription;

    /// accounts already authorised for this application, without prompting
    async fn accounts(&self) -> Result<Vec<Address>, ProviderError>;

    /// ask the user to authorise this application, prompting if needed
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError>;

    async fn chain_id(&self) -> Result<ChainId, ProviderError>;

    /// native balance of `address`, in the smallest unit
    async fn balance(&self, address: &Address) -> Result<u128, ProviderError>;

    async fn revoke_permissions(&self) -> Result<(), ProviderError>;

    async fn switch_chain(&self, chain_id: ChainId) -> Result<(), ProviderError>;

    async fn add_chain(&self, network: &NetworkDescriptor) -> Result<(), ProviderError>;

    fn subscribe(&self, listener: Listener) -> Self::Subscription;

    /// run `task` in the background, on the current thread
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
}

/// The wallet injected in the page as `window.ethereum`.
#[derive(Clone, PartialEq)]
pub struct BrowserProvider {
    eip1193: ffi::Eip1193Provider,
}

/// Keeps the event listeners registered on the [`BrowserProvider`].
pub struct BrowserSubscription {
    eip1193: ffi::Eip1193Provider,
    listeners: Vec<(&'static str, Closure<dyn FnMut(JsValue)>)>,
}

impl BrowserProvider {
    /// Returns `None` if no wallet extension injected a provider.
    ///
    /// Extensions inject the provider while the page loads, make sure the
    /// page is fully loaded before calling this function.
    pub fn injected() -> Option<Self> {
        ffi::eip1193::ETHEREUM.with(|opt| opt.clone().map(Self::new))
    }

    pub fn new(eip1193: ffi::Eip1193Provider) -> Self {
        Self { eip1193 }
    }

    async fn request(&self, args: RequestArguments) -> Result<JsValue, ProviderError> {
        let method = args.method;
        let args = args.to_js().map_err(|error| {
            ProviderError::internal(format!("Couldn't encode the `{method}' request: {error}"))
        })?;

        match self.eip1193.request(args).await {
            Ok(value) => Ok(value),
            Err(error) => serde_wasm_bindgen::from_value(error.clone())
                .map_err(|decode_error| {
                    ProviderError::internal(format!(
                        "Couldn't decode the error content: {decode_error} ({error:?})"
                    ))
                })
                .and_then(Err),
        }
    }

    async fn request_as<T>(&self, args: RequestArguments) -> Result<T, ProviderError>
    where
        T: DeserializeOwned,
    {
        let method = args.method;
        let value = self.request(args).await?;
        serde_wasm_bindgen::from_value(value.clone()).map_err(|error| {
            ProviderError::internal(format!(
                "Unexpected result for `{method}' ({value:?}): {error}"
            ))
        })
    }

    fn listen(
        &self,
        event: &'static str,
        handler: impl FnMut(JsValue) + 'static,
    ) -> (&'static str, Closure<dyn FnMut(JsValue)>) {
        let closure = Closure::<dyn FnMut(JsValue)>::new(handler);
        self.eip1193.on(event, closure.as_ref().unchecked_ref());
        (event, closure)
    }
}

impl ProviderRuntime for BrowserProvider {
    type Subscription = BrowserSubscription;

    async fn accounts(&self) -> Result<Vec<Address>, ProviderError> {
        let accounts = self
            .request_as(RequestArguments::new("eth_accounts"))
            .await?;
        parse_accounts(accounts)
    }

    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        let accounts = self
            .request_as(RequestArguments::new("eth_requestAccounts"))
            .await?;
        parse_accounts(accounts)
    }

    async fn chain_id(&self) -> Result<ChainId, ProviderError> {
        let chain_id: String = self
            .request_as(RequestArguments::new("eth_chainId"))
            .await?;
        ChainId::from_hex(&chain_id).map_err(|error| {
            ProviderError::internal(format!("Invalid chain id `{chain_id}': {error}"))
        })
    }

    async fn balance(&self, address: &Address) -> Result<u128, ProviderError> {
        let args = RequestArguments::new("eth_getBalance")
            .param(json!(address.to_hex()))
            .param(json!("latest"));
        let balance: String = self.request_as(args).await?;
        quantity::decode(&balance).map_err(|error| {
            ProviderError::internal(format!("Invalid balance `{balance}': {error}"))
        })
    }

    async fn revoke_permissions(&self) -> Result<(), ProviderError> {
        let args =
            RequestArguments::new("wallet_revokePermissions").param(json!({ "eth_accounts": {} }));
        self.request(args).await.map(|_| ())
    }

    async fn switch_chain(&self, chain_id: ChainId) -> Result<(), ProviderError> {
        let args = RequestArguments::new("wallet_switchEthereumChain")
            .param(json!({ "chainId": chain_id.to_hex() }));
        self.request(args).await.map(|_| ())
    }

    async fn add_chain(&self, network: &NetworkDescriptor) -> Result<(), ProviderError> {
        let args = RequestArguments::new("wallet_addEthereumChain").param(add_chain_param(network));
        self.request(args).await.map(|_| ())
    }

    fn subscribe(&self, listener: Listener) -> BrowserSubscription {
        let on_accounts = Rc::clone(&listener);
        let on_chain = Rc::clone(&listener);
        let on_disconnect = listener;

        let listeners = vec![
            self.listen("accountsChanged", move |value| {
                let accounts = serde_wasm_bindgen::from_value::<Vec<String>>(value)
                    .map_err(|error| ProviderError::internal(error.to_string()))
                    .and_then(parse_accounts);
                match accounts {
                    Ok(accounts) => on_accounts(ProviderEvent::AccountsChanged(accounts)),
                    Err(error) => log::warn!("Ignoring `accountsChanged' event: {error}"),
                }
            }),
            self.listen("chainChanged", move |value| {
                match value.as_string().map(|hex| ChainId::from_hex(&hex)) {
                    Some(Ok(chain_id)) => on_chain(ProviderEvent::ChainChanged(chain_id)),
                    _ => log::warn!("Ignoring `chainChanged' event: {value:?}"),
                }
            }),
            self.listen("disconnect", move |value| {
                let error = serde_wasm_bindgen::from_value(value).unwrap_or(ProviderError {
                    code: ProviderErrorCode::Disconnected,
                    message: String::new(),
                });
                on_disconnect(ProviderEvent::Disconnect(error))
            }),
        ];

        BrowserSubscription {
            eip1193: self.eip1193.clone(),
            listeners,
        }
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task)
    }
}

impl Drop for BrowserSubscription {
    fn drop(&mut self) {
        for (event, closure) in self.listeners.drain(..) {
            self.eip1193
                .remove_listener(event, closure.as_ref().unchecked_ref());
        }
    }
}

fn parse_accounts(accounts: Vec<String>) -> Result<Vec<Address>, ProviderError> {
    accounts
        .iter()
        .map(|account| {
            Address::from_hex(account).map_err(|error| {
                ProviderError::internal(format!("Invalid account `{account}': {error}"))
            })
        })
        .collect()
}

/// parameter of `wallet_addEthereumChain` (EIP-3085)
fn add_chain_param(network: &NetworkDescriptor) -> serde_json::Value {
    json!({
        "chainId": network.chain_id.to_hex(),
        "chainName": network.name,
        "nativeCurrency": {
            "name": network.native_currency.name,
            "symbol": network.native_currency.symbol,
            "decimals": network.native_currency.decimals,
        },
        "rpcUrls": [network.rpc_url],
        "blockExplorerUrls": [network.explorer_url],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accounts_list() {
        let accounts = parse_accounts(vec![
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".to_owned(),
            format!("0x{}", "00".repeat(20)),
        ])
        .unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[1], Address::new([0; 20]));

        let error = parse_accounts(vec!["0x1234".to_owned()]).unwrap_err();
        assert_eq!(error.code, ProviderErrorCode::Internal);
        assert!(error.message.contains("0x1234"));

        assert_eq!(parse_accounts(Vec::new()).unwrap(), Vec::new());
    }

    #[test]
    fn add_chain_param_json() {
        assert_eq!(
            add_chain_param(&NetworkDescriptor::base_sepolia()),
            json!({
                "chainId": "0x14a34",
                "chainName": "Base Sepolia",
                "nativeCurrency": { "name": "Ether", "symbol": "ETH", "decimals": 18 },
                "rpcUrls": ["https://sepolia.base.org"],
                "blockExplorerUrls": ["https://sepolia.basescan.org"],
            })
        );
    }
}
