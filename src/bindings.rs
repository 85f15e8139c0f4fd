//! The connector as seen from javascript.
//!
//! ```js
//! import init, { WalletConnector } from "evm-connector";
//!
//! await init();
//! const wallet = new WalletConnector();
//! const subscription = wallet.onChange(async () => render(await wallet.snapshot()));
//! wallet.connect();
//! ```

use crate::{BrowserProvider, ChainId, Connector, Networks, provider::BrowserSubscription};
use serde::Serialize as _;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(js_name = "WalletConnector")]
pub struct JsConnector {
    connector: Connector<BrowserProvider>,
}

/// Call `free()` to stop receiving the wallet notifications.
#[wasm_bindgen(js_name = "WalletSubscription")]
pub struct JsSubscription {
    _subscription: BrowserSubscription,
}

#[wasm_bindgen(js_class = "WalletConnector")]
impl JsConnector {
    /// `networks` is an optional JSON array of network descriptors, Base
    /// Sepolia is used when omitted. Fails if no wallet is injected in the
    /// page or if the networks are invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(networks: Option<String>) -> Result<JsConnector, JsError> {
        let networks = match networks {
            Some(json) => Networks::from_json(&json)?,
            None => Networks::default(),
        };
        let provider =
            BrowserProvider::injected().ok_or_else(|| JsError::new("No wallet detected"))?;

        Ok(Self {
            connector: Connector::new(provider, networks),
        })
    }

    /// resolves to `{ address, isConnected, chainId, activeChain, balance }`
    pub fn snapshot(&self) -> js_sys::Promise {
        let connector = self.connector.clone();
        wasm_bindgen_futures::future_to_promise(async move {
            let snapshot = connector.snapshot().await;
            snapshot
                .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
                .map_err(JsValue::from)
        })
    }

    pub fn connect(&self) {
        self.connector.connect()
    }

    pub fn reconnect(&self) {
        self.connector.reconnect()
    }

    pub fn disconnect(&self) {
        self.connector.disconnect()
    }

    /// switch the wallet to the configured network with the given chain id
    #[wasm_bindgen(js_name = "switchNetwork")]
    pub fn switch_network(&self, chain_id: u32) -> Result<js_sys::Promise, JsError> {
        let network = self
            .connector
            .networks()
            .find(ChainId(u64::from(chain_id)))
            .cloned()
            .ok_or_else(|| JsError::new(&format!("Chain {chain_id} is not configured")))?;

        let connector = self.connector.clone();
        Ok(wasm_bindgen_futures::future_to_promise(async move {
            connector
                .switch_network(&network)
                .await
                .map(|()| JsValue::UNDEFINED)
                .map_err(|error| JsError::from(error).into())
        }))
    }

    /// `callback` is called with no argument every time the wallet reports
    /// a change of accounts, chain or connection
    #[wasm_bindgen(js_name = "onChange")]
    pub fn on_change(&self, callback: js_sys::Function) -> JsSubscription {
        let subscription = self.connector.subscribe(move |event| {
            log::debug!("wallet event: {event:?}");
            if let Err(error) = callback.call0(&JsValue::NULL) {
                log::warn!("wallet change callback failed: {error:?}");
            }
        });
        JsSubscription {
            _subscription: subscription,
        }
    }
}
