use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    /// The provider injected by the wallet extension, if any.
    #[wasm_bindgen(thread_local_v2, js_namespace = ["window"], js_name = "ethereum")]
    pub static ETHEREUM: Option<Eip1193Provider>;
}

#[wasm_bindgen]
extern "C" {
    #[derive(Clone, PartialEq)]
    pub type Eip1193Provider;

    /// Submit a JSON-RPC request to the wallet. `args` is a
    /// `{ method, params }` object, see [`RequestArguments`].
    ///
    /// The promise rejects with a `ProviderRpcError` (`{ code, message }`).
    /// Requests such as `eth_requestAccounts` may prompt the user and stay
    /// pending until the user answers.
    ///
    /// More details [EIP-1193](https://eips.ethereum.org/EIPS/eip-1193#request)
    ///
    #[wasm_bindgen(method, catch)]
    pub async fn request(this: &Eip1193Provider, args: JsValue) -> Result<JsValue, JsValue>;

    /// Register a listener for one of the provider events: `connect`,
    /// `disconnect`, `chainChanged`, `accountsChanged` or `message`.
    #[wasm_bindgen(method)]
    pub fn on(this: &Eip1193Provider, event: &str, listener: &js_sys::Function);

    #[wasm_bindgen(method, js_name = "removeListener")]
    pub fn remove_listener(this: &Eip1193Provider, event: &str, listener: &js_sys::Function);
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RequestArguments {
    pub method: &'static str,
    pub params: Vec<serde_json::Value>,
}

impl RequestArguments {
    pub fn new(method: &'static str) -> Self {
        Self {
            method,
            params: Vec::new(),
        }
    }

    pub fn param(mut self, param: serde_json::Value) -> Self {
        self.params.push(param);
        self
    }

    /// encode as a plain javascript object (not a `Map`) so wallets can read
    /// nested parameters
    pub fn to_js(&self) -> Result<JsValue, serde_wasm_bindgen::Error> {
        use serde::Serialize as _;

        self.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
    }
}
