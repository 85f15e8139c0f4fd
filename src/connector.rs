use crate::{
    Address,
    error::{ProviderError, ProviderErrorCode},
    network::{NetworkDescriptor, Networks},
    provider::{ProviderEvent, ProviderRuntime},
    snapshot::{ActiveChain, Balance, ConnectionSnapshot},
};
use log::{debug, info, warn};
use std::{cell::Cell, rc::Rc};

/// Session bookkeeping.
///
/// Every request to connect or disconnect starts a new generation. A pending
/// connection request only takes effect if no other request started since.
#[derive(Debug, Default)]
struct Session {
    generation: Cell<u64>,
    active: Cell<bool>,
    pending: Cell<bool>,
}

impl Session {
    fn begin(&self) -> u64 {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        self.pending.set(true);
        generation
    }

    fn end(&self) {
        self.generation.set(self.generation.get() + 1);
        self.active.set(false);
        self.pending.set(false);
    }

    fn is_idle(&self) -> bool {
        !self.active.get() && !self.pending.get()
    }

    fn settle(
        &self,
        generation: u64,
        request: &str,
        accounts: Result<Vec<Address>, ProviderError>,
    ) {
        if self.generation.get() != generation {
            debug!("{request} #{generation} superseded, ignoring its outcome");
            return;
        }
        self.pending.set(false);

        match accounts {
            Ok(accounts) => match accounts.first() {
                Some(address) => {
                    self.active.set(true);
                    debug!("{request} #{generation} succeeded: {address}");
                }
                None => debug!("{request} #{generation}: no account available"),
            },
            Err(error) if error.is_user_rejection() => {
                info!("{request} #{generation} rejected by the user: {error}")
            }
            // a prompt opened earlier is still waiting on the user, the
            // answer comes back as an `accountsChanged` event
            Err(error) if error.code == ProviderErrorCode::RequestPending => {
                info!("{request} #{generation}: the wallet already has a prompt open")
            }
            Err(error) => warn!("{request} #{generation} failed: {error}"),
        }
    }
}

/// Read and action surface over the wallet.
///
/// The three core operations never fail: anything that goes wrong (no
/// wallet, user rejection, provider error) is observed as a disconnected
/// [`ConnectionSnapshot`].
pub struct Connector<R> {
    runtime: Rc<R>,
    networks: Rc<Networks>,
    session: Rc<Session>,
}

impl<R> Clone for Connector<R> {
    fn clone(&self) -> Self {
        Self {
            runtime: Rc::clone(&self.runtime),
            networks: Rc::clone(&self.networks),
            session: Rc::clone(&self.session),
        }
    }
}

impl<R: ProviderRuntime> Connector<R> {
    pub fn new(runtime: R, networks: Networks) -> Self {
        Self {
            runtime: Rc::new(runtime),
            networks: Rc::new(networks),
            session: Rc::default(),
        }
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    pub fn networks(&self) -> &Networks {
        &self.networks
    }

    /// read the current state of the connection from the wallet
    ///
    /// If the session ends while the wallet is being queried the snapshot
    /// is disconnected.
    pub async fn snapshot(&self) -> ConnectionSnapshot {
        if !self.session.active.get() {
            return ConnectionSnapshot::disconnected();
        }
        let generation = self.session.generation.get();

        let snapshot = match self.read().await {
            Ok(snapshot) => snapshot,
            Err(error) => {
                warn!("Couldn't read the wallet state: {error}");
                ConnectionSnapshot::disconnected()
            }
        };

        if !self.session.active.get() || self.session.generation.get() != generation {
            return ConnectionSnapshot::disconnected();
        }
        snapshot
    }

    async fn read(&self) -> Result<ConnectionSnapshot, ProviderError> {
        let accounts = self.runtime.accounts().await?;
        let Some(address) = accounts.first().copied() else {
            return Ok(ConnectionSnapshot::disconnected());
        };

        let chain_id = match self.runtime.chain_id().await {
            Ok(chain_id) => Some(chain_id),
            Err(error) => {
                warn!("Couldn't read the wallet's chain: {error}");
                None
            }
        };
        let network = chain_id.and_then(|chain_id| self.networks.find(chain_id));
        let currency = &network
            .unwrap_or_else(|| self.networks.default_network())
            .native_currency;

        let balance = match self.runtime.balance(&address).await {
            Ok(value) => Some(Balance::new(value, currency)),
            Err(error) => {
                warn!("Couldn't read the balance of {address}: {error}");
                None
            }
        };

        Ok(ConnectionSnapshot::connected(
            address,
            chain_id,
            network.map(ActiveChain::from),
            balance,
        ))
    }

    /// ask the wallet to connect, prompting the user if needed
    ///
    /// Returns immediately, the outcome is observed with
    /// [`Connector::snapshot`]. Does nothing if already connected or if a
    /// connection request is in flight.
    pub fn connect(&self) {
        if self.session.active.get() {
            debug!("connect: already connected");
            return;
        }
        if self.session.pending.get() {
            debug!("connect: a connection request is already in flight");
            return;
        }

        let generation = self.session.begin();
        let runtime = Rc::clone(&self.runtime);
        let session = Rc::clone(&self.session);
        self.runtime.spawn(Box::pin(async move {
            let accounts = runtime.request_accounts().await;
            session.settle(generation, "connection request", accounts);
        }));
    }

    /// restore a session the user already authorised, without prompting
    ///
    /// Useful when the application starts. Does nothing if already connected
    /// or if a connection request is in flight.
    pub fn reconnect(&self) {
        if self.session.active.get() || self.session.pending.get() {
            return;
        }

        let generation = self.session.begin();
        let runtime = Rc::clone(&self.runtime);
        let session = Rc::clone(&self.session);
        self.runtime.spawn(Box::pin(async move {
            let accounts = runtime.accounts().await;
            session.settle(generation, "reconnection", accounts);
        }));
    }

    /// end the session
    ///
    /// The next [`Connector::snapshot`] is disconnected and pending
    /// connection requests are discarded. The wallet is asked, in the
    /// background, to revoke the permissions of the application.
    pub fn disconnect(&self) {
        if self.session.is_idle() {
            return;
        }

        self.session.end();
        debug!("disconnected");

        let runtime = Rc::clone(&self.runtime);
        self.runtime.spawn(Box::pin(async move {
            match runtime.revoke_permissions().await {
                Ok(()) => debug!("wallet permissions revoked"),
                // not every wallet implements it, the session is closed on our side anyway
                Err(error) if error.code == ProviderErrorCode::UnsupportedMethod => {
                    debug!("wallet can't revoke permissions: {error}")
                }
                Err(error) => warn!("Couldn't revoke the wallet permissions: {error}"),
            }
        }));
    }

    /// ask the wallet to move to `network`, registering the chain in the
    /// wallet first if it does not know it yet
    pub async fn switch_network(&self, network: &NetworkDescriptor) -> Result<(), ProviderError> {
        match self.runtime.switch_chain(network.chain_id).await {
            Err(error) if error.code == ProviderErrorCode::UnrecognizedChain => {
                debug!("adding {} ({}) to the wallet", network.name, network.chain_id);
                self.runtime.add_chain(network).await?;
                self.runtime.switch_chain(network.chain_id).await
            }
            result => result,
        }
    }

    /// be notified when the wallet state changes
    ///
    /// The listener is a hint to call [`Connector::snapshot`] again. Losing
    /// every account or the wallet disconnecting ends the session. Accounts
    /// exposed while disconnected (the user approved from the wallet) start
    /// one.
    pub fn subscribe(&self, listener: impl Fn(ProviderEvent) + 'static) -> R::Subscription {
        let session = Rc::clone(&self.session);
        self.runtime.subscribe(Rc::new(move |event: ProviderEvent| {
            match &event {
                ProviderEvent::AccountsChanged(accounts) if accounts.is_empty() => {
                    debug!("wallet exposes no account anymore");
                    session.end();
                }
                ProviderEvent::AccountsChanged(accounts) if !session.active.get() => {
                    let generation = session.begin();
                    session.settle(generation, "wallet authorisation", Ok(accounts.clone()));
                }
                ProviderEvent::Disconnect(error) => {
                    debug!("wallet disconnected: {error}");
                    session.end();
                }
                _ => (),
            }
            listener(event)
        }))
    }
}
