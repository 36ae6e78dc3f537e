//! Connection registry.
//!
//! The concurrency-safe map from account id to live connection. All
//! lifecycle transitions (init, pairing, restore, logout, error eviction)
//! mutate the map under one lock; wire calls happen outside it so accounts
//! never block each other. Login and restore share the evict-then-reinit
//! discipline: any stale entry and its credential file are torn down before
//! a new attempt, so a failed attempt leaves the account cleanly absent
//! rather than half-initialized.

use std::{
    collections::HashMap,
    sync::{Arc, Weak},
    time::Duration,
};

use {
    tokio::sync::{RwLock, oneshot},
    tracing::{debug, info, warn},
};

use {
    wagate_common::GatewayError,
    wagate_wire::{
        ClientIdentity, Credential, EventSink, ProtocolVersion, WireClient, WireConnector,
        WireError,
    },
};

use crate::{
    pairing,
    store::{CredentialStore, StoreError},
};

/// Delay between connection init and event-handler attachment, so backlog
/// history replayed by the network is not forwarded to the webhook.
pub const HANDLER_GRACE: Duration = Duration::from_secs(10);

/// Handshake timeout used by the startup sweep.
pub const RESTORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Back-off before reconnecting an account whose transport dropped.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(30);

/// Result of a [`SessionRegistry::connect`] rendezvous.
#[derive(Debug)]
pub enum ConnectOutcome {
    /// A fresh pairing is required; scan this base64 PNG. The underlying
    /// connect task keeps running and commits the session once the code is
    /// scanned.
    Pairing { code_png: String },
    /// The session is live without pairing (restored or already connected).
    Connected,
}

struct SessionHandle {
    client: Arc<dyn WireClient>,
    version: ProtocolVersion,
}

/// Account-keyed registry of live connections.
pub struct SessionRegistry {
    connector: Arc<dyn WireConnector>,
    identity: ClientIdentity,
    store: CredentialStore,
    sink: Option<Arc<dyn EventSink>>,
    sessions: RwLock<HashMap<String, SessionHandle>>,
    /// Self-reference for the detached tasks spawned by connect/init.
    self_ref: Weak<Self>,
}

impl SessionRegistry {
    pub fn new(
        connector: Arc<dyn WireConnector>,
        identity: ClientIdentity,
        store: CredentialStore,
        sink: Option<Arc<dyn EventSink>>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            connector,
            identity,
            store,
            sink,
            sessions: RwLock::new(HashMap::new()),
            self_ref: me.clone(),
        })
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Registry presence is the sole source of truth for "connected".
    pub async fn is_connected(&self, account_id: &str) -> bool {
        self.sessions.read().await.contains_key(account_id)
    }

    /// Protocol version negotiated for a live session.
    pub async fn version(&self, account_id: &str) -> Option<ProtocolVersion> {
        self.sessions
            .read()
            .await
            .get(account_id)
            .map(|h| h.version)
    }

    pub(crate) async fn client_for(&self, account_id: &str) -> Option<Arc<dyn WireClient>> {
        self.sessions
            .read()
            .await
            .get(account_id)
            .map(|h| Arc::clone(&h.client))
    }

    pub(crate) async fn evict(&self, account_id: &str) {
        if self.sessions.write().await.remove(account_id).is_some() {
            debug!(account = account_id, "session evicted");
        }
    }

    /// Ensure a connection object exists for the account. No-op when one is
    /// already registered. Handler attachment is deferred by
    /// [`HANDLER_GRACE`] so offline backlog is not replayed to the webhook.
    pub async fn init(&self, account_id: &str, timeout: Duration) -> Result<(), GatewayError> {
        if self.is_connected(account_id).await {
            return Ok(());
        }

        let client = self
            .connector
            .connect(&self.identity, timeout)
            .await
            .map_err(wire_err)?;
        let version = client.sync_version().await.map_err(wire_err)?;
        info!(account = account_id, %version, "connection initialized");

        {
            let mut sessions = self.sessions.write().await;
            if sessions.contains_key(account_id) {
                // Lost an init race; keep the established connection.
                return Ok(());
            }
            sessions.insert(account_id.to_string(), SessionHandle {
                client: Arc::clone(&client),
                version,
            });
        }

        if let Some(failure_rx) = client.take_failure() {
            let account = account_id.to_string();
            let registry = self.self_ref.clone();
            let client = Arc::clone(&client);
            tokio::spawn(async move {
                // A dropped sender is orderly shutdown, not a failure.
                let Ok(err) = failure_rx.await else {
                    return;
                };
                let Some(registry) = registry.upgrade() else {
                    return;
                };
                warn!(account = %account, error = %err, "transport failed");
                registry.reconnect(&account, &client).await;
            });
        }

        if let Some(sink) = self.sink.clone() {
            let account = account_id.to_string();
            let registry = self.self_ref.clone();
            tokio::spawn(async move {
                tokio::time::sleep(HANDLER_GRACE).await;
                let Some(registry) = registry.upgrade() else {
                    return;
                };
                let still_live = registry
                    .sessions
                    .read()
                    .await
                    .get(&account)
                    .is_some_and(|h| Arc::ptr_eq(&h.client, &client));
                if !still_live {
                    debug!(account = %account, "connection replaced before handler attach");
                    return;
                }
                info!(account = %account, "event handlers attached");
                sink.attach(&account, client).await;
            });
        }

        Ok(())
    }

    /// Top-level entry point for pairing requests and the startup sweep.
    ///
    /// Restores from a persisted credential when possible, falls back to a
    /// fresh pairing otherwise, and finishes with a liveness probe. The flow
    /// runs in a detached task; this call resolves as soon as either a
    /// pairing code is ready or the flow completes. A caller that stops
    /// waiting does not cancel the flow — the task alone commits or tears
    /// down the registry entry.
    pub async fn connect(
        &self,
        account_id: &str,
        timeout: Duration,
    ) -> Result<ConnectOutcome, GatewayError> {
        let (code_tx, code_rx) = oneshot::channel();
        let (done_tx, done_rx) = oneshot::channel();

        let Some(registry) = self.self_ref.upgrade() else {
            return Err(GatewayError::Protocol("registry is shutting down".to_string()));
        };
        let account = account_id.to_string();
        tokio::spawn(async move {
            let outcome = registry.connect_flow(&account, timeout, code_tx).await;
            let _ = done_tx.send(outcome);
        });

        let mut done_rx = done_rx;
        tokio::select! {
            code = pairing::await_code(timeout, code_rx) => match code {
                Ok(code_png) => Ok(ConnectOutcome::Pairing { code_png }),
                // No code is coming (restored, superseded, or failed before
                // pairing); the flow outcome is authoritative.
                Err(_) => flow_result(done_rx.await),
            },
            flow = &mut done_rx => flow_result(flow),
        }
    }

    async fn connect_flow(
        &self,
        account_id: &str,
        timeout: Duration,
        code_tx: oneshot::Sender<String>,
    ) -> Result<(), GatewayError> {
        if self.is_connected(account_id).await {
            debug!(account = account_id, "already connected, probing");
            return self.probe(account_id).await;
        }

        match self.store.load(account_id) {
            Ok(credential) => {
                if let Err(e) = self.restore(account_id, timeout, credential).await {
                    warn!(account = account_id, error = %e, "restore failed, falling back to pairing");
                    self.login(account_id, timeout, code_tx).await?;
                }
            },
            Err(e) => {
                if matches!(e, StoreError::Corrupt(_)) {
                    warn!(account = account_id, "persisted credential is corrupt, re-pairing");
                }
                self.login(account_id, timeout, code_tx).await?;
            },
        }

        self.probe(account_id).await
    }

    /// Pair the account from scratch. Any existing entry and its credential
    /// file are force-evicted first so the attempt starts clean.
    pub async fn login(
        &self,
        account_id: &str,
        timeout: Duration,
        code_tx: oneshot::Sender<String>,
    ) -> Result<(), GatewayError> {
        self.force_clean(account_id).await?;
        self.init(account_id, timeout).await?;
        let client = self
            .client_for(account_id)
            .await
            .ok_or(GatewayError::ConnectionInvalid)?;
        let outcome = client.login(code_tx).await;
        self.commit_auth(account_id, outcome).await
    }

    /// Resume a session from persisted credential material. Same
    /// evict-then-reinit shape and error classification as [`Self::login`].
    pub async fn restore(
        &self,
        account_id: &str,
        timeout: Duration,
        credential: Credential,
    ) -> Result<(), GatewayError> {
        self.force_clean(account_id).await?;
        self.init(account_id, timeout).await?;
        let client = self
            .client_for(account_id)
            .await
            .ok_or(GatewayError::ConnectionInvalid)?;
        let outcome = client.restore(credential).await;
        self.commit_auth(account_id, outcome).await
    }

    /// Terminate the session, delete its credential and drop the entry.
    ///
    /// When the credential delete fails the entry intentionally stays
    /// registered and the error is surfaced, so a subsequent logout retries
    /// the cleanup.
    pub async fn logout(&self, account_id: &str) -> Result<(), GatewayError> {
        let Some(client) = self.client_for(account_id).await else {
            return Err(GatewayError::ConnectionInvalid);
        };
        client.logout().await.map_err(wire_err)?;
        if self.store.exists(account_id) {
            self.store.delete(account_id)?;
        }
        self.evict(account_id).await;
        info!(account = account_id, "logged out");
        Ok(())
    }

    /// Startup sweep: reconnect every persisted account in the background.
    /// Individual failures are logged and never block startup.
    pub async fn restore_all(&self) {
        let Some(me) = self.self_ref.upgrade() else {
            return;
        };
        for account in self.store.list() {
            info!(%account, "restoring persisted session");
            let registry = Arc::clone(&me);
            tokio::spawn(async move {
                match registry.connect(&account, RESTORE_TIMEOUT).await {
                    Ok(ConnectOutcome::Connected) => info!(%account, "session restored"),
                    Ok(ConnectOutcome::Pairing { .. }) => {
                        warn!(%account, "stored credential rejected, account must re-pair");
                    },
                    Err(e) => warn!(%account, error = %e, "session restore failed"),
                }
            });
        }
    }

    /// Recovery path for a dropped transport: evict the dead entry, back
    /// off, then restore from the persisted credential. No pairing fallback
    /// here — nobody is waiting on a code, so an account whose credential is
    /// gone or rejected stays absent until the next explicit connect.
    // Boxed return type breaks the `init` -> spawned task -> `reconnect` ->
    // `restore` -> `init` cycle in the future's `Send` analysis.
    fn reconnect<'a>(
        &'a self,
        account_id: &'a str,
        failed: &'a Arc<dyn WireClient>,
    ) -> std::pin::Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(async move {
        {
            let mut sessions = self.sessions.write().await;
            match sessions.get(account_id) {
                Some(h) if Arc::ptr_eq(&h.client, failed) => {
                    sessions.remove(account_id);
                },
                // Already replaced or gone; nothing to recover.
                _ => return,
            }
        }

        tokio::time::sleep(RECONNECT_DELAY).await;

        let credential = match self.store.load(account_id) {
            Ok(credential) => credential,
            Err(e) => {
                warn!(account = account_id, error = %e, "cannot reconnect without a credential");
                return;
            },
        };
        match self.restore(account_id, RESTORE_TIMEOUT, credential).await {
            Ok(()) => info!(account = account_id, "session restored after transport failure"),
            Err(e) => warn!(account = account_id, error = %e, "reconnect failed"),
        }
        })
    }

    async fn probe(&self, account_id: &str) -> Result<(), GatewayError> {
        let client = self
            .client_for(account_id)
            .await
            .ok_or(GatewayError::ConnectionInvalid)?;
        client
            .admin_ping()
            .await
            .map_err(|e| GatewayError::Probe(e.to_string()))
    }

    async fn force_clean(&self, account_id: &str) -> Result<(), GatewayError> {
        if self.is_connected(account_id).await {
            if self.store.exists(account_id) {
                self.store.delete(account_id)?;
            }
            self.evict(account_id).await;
        }
        Ok(())
    }

    async fn commit_auth(
        &self,
        account_id: &str,
        outcome: Result<Credential, WireError>,
    ) -> Result<(), GatewayError> {
        match outcome {
            Ok(credential) => {
                self.store.save(account_id, &credential)?;
                Ok(())
            },
            // The session is already live; keep the entry.
            Err(WireError::AlreadyLoggedIn) => Ok(()),
            Err(WireError::TransportClosed) => {
                self.evict(account_id).await;
                Err(GatewayError::ConnectionInvalid)
            },
            Err(e) => {
                self.evict(account_id).await;
                Err(GatewayError::Protocol(e.to_string()))
            },
        }
    }
}

fn wire_err(e: WireError) -> GatewayError {
    match e {
        WireError::TransportClosed => GatewayError::ConnectionInvalid,
        WireError::Timeout => GatewayError::Timeout("wire handshake"),
        other => GatewayError::Protocol(other.to_string()),
    }
}

fn flow_result(
    flow: Result<Result<(), GatewayError>, oneshot::error::RecvError>,
) -> Result<ConnectOutcome, GatewayError> {
    match flow {
        Ok(Ok(())) => Ok(ConnectOutcome::Connected),
        Ok(Err(e)) => Err(e),
        Err(_) => Err(GatewayError::Protocol("connect task aborted".to_string())),
    }
}
