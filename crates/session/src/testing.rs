//! Scripted wire doubles shared by the registry and sender tests.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};

use {
    async_trait::async_trait,
    tokio::sync::{mpsc, oneshot},
};

use {
    wagate_common::{InboundEvent, MediaRef},
    wagate_wire::{
        ClientIdentity, Credential, EventSink, OutboundPayload, ProtocolVersion, WireClient,
        WireConnector, WireError,
    },
};

pub fn identity() -> ClientIdentity {
    ClientIdentity {
        long_name: "Wagate".to_string(),
        short_name: "Wagate".to_string(),
    }
}

pub fn credential(wid: &str) -> Credential {
    Credential {
        client_id: "client-id".to_string(),
        client_token: "client-token".to_string(),
        server_token: "server-token".to_string(),
        enc_key: vec![0x11; 32],
        mac_key: vec![0x22; 32],
        wid: wid.to_string(),
    }
}

/// One scripted connection. Fields are tweaked before wrapping in `Arc`.
pub struct MockClient {
    pub wid: String,
    /// Pairing code pushed on the login channel, when set.
    pub code: Option<String>,
    /// When true, login never resolves (pairing stays in flight).
    pub login_hangs: bool,
    pub login_error: Mutex<Option<WireError>>,
    pub restore_error: Mutex<Option<WireError>>,
    pub ping_error: Mutex<Option<WireError>>,
    pub send_results: Mutex<VecDeque<Result<String, WireError>>>,
    pub sent: Mutex<Vec<OutboundPayload>>,
    pub downloads: Mutex<Vec<MediaRef>>,
    pub events: Mutex<Option<mpsc::UnboundedReceiver<InboundEvent>>>,
    pub failure: Mutex<Option<oneshot::Receiver<WireError>>>,
}

impl MockClient {
    pub fn new(wid: &str) -> Self {
        Self {
            wid: wid.to_string(),
            code: None,
            login_hangs: false,
            login_error: Mutex::new(None),
            restore_error: Mutex::new(None),
            ping_error: Mutex::new(None),
            send_results: Mutex::new(VecDeque::new()),
            sent: Mutex::new(Vec::new()),
            downloads: Mutex::new(Vec::new()),
            events: Mutex::new(None),
            failure: Mutex::new(None),
        }
    }
}

#[async_trait]
impl WireClient for MockClient {
    async fn sync_version(&self) -> Result<ProtocolVersion, WireError> {
        Ok(ProtocolVersion(2, 2142, 12))
    }

    async fn login(&self, code_tx: oneshot::Sender<String>) -> Result<Credential, WireError> {
        if let Some(code) = &self.code {
            let _ = code_tx.send(code.clone());
        }
        if self.login_hangs {
            futures::future::pending::<()>().await;
        }
        match self.login_error.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(credential(&self.wid)),
        }
    }

    async fn restore(&self, _credential: Credential) -> Result<Credential, WireError> {
        match self.restore_error.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(credential(&self.wid)),
        }
    }

    async fn logout(&self) -> Result<(), WireError> {
        Ok(())
    }

    async fn send(&self, payload: OutboundPayload) -> Result<String, WireError> {
        self.sent.lock().unwrap().push(payload);
        self.send_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("3EB0C767D0D1A2B3".to_string()))
    }

    async fn admin_ping(&self) -> Result<(), WireError> {
        match self.ping_error.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn download(&self, media: &MediaRef) -> Result<Vec<u8>, WireError> {
        self.downloads.lock().unwrap().push(media.clone());
        Ok(vec![0xAB; 16])
    }

    fn take_events(&self) -> Option<mpsc::UnboundedReceiver<InboundEvent>> {
        self.events.lock().unwrap().take()
    }

    fn take_failure(&self) -> Option<oneshot::Receiver<WireError>> {
        self.failure.lock().unwrap().take()
    }

    fn self_id(&self) -> String {
        self.wid.clone()
    }
}

/// Hands out scripted clients in order, one per handshake. Records the
/// identity announced with each handshake.
pub struct MockConnector {
    clients: Mutex<VecDeque<Arc<MockClient>>>,
    pub identities: Mutex<Vec<ClientIdentity>>,
}

impl MockConnector {
    pub fn new(clients: Vec<Arc<MockClient>>) -> Arc<Self> {
        Arc::new(Self {
            clients: Mutex::new(clients.into()),
            identities: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl WireConnector for MockConnector {
    async fn connect(
        &self,
        identity: &ClientIdentity,
        _timeout: Duration,
    ) -> Result<Arc<dyn WireClient>, WireError> {
        self.identities.lock().unwrap().push(identity.clone());
        self.clients
            .lock()
            .unwrap()
            .pop_front()
            .map(|c| c as Arc<dyn WireClient>)
            .ok_or_else(|| WireError::Protocol("no scripted connection left".to_string()))
    }
}

/// Records handler attachments instead of dispatching events.
#[derive(Default)]
pub struct TestSink {
    pub attached: Mutex<Vec<String>>,
}

#[async_trait]
impl EventSink for TestSink {
    async fn attach(&self, account_id: &str, _client: Arc<dyn WireClient>) {
        self.attached.lock().unwrap().push(account_id.to_string());
    }
}
