use thiserror::Error;

/// Errors surfaced by the public gateway operations.
///
/// Every session, send and hook operation resolves to either its success
/// payload or one of these. `ConnectionInvalid` always means the account's
/// registry entry was (or already is) evicted and the caller must re-pair.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No live session for the account, or the transport is permanently
    /// closed. The registry entry has been removed.
    #[error("connection is invalid")]
    ConnectionInvalid,

    /// A pairing or liveness deadline elapsed. Does not evict an entry that
    /// was nonetheless established.
    #[error("timed out waiting for {0}")]
    Timeout(&'static str),

    /// The post-connect liveness probe failed. The session stays registered;
    /// this usually means the paired device is unreachable.
    #[error("liveness probe failed: {0}")]
    Probe(String),

    /// A credential file exists but cannot be decoded.
    #[error("credential for {0} is corrupt")]
    CorruptCredential(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A required field is missing or malformed in a request.
    #[error("{0}")]
    Validation(String),

    /// Opaque passthrough from the underlying transport.
    #[error("{0}")]
    Protocol(String),
}
