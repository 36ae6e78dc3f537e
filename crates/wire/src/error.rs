use thiserror::Error;

/// Typed classification of connection-library failures.
///
/// The registry and sender branch on variants, never on message text. The
/// first three variants carry the special-cased outcomes: `AlreadyLoggedIn`
/// is downgraded to success, `TransportClosed` always evicts the account's
/// registry entry, `SendTimeout` is downgraded to success with whatever id
/// the transport produced before the deadline.
#[derive(Debug, Error)]
pub enum WireError {
    /// The session is already established; login/restore is a no-op.
    #[error("already logged in")]
    AlreadyLoggedIn,

    /// The underlying transport is permanently closed.
    #[error("transport closed")]
    TransportClosed,

    /// The send deadline elapsed; the message may still have gone out.
    /// Carries the message id produced so far (possibly empty).
    #[error("sending message timed out")]
    SendTimeout(String),

    /// Stored credential was minted under an incompatible protocol version.
    #[error("protocol version rejected")]
    VersionMismatch,

    /// Handshake or operation deadline elapsed before completion.
    #[error("wire operation timed out")]
    Timeout,

    /// Anything else the connection library reports.
    #[error("{0}")]
    Protocol(String),
}
