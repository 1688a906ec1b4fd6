//! Error types for the connection engine.
//!
//! Protocol errors live in `slircbot_proto`; this module covers the
//! transport layer and re-exports the configuration errors so callers have
//! one place to look.

use std::io;
use thiserror::Error;

pub use crate::config::{ConfigError, ValidationError};
pub use slircbot_proto::ProtocolError;

// ============================================================================
// Transport Errors
// ============================================================================

/// What went wrong with a transport, as far as recovery is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The established stream broke (reset, aborted, EOF mid-write).
    BrokenPipe,
    /// The server could not be reached at all.
    Unreachable,
    /// Connecting took longer than the configured timeout.
    Timeout,
    /// Anything else, including TLS failures.
    Other,
}

impl TransportErrorKind {
    /// Classify an I/O error.
    pub fn classify(err: &io::Error) -> Self {
        use io::ErrorKind::*;
        match err.kind() {
            BrokenPipe | ConnectionReset | ConnectionAborted | UnexpectedEof | NotConnected => {
                Self::BrokenPipe
            }
            ConnectionRefused | HostUnreachable | NetworkUnreachable | AddrNotAvailable => {
                Self::Unreachable
            }
            TimedOut => Self::Timeout,
            _ => Self::Other,
        }
    }

    /// Static label for structured logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BrokenPipe => "broken_pipe",
            Self::Unreachable => "unreachable",
            Self::Timeout => "timeout",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified transport failure.
#[derive(Debug, Error)]
#[error("transport error ({kind}): {source}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    #[source]
    pub source: io::Error,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, source: io::Error) -> Self {
        Self { kind, source }
    }

    pub fn timeout(what: &str) -> Self {
        Self::new(
            TransportErrorKind::Timeout,
            io::Error::new(io::ErrorKind::TimedOut, format!("{what} timed out")),
        )
    }

    /// A failure that is never retried against a different server.
    pub fn other<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::new(TransportErrorKind::Other, io::Error::other(err))
    }
}

impl From<io::Error> for TransportError {
    fn from(source: io::Error) -> Self {
        Self {
            kind: TransportErrorKind::classify(&source),
            source,
        }
    }
}

impl From<ProtocolError> for TransportError {
    fn from(err: ProtocolError) -> Self {
        match err {
            ProtocolError::Io(source) => Self::from(source),
            other => Self::other(other),
        }
    }
}
