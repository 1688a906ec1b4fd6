//! Opening byte streams to servers.
//!
//! The connection state machine talks to a [`Connector`]; the default
//! [`TcpConnector`] dials TCP and upgrades to TLS when the server asks for
//! it. Tests substitute a connector that hands out in-memory pipes.

mod stream;
mod tls;

pub use stream::IrcStream;
pub use tls::{DangerousNoVerifier, fingerprint, normalize_fingerprint, upgrade_to_tls};

use async_trait::async_trait;
use tokio::net::TcpStream;
use tracing::debug;

use crate::error::TransportError;
use crate::pool::Server;

/// Dials a server. Implementations do not apply a timeout themselves.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, server: &Server) -> Result<IrcStream, TransportError>;
}

/// Connects over TCP, with TLS when `server.tls` is set.
#[derive(Debug, Default, Clone, Copy)]
pub struct TcpConnector;

#[async_trait]
impl Connector for TcpConnector {
    async fn connect(&self, server: &Server) -> Result<IrcStream, TransportError> {
        let tcp = TcpStream::connect((server.host.as_str(), server.port)).await?;
        if let Err(e) = tcp.set_nodelay(true) {
            debug!(error = %e, "Failed to set TCP_NODELAY");
        }

        if !server.tls {
            return Ok(IrcStream::Plain(tcp));
        }
        let tls = upgrade_to_tls(
            tcp,
            &server.host,
            server.verify_cert,
            server.cert_fingerprint.as_deref(),
        )
        .await?;
        Ok(IrcStream::Tls(Box::new(tls)))
    }
}
