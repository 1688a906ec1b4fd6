//! Public operations: connect, disconnect, send, dispose.

use futures_util::SinkExt;
use slircbot_proto::Command;
use std::io;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::{Dial, IrcConnection};
use crate::error::{TransportError, TransportErrorKind};
use crate::network::{ConnectionState, EventKind};
use crate::pool::Server;

impl IrcConnection {
    /// Start opening a transport to the next candidate server.
    ///
    /// Returns as soon as the dial is under way. The outcome arrives through
    /// [`next_event`](Self::next_event) as [`Wake::Dialed`](super::Wake::Dialed);
    /// failures are handled internally.
    pub async fn connect(&mut self) {
        if self.connected {
            info!("Already connected");
            self.emit(EventKind::AlreadyConnected);
            return;
        }
        if !self.config.enabled {
            info!("Network disabled; not connecting");
            return;
        }
        if self.dialing.is_some() {
            debug!("Connection attempt already in progress");
            return;
        }

        // A fresh connect supersedes any earlier disconnect request.
        self.release_session();
        self.disconnect_requested = false;
        self.teardown_pending = false;

        let Some(index) = self.pool.next() else {
            warn!("No enabled servers; waiting for auto-disable to expire");
            return;
        };
        let Some(server) = self.pool.get(index).cloned() else {
            return;
        };
        self.current = Some(index);
        self.attempts += 1;

        info!(
            host = %server.host,
            port = server.port,
            tls = server.tls,
            attempt = self.attempts,
            "Connecting"
        );
        self.set_state(ConnectionState::Connecting);
        self.emit(EventKind::Connecting {
            host: server.host.clone(),
            port: server.port,
        });
        self.dialing = Some(self.dial(server));
    }

    fn dial(&self, server: Server) -> Dial {
        let connector = Arc::clone(&self.connector);
        let timeout = self.config.connect_timeout();
        Box::pin(async move {
            let result = match tokio::time::timeout(timeout, connector.connect(&server)).await {
                Ok(result) => result,
                Err(_) => Err(TransportError::timeout("connect")),
            };
            (server, result)
        })
    }

    /// Send `QUIT` and close the transport on the next scheduling turn.
    ///
    /// An unacknowledged connection attempt is dropped instead.
    pub async fn disconnect(&mut self, reason: Option<String>) {
        if self.state == ConnectionState::Disconnected && self.session.is_none() {
            debug!("Disconnect requested while already disconnected");
            return;
        }

        self.keepalive.stop();
        self.disconnect_requested = true;
        self.connected = false;

        if self.dialing.take().is_some() && self.session.is_none() {
            info!("Abandoning connection attempt");
            self.on_close();
            return;
        }

        let reason = reason.unwrap_or_else(|| self.config.quit_message.clone());
        info!(reason = %reason, "Disconnecting");
        if let Err(err) = self.write_line(Command::Quit(reason).into()).await {
            if err.kind == TransportErrorKind::BrokenPipe {
                // Nothing left to tear down.
                self.on_transport_error(err);
                return;
            }
            debug!(error = %err, "Failed to send QUIT");
        }

        self.set_state(ConnectionState::Disconnecting);
        self.teardown_pending = true;
    }

    /// Write one line to the server.
    pub async fn send(&mut self, line: String) {
        if !self.connected {
            debug!(line = %line, "Not connected; dropping outgoing line");
            return;
        }
        if let Err(err) = self.write_line(line).await {
            self.on_transport_error(err);
        }
    }

    /// Release every resource and timer. Safe to call any number of times.
    ///
    /// Returns `true` if a transport was still held.
    pub async fn dispose(&mut self) -> bool {
        let held = self.session.is_some();
        if self.dialing.take().is_some() {
            info!("Abandoning connection attempt");
        }
        if self.connected {
            self.disconnect(None).await;
        }
        self.disconnect_requested = true;
        self.teardown_pending = false;
        self.reconnect.stop();
        self.keepalive.stop();
        self.pool.stop_auto_disable();

        let released = self.close_session().await;
        self.connected = false;
        self.set_state(ConnectionState::Disconnected);
        if released {
            info!("Disposed");
            self.emit(EventKind::Disconnected);
        }
        held
    }

    /// Finish a disconnect once the QUIT had its turn on the wire.
    pub(super) async fn teardown(&mut self) {
        self.teardown_pending = false;
        self.close_session().await;
        self.on_close();
    }

    pub(super) async fn write_line(&mut self, line: String) -> Result<(), TransportError> {
        let Some(session) = self.session.as_mut() else {
            return Err(TransportError::new(
                TransportErrorKind::BrokenPipe,
                io::Error::from(io::ErrorKind::NotConnected),
            ));
        };
        session.writer.send(line).await.map_err(TransportError::from)
    }

    /// Flush and shut down the session's transport. Returns whether one existed.
    async fn close_session(&mut self) -> bool {
        let Some(mut session) = self.session.take() else {
            return false;
        };
        if let Err(e) = session.writer.close().await {
            debug!(error = %e, "Error closing transport");
        }
        true
    }

    /// Drop a leftover session without ceremony.
    fn release_session(&mut self) {
        if self.session.take().is_some() {
            debug!("Released stale session");
        }
        self.connected = false;
    }
}
