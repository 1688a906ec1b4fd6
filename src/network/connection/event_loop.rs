//! Connection attempts, socket reads and timer expiries.
//!
//! [`IrcConnection::next_event`] waits for whichever comes first and returns
//! a [`Wake`]; [`IrcConnection::handle_event`] acts on it. Splitting the two
//! keeps the wait cancel safe so the actor can select it against requests.

use bytes::BytesMut;
use slircbot_proto::{ParsedMessage, ProtocolError};
use std::future::pending;
use std::io;
use tokio::io::{AsyncReadExt, ReadHalf};
use tracing::{debug, info, warn};

use super::{Dial, IrcConnection, READ_BUFFER_SIZE, Session};
use crate::error::TransportError;
use crate::network::EventKind;
use crate::pool::Server;
use crate::transport::IrcStream;

/// Why the connection woke up.
#[derive(Debug)]
pub enum Wake {
    /// A connection attempt to `Server` finished or timed out.
    Dialed(Server, Result<IrcStream, TransportError>),
    /// A socket read finished; the bytes are in the session buffer.
    Read(io::Result<usize>),
    KeepAlive,
    Reconnect,
    AutoDisable,
    /// A disconnect is waiting to close the transport.
    Teardown,
}

async fn dialed(dial: Option<&mut Dial>) -> (Server, Result<IrcStream, TransportError>) {
    match dial {
        Some(dial) => dial.await,
        None => pending().await,
    }
}

/// Read more bytes, or wait forever when there is nothing to read from.
async fn read_session(session: Option<&mut Session>) -> io::Result<usize> {
    match session {
        Some(session) if !session.stalled => {
            fill(&mut session.reader, &mut session.read_buf).await
        }
        _ => pending().await,
    }
}

async fn fill(reader: &mut ReadHalf<IrcStream>, buf: &mut BytesMut) -> io::Result<usize> {
    buf.reserve(READ_BUFFER_SIZE);
    reader.read_buf(buf).await
}

impl IrcConnection {
    /// Wait for the next socket read or timer. Cancel safe.
    pub async fn next_event(&mut self) -> Wake {
        let teardown = self.teardown_pending;
        let wake = tokio::select! {
            _ = tokio::task::yield_now(), if teardown => Wake::Teardown,
            (server, result) = dialed(self.dialing.as_mut()) => Wake::Dialed(server, result),
            result = read_session(self.session.as_mut()) => Wake::Read(result),
            _ = self.keepalive.tick() => Wake::KeepAlive,
            _ = self.reconnect.expired() => Wake::Reconnect,
            _ = self.pool.auto_disable_expired() => Wake::AutoDisable,
        };
        if let Wake::Dialed(..) = wake {
            self.dialing = None;
        }
        wake
    }

    pub async fn handle_event(&mut self, wake: Wake) {
        match wake {
            Wake::Dialed(server, Ok(stream)) => self.on_connected(&server, stream).await,
            Wake::Dialed(_, Err(err)) => self.on_transport_error(err),
            Wake::Read(result) => self.on_read(result),
            Wake::KeepAlive => self.on_keepalive().await,
            Wake::Reconnect => {
                info!("Reconnect timer fired");
                self.connect().await;
            }
            Wake::AutoDisable => {
                info!("Auto-disable expired; retrying all servers");
                self.connect().await;
            }
            Wake::Teardown => self.teardown().await,
        }
    }

    fn on_read(&mut self, result: io::Result<usize>) {
        let chunk = match result {
            Ok(0) => {
                info!("Connection closed by server");
                self.session = None;
                self.on_close();
                return;
            }
            Ok(_) => match self.session.as_mut() {
                Some(session) => session.read_buf.split(),
                None => return,
            },
            Err(e) => {
                self.on_transport_error(e.into());
                return;
            }
        };

        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.framer.feed(&chunk) {
            Ok(lines) => {
                for line in lines {
                    self.dispatch_line(&line);
                }
            }
            Err(e @ ProtocolError::FramingOverflow { .. }) => {
                warn!(error = %e, "Dropping connection");
                self.session = None;
                self.on_close();
            }
            Err(e) => warn!(error = %e, "Framing error"),
        }
    }

    fn dispatch_line(&self, line: &str) {
        if line.is_empty() {
            return;
        }
        match ParsedMessage::parse(line) {
            Ok(message) => self.emit(EventKind::Message(message)),
            Err(e) => warn!(error = %e, "Dropping malformed line"),
        }
    }

    async fn on_keepalive(&mut self) {
        let Some(host) = self.session.as_ref().map(|s| s.host.clone()) else {
            self.keepalive.stop();
            return;
        };
        let probe = self.keepalive.probe(&host);
        debug!(probe = %probe, "Keepalive");
        if let Err(err) = self.write_line(probe.into()).await {
            self.on_transport_error(err);
        }
    }
}
