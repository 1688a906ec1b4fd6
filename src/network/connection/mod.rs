//! IrcConnection - the IRC network adapter.
//!
//! One `IrcConnection` owns at most one live session (transport, framer,
//! writer) plus everything that must outlive it: the server pool, the
//! reconnect scheduler, keepalive, and the attempt counter.
//!
//! ```text
//!  connect() ──▶ Connecting ──▶ HandshakeInProgress ──▶ Connected
//!                   │                                      │
//!                   │ transport error                      │ disconnect()
//!                   ▼                                      ▼
//!              Disconnected ◀──────── teardown ◀──── Disconnecting
//! ```
//!
//! `connect()` only starts the dial. The event loop polls it next to the
//! socket and timers, so `disconnect()` and `dispose()` can drop an attempt
//! that has not been acknowledged yet.
//!
//! Work is split by phase: `lifecycle` (public operations), `handshake`,
//! `event_loop` (socket reads and timers) and `error_handling` (recovery
//! policy per transport error kind).

mod error_handling;
mod event_loop;
mod handshake;
mod lifecycle;

pub use event_loop::Wake;

use async_trait::async_trait;
use bytes::BytesMut;
use slircbot_proto::{LineCodec, LineFramer, ProtocolError};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::io::{ReadHalf, WriteHalf};
use tokio::sync::mpsc;
use tokio_util::codec::FramedWrite;
use tracing::debug;

use super::{ConnectionState, Event, EventKind, NetworkAdapter};
use crate::config::NetworkConfig;
use crate::error::TransportError;
use crate::keepalive::KeepAlive;
use crate::nick::{NickGenerator, TemplateNick};
use crate::pool::{Server, ServerPool};
use crate::reconnect::ReconnectScheduler;
use crate::transport::{Connector, IrcStream, TcpConnector};

/// Initial read buffer capacity per session.
const READ_BUFFER_SIZE: usize = 4096;

/// A transport being opened, bounded by the connect timeout.
///
/// Polled from the event loop; dropping it abandons the attempt.
type Dial = Pin<Box<dyn Future<Output = (Server, Result<IrcStream, TransportError>)> + Send>>;

/// A live transport and its framing state.
struct Session {
    reader: ReadHalf<IrcStream>,
    writer: FramedWrite<WriteHalf<IrcStream>, LineCodec>,
    framer: LineFramer,
    read_buf: BytesMut,
    /// Set after an unremediated error; the reader is not polled again.
    stalled: bool,
    host: String,
}

impl Session {
    fn new(stream: IrcStream, host: String, encoding: &str) -> Result<Self, ProtocolError> {
        let framer = LineFramer::new(encoding)?;
        let codec = LineCodec::new(encoding)?;
        let (reader, writer) = tokio::io::split(stream);
        Ok(Self {
            reader,
            writer: FramedWrite::new(writer, codec),
            framer,
            read_buf: BytesMut::with_capacity(READ_BUFFER_SIZE),
            stalled: false,
            host,
        })
    }
}

/// The IRC variant of [`NetworkAdapter`].
pub struct IrcConnection {
    name: Arc<str>,
    config: NetworkConfig,
    connector: Arc<dyn Connector>,
    nicks: Box<dyn NickGenerator>,
    events: mpsc::UnboundedSender<Event>,

    pool: ServerPool,
    reconnect: ReconnectScheduler,
    keepalive: KeepAlive,

    dialing: Option<Dial>,
    session: Option<Session>,
    state: ConnectionState,
    /// Index into the pool of the server in use or last tried.
    current: Option<usize>,
    nick: Option<String>,
    connected: bool,
    disconnect_requested: bool,
    teardown_pending: bool,
    /// Connection attempts since the last registration.
    attempts: u32,
}

impl IrcConnection {
    /// Build an adapter for `config`.
    ///
    /// Fails only when the configured encoding label is unknown.
    pub fn new(
        config: NetworkConfig,
        connector: Arc<dyn Connector>,
        nicks: Box<dyn NickGenerator>,
        events: mpsc::UnboundedSender<Event>,
    ) -> Result<Self, ProtocolError> {
        LineCodec::new(&config.encoding)?;

        Ok(Self {
            name: Arc::from(config.name.as_str()),
            pool: ServerPool::new(&config.servers, config.auto_disable_interval()),
            reconnect: ReconnectScheduler::new(config.reconnect_delay()),
            keepalive: KeepAlive::new(config.keepalive_interval(), config.keepalive_param.clone()),
            config,
            connector,
            nicks,
            events,
            dialing: None,
            session: None,
            state: ConnectionState::Disconnected,
            current: None,
            nick: None,
            connected: false,
            disconnect_requested: false,
            teardown_pending: false,
            attempts: 0,
        })
    }

    /// Build an adapter that dials real sockets and expands the nick template.
    pub fn from_config(
        config: NetworkConfig,
        events: mpsc::UnboundedSender<Event>,
    ) -> Result<Self, ProtocolError> {
        let nicks = Box::new(TemplateNick::new(config.nick.clone()));
        Self::new(config, Arc::new(TcpConnector), nicks, events)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn is_disconnected(&self) -> bool {
        self.state == ConnectionState::Disconnected
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn pool(&self) -> &ServerPool {
        &self.pool
    }

    pub fn reconnect(&self) -> &ReconnectScheduler {
        &self.reconnect
    }

    pub fn keepalive_running(&self) -> bool {
        self.keepalive.is_running()
    }

    /// Host of the server in use or last tried.
    pub fn current_host(&self) -> Option<&str> {
        self.current
            .and_then(|index| self.pool.get(index))
            .map(|server| server.host.as_str())
    }

    /// Nickname sent at the last registration.
    pub fn nick(&self) -> Option<&str> {
        self.nick.as_deref()
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    fn set_state(&mut self, state: ConnectionState) {
        if self.state != state {
            debug!(from = %self.state, to = %state, "State change");
            self.state = state;
        }
    }

    fn emit(&self, kind: EventKind) {
        let event = Event {
            network: Arc::clone(&self.name),
            kind,
        };
        if self.events.send(event).is_err() {
            debug!("Event sink closed; dropping event");
        }
    }
}

#[async_trait]
impl NetworkAdapter for IrcConnection {
    type Wake = Wake;

    fn name(&self) -> &str {
        IrcConnection::name(self)
    }

    fn state(&self) -> ConnectionState {
        IrcConnection::state(self)
    }

    fn is_connected(&self) -> bool {
        IrcConnection::is_connected(self)
    }

    async fn connect(&mut self) {
        IrcConnection::connect(self).await
    }

    async fn disconnect(&mut self, reason: Option<String>) {
        IrcConnection::disconnect(self, reason).await
    }

    async fn send(&mut self, line: String) {
        IrcConnection::send(self, line).await
    }

    async fn dispose(&mut self) -> bool {
        IrcConnection::dispose(self).await
    }

    async fn next_event(&mut self) -> Wake {
        IrcConnection::next_event(self).await
    }

    async fn handle_event(&mut self, wake: Wake) {
        IrcConnection::handle_event(self, wake).await
    }
}
