//! Network adapters and the actor that drives them.
//!
//! A [`NetworkAdapter`] is one logical chat network. [`IrcConnection`] is the
//! IRC adapter; [`spawn`] runs any adapter on its own task and hands back a
//! [`ConnectionHandle`].

mod connection;
mod handle;

pub use connection::{IrcConnection, Wake};
pub use handle::{ConnectionHandle, spawn};

use async_trait::async_trait;
use slircbot_proto::ParsedMessage;
use std::fmt;
use std::sync::Arc;

/// Lifecycle of one network session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    HandshakeInProgress,
    Connected,
    Disconnecting,
}

impl ConnectionState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::HandshakeInProgress => "handshake",
            Self::Connected => "connected",
            Self::Disconnecting => "disconnecting",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something collaborators should know about, tagged with its network.
#[derive(Debug, Clone)]
pub struct Event {
    pub network: Arc<str>,
    pub kind: EventKind,
}

#[derive(Debug, Clone)]
pub enum EventKind {
    /// A transport is being opened to `host:port`.
    Connecting { host: String, port: u16 },
    /// Login lines were sent; the session is usable.
    Registered { nick: String },
    /// `connect()` was called on a connected session.
    AlreadyConnected,
    /// One inbound protocol message, in arrival order.
    Message(ParsedMessage),
    /// A failure the engine does not remediate.
    Error(String),
    /// The transport is gone.
    Disconnected,
}

/// Capability interface for one chat network.
///
/// The actor in [`spawn`] alternates between requests from the handle and
/// [`next_event`](Self::next_event); the wake value is then passed to
/// [`handle_event`](Self::handle_event), which runs to completion.
#[async_trait]
pub trait NetworkAdapter: Send {
    /// What `next_event` reports back.
    type Wake: Send;

    fn name(&self) -> &str;

    fn state(&self) -> ConnectionState;

    fn is_connected(&self) -> bool;

    fn is_disconnected(&self) -> bool {
        self.state() == ConnectionState::Disconnected
    }

    /// Start connecting. The outcome is reported through `next_event`.
    async fn connect(&mut self);

    /// Leave the network with `reason`, or the configured quit message.
    async fn disconnect(&mut self, reason: Option<String>);

    /// Write one protocol line. Dropped when not connected.
    async fn send(&mut self, line: String);

    /// Release everything. Returns whether anything was still held.
    async fn dispose(&mut self) -> bool;

    /// Wait for socket data or a timer. Must be cancel safe.
    async fn next_event(&mut self) -> Self::Wake;

    async fn handle_event(&mut self, wake: Self::Wake);
}
