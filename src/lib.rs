//! # slircbot
//!
//! Connection engine for a chat bot: keeps long-lived IRC sessions alive
//! across transport failures.
//!
//! Each configured network gets an [`IrcConnection`](network::IrcConnection)
//! running on its own task. The connection frames and parses the wire
//! protocol (via [`slircbot_proto`]), registers, sends keepalive probes, and
//! recovers from failures by rotating through its [`ServerPool`](pool::ServerPool)
//! with backoff. Collaborators receive [`Event`](network::Event)s on an
//! injected channel.
//!
//! ```no_run
//! use slircbot::config::{NetworkConfig, ServerConfig};
//! use slircbot::network::{self, IrcConnection};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = NetworkConfig::new("libera", "slircbot??");
//! config.servers.push(ServerConfig::new("irc.libera.chat", 6667));
//!
//! let (events_tx, mut events) = tokio::sync::mpsc::unbounded_channel();
//! let (handle, _task) = network::spawn(IrcConnection::from_config(config, events_tx)?);
//! handle.connect().await;
//! while let Some(event) = events.recv().await {
//!     println!("{}: {:?}", event.network, event.kind);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod keepalive;
pub mod network;
pub mod nick;
pub mod pool;
pub mod reconnect;
pub mod telemetry;
pub mod timer;
pub mod transport;

pub use slircbot_proto as proto;
