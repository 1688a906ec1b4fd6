//! Integration test common infrastructure.
//!
//! Provides a scripted connector handing out in-memory pipes, the server
//! end of those pipes, and helpers for building connections and reading
//! their event stream.

pub mod connector;
pub mod peer;

#[allow(unused_imports)]
pub use connector::{FakeConnector, Outcome};
#[allow(unused_imports)]
pub use peer::TestPeer;

use slircbot::config::{NetworkConfig, ServerConfig};
use slircbot::network::{ConnectionState, Event, EventKind, IrcConnection};
use slircbot::nick::FixedNick;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Everything a test needs to drive one connection by hand.
pub struct Harness {
    pub conn: IrcConnection,
    pub events: mpsc::UnboundedReceiver<Event>,
    pub peers: mpsc::UnboundedReceiver<TestPeer>,
    pub connector: Arc<FakeConnector>,
}

/// A network named "testnet" with nick "tester" and one server per host.
#[allow(dead_code)]
pub fn network(hosts: &[&str]) -> NetworkConfig {
    let mut config = NetworkConfig::new("testnet", "tester");
    config.servers = hosts
        .iter()
        .map(|host| ServerConfig::new(*host, 6667))
        .collect();
    config
}

#[allow(dead_code)]
pub fn harness(config: NetworkConfig, script: Vec<Outcome>) -> Harness {
    let (peers_tx, peers) = mpsc::unbounded_channel();
    let connector = Arc::new(FakeConnector::new(script, peers_tx));
    let (events_tx, events) = mpsc::unbounded_channel();
    let conn = IrcConnection::new(
        config,
        connector.clone(),
        Box::new(FixedNick("tester".into())),
        events_tx,
    )
    .expect("valid encoding");
    Harness {
        conn,
        events,
        peers,
        connector,
    }
}

impl Harness {
    /// The server end of the most recent accepted connection.
    #[allow(dead_code)]
    pub async fn peer(&mut self) -> TestPeer {
        tokio::time::timeout(Duration::from_secs(5), self.peers.recv())
            .await
            .expect("timed out waiting for a connection")
            .expect("connector dropped")
    }

    /// Start a connection attempt and run the loop until it settles.
    #[allow(dead_code)]
    pub async fn connect(&mut self) {
        self.conn.connect().await;
        if self.conn.state() == ConnectionState::Connecting {
            self.step().await;
        }
    }

    /// Connect and consume the four handshake lines on the server side.
    #[allow(dead_code)]
    pub async fn connect_registered(&mut self) -> TestPeer {
        self.connect().await;
        assert!(self.conn.is_connected(), "connection did not register");
        let mut peer = self.peer().await;
        for _ in 0..4 {
            peer.recv_line().await.expect("handshake line");
        }
        peer
    }

    /// Every event emitted so far.
    #[allow(dead_code)]
    pub fn drain(&mut self) -> Vec<EventKind> {
        let mut kinds = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            kinds.push(event.kind);
        }
        kinds
    }

    /// Run `next_event`/`handle_event` once.
    #[allow(dead_code)]
    pub async fn step(&mut self) {
        let wake = self.conn.next_event().await;
        self.conn.handle_event(wake).await;
    }
}
