//! Scripted connector backed by in-memory pipes.

use async_trait::async_trait;
use slircbot::error::TransportError;
use slircbot::pool::Server;
use slircbot::transport::{Connector, IrcStream};
use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;
use tokio::sync::mpsc;

use super::TestPeer;

const PIPE_CAPACITY: usize = 16 * 1024;

/// What the next dial does.
#[derive(Debug, Clone, Copy)]
pub enum Outcome {
    /// Hand out a pipe; the server end goes to the test.
    Accept,
    /// Fail immediately with this I/O error kind.
    Fail(io::ErrorKind),
    /// Never complete.
    Hang,
}

pub struct FakeConnector {
    script: Mutex<VecDeque<Outcome>>,
    dialed: Mutex<Vec<String>>,
    peers: mpsc::UnboundedSender<TestPeer>,
}

impl FakeConnector {
    /// Outcomes are consumed in order; once exhausted every dial is accepted.
    pub fn new(script: Vec<Outcome>, peers: mpsc::UnboundedSender<TestPeer>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            dialed: Mutex::new(Vec::new()),
            peers,
        }
    }

    /// Hosts dialed so far, in order.
    #[allow(dead_code)]
    pub fn dialed(&self) -> Vec<String> {
        self.dialed.lock().unwrap().clone()
    }
}

#[async_trait]
impl Connector for FakeConnector {
    async fn connect(&self, server: &Server) -> Result<IrcStream, TransportError> {
        self.dialed.lock().unwrap().push(server.host.clone());
        let outcome = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Outcome::Accept);

        match outcome {
            Outcome::Accept => {
                let (client, server_end) = tokio::io::duplex(PIPE_CAPACITY);
                let _ = self.peers.send(TestPeer::new(server.host.clone(), server_end));
                Ok(IrcStream::from(client))
            }
            Outcome::Fail(kind) => Err(io::Error::from(kind).into()),
            Outcome::Hang => std::future::pending().await,
        }
    }
}
