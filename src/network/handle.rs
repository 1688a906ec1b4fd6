//! Runs a [`NetworkAdapter`] on its own task.
//!
//! The task owns the adapter outright. Callers talk to it through a
//! [`ConnectionHandle`]: requests go over an mpsc channel and the current
//! [`ConnectionState`] is published on a watch channel after every step.

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{Instrument, debug};

use super::{ConnectionState, NetworkAdapter};
use crate::telemetry::spans;

/// Requests queued before the sender waits.
const REQUEST_QUEUE: usize = 64;

enum Request {
    Connect,
    Disconnect(Option<String>),
    Send(String),
    Dispose(oneshot::Sender<bool>),
}

/// Cloneable front end for one running adapter.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    name: String,
    requests: mpsc::Sender<Request>,
    state: watch::Receiver<ConnectionState>,
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Request::Connect => f.write_str("Connect"),
            Request::Disconnect(reason) => f.debug_tuple("Disconnect").field(reason).finish(),
            Request::Send(line) => f.debug_tuple("Send").field(line).finish(),
            Request::Dispose(_) => f.write_str("Dispose"),
        }
    }
}

impl ConnectionHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn connect(&self) {
        self.request(Request::Connect).await;
    }

    pub async fn disconnect(&self, reason: Option<String>) {
        self.request(Request::Disconnect(reason)).await;
    }

    pub async fn send(&self, line: impl Into<String>) {
        self.request(Request::Send(line.into())).await;
    }

    /// Dispose the adapter. Returns `false` if it held nothing or the task
    /// has already exited.
    pub async fn dispose(&self) -> bool {
        let (tx, rx) = oneshot::channel();
        self.request(Request::Dispose(tx)).await;
        rx.await.unwrap_or(false)
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    pub fn is_disconnected(&self) -> bool {
        self.state() == ConnectionState::Disconnected
    }

    /// Wait until the published state satisfies `f`.
    pub async fn wait_for(&mut self, f: impl FnMut(&ConnectionState) -> bool) -> ConnectionState {
        let reached = self.state.wait_for(f).await.map(|state| *state);
        reached.unwrap_or_else(|_| *self.state.borrow())
    }

    async fn request(&self, request: Request) {
        if let Err(e) = self.requests.send(request).await {
            debug!(network = %self.name, request = ?e.0, "Connection task has exited");
        }
    }
}

/// Spawn `adapter` on its own task.
///
/// The task runs until every handle is dropped, then disposes the adapter.
pub fn spawn<A>(mut adapter: A) -> (ConnectionHandle, JoinHandle<()>)
where
    A: NetworkAdapter + 'static,
{
    let name = adapter.name().to_owned();
    let (tx, mut rx) = mpsc::channel(REQUEST_QUEUE);
    let (state_tx, state_rx) = watch::channel(adapter.state());
    let span = spans::network(&name);

    let task = tokio::spawn(
        async move {
            loop {
                tokio::select! {
                    request = rx.recv() => match request {
                        Some(Request::Connect) => adapter.connect().await,
                        Some(Request::Disconnect(reason)) => adapter.disconnect(reason).await,
                        Some(Request::Send(line)) => adapter.send(line).await,
                        Some(Request::Dispose(reply)) => {
                            let released = adapter.dispose().await;
                            state_tx.send_replace(adapter.state());
                            let _ = reply.send(released);
                        }
                        None => {
                            adapter.dispose().await;
                            break;
                        }
                    },
                    wake = adapter.next_event() => adapter.handle_event(wake).await,
                }
                state_tx.send_replace(adapter.state());
            }
            state_tx.send_replace(adapter.state());
            debug!("Connection task finished");
        }
        .instrument(span),
    );

    let handle = ConnectionHandle {
        name,
        requests: tx,
        state: state_rx,
    };
    (handle, task)
}
