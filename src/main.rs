//! slircbot - Straylight IRC Bot
//!
//! Loads the network list, runs one connection task per enabled network and
//! logs what collaborators would see until Ctrl-C.

use anyhow::Context as _;
use slircbot::config::Config;
use slircbot::network::{self, ConnectionHandle, Event, EventKind, IrcConnection};
use slircbot::telemetry;
use tokio::sync::mpsc;
use tracing::{Instrument, debug, error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    let span = telemetry::spans::supervisor(&config_path);
    run(config).instrument(span).await
}

async fn run(config: Config) -> anyhow::Result<()> {
    let (events_tx, mut events) = mpsc::unbounded_channel();
    let mut handles: Vec<ConnectionHandle> = Vec::new();
    let mut tasks = Vec::new();

    for net in config.networks {
        if !net.enabled {
            info!(network = %net.name, "Network disabled; skipping");
            continue;
        }
        let name = net.name.clone();
        let connection = IrcConnection::from_config(net, events_tx.clone())
            .with_context(|| format!("network {name}"))?;
        let (handle, task) = network::spawn(connection);
        handle.connect().await;
        handles.push(handle);
        tasks.push(task);
    }
    drop(events_tx);

    if handles.is_empty() {
        warn!("No enabled networks; nothing to do");
        return Ok(());
    }
    info!(networks = handles.len(), "Starting slircbot");

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(event) => log_event(&event),
                None => break,
            },
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    error!(error = %e, "Failed to listen for Ctrl-C");
                }
                info!("Shutting down");
                break;
            }
        }
    }

    for handle in &handles {
        let released = handle.dispose().await;
        debug!(network = %handle.name(), released, "Disposed");
    }
    drop(handles);
    for task in tasks {
        if let Err(e) = task.await {
            warn!(error = %e, "Connection task failed");
        }
    }
    Ok(())
}

fn log_event(event: &Event) {
    let name = &*event.network;
    match &event.kind {
        EventKind::Connecting { host, port } => {
            info!(network = name, host = %host, port = *port, "Connecting")
        }
        EventKind::Registered { nick } => info!(network = name, nick = %nick, "Registered"),
        EventKind::AlreadyConnected => debug!(network = name, "Already connected"),
        EventKind::Message(message) => debug!(network = name, message = %message, "<<"),
        EventKind::Error(error) => warn!(network = name, error = %error, "Network error"),
        EventKind::Disconnected => info!(network = name, "Disconnected"),
    }
}
