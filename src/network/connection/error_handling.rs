//! Recovery policy for transport failures and closes.

use tracing::{error, info, warn};

use super::IrcConnection;
use crate::error::{TransportError, TransportErrorKind};
use crate::network::{ConnectionState, EventKind};

/// What to do about a transport error before the close path runs.
#[derive(Debug, PartialEq, Eq)]
pub(super) enum ErrorAction {
    /// Established stream broke: stop keepalive, reconnect unless leaving.
    Reconnect,
    /// Take the current server out of rotation.
    DisableServer,
    /// Out of timeout retries: count the attempt and reconnect directly.
    CountAndReconnect,
    /// Log and emit; leave the session alone.
    Report,
}

/// Map an error kind to its remediation.
///
/// `attempts` counts connection attempts since the last registration.
pub(super) fn classify_error(kind: TransportErrorKind, attempts: u32, max: u32) -> ErrorAction {
    match kind {
        TransportErrorKind::BrokenPipe => ErrorAction::Reconnect,
        TransportErrorKind::Unreachable => ErrorAction::DisableServer,
        TransportErrorKind::Timeout if attempts < max => ErrorAction::DisableServer,
        TransportErrorKind::Timeout => ErrorAction::CountAndReconnect,
        TransportErrorKind::Other => ErrorAction::Report,
    }
}

impl IrcConnection {
    pub(super) fn on_transport_error(&mut self, err: TransportError) {
        let action = classify_error(err.kind, self.attempts, self.config.max_connection_attempts);
        match action {
            ErrorAction::Reconnect => {
                warn!(kind = %err.kind, error = %err.source, "Connection lost");
                self.keepalive.stop();
                if !self.disconnect_requested {
                    self.reconnect.schedule();
                }
            }
            ErrorAction::DisableServer => {
                warn!(
                    kind = %err.kind,
                    host = self.current_host().unwrap_or("-"),
                    error = %err.source,
                    "Server failed"
                );
                if let Some(index) = self.current {
                    self.pool.disable(index);
                }
            }
            ErrorAction::CountAndReconnect => {
                warn!(
                    kind = %err.kind,
                    attempts = self.attempts,
                    error = %err.source,
                    "Connection attempts exhausted"
                );
                self.attempts += 1;
                self.reconnect.schedule();
            }
            ErrorAction::Report => {
                error!(kind = %err.kind, error = %err.source, "Transport error");
                self.emit(EventKind::Error(err.to_string()));
                if let Some(session) = self.session.as_mut() {
                    session.stalled = true;
                    return;
                }
                // Nothing to keep when the transport never came up.
            }
        }

        self.session = None;
        self.on_close();
    }

    /// The transport is gone: settle, or reconnect if nobody asked for this.
    pub(super) fn on_close(&mut self) {
        self.connected = false;
        self.teardown_pending = false;
        self.keepalive.stop();
        self.session = None;
        self.set_state(ConnectionState::Disconnected);
        self.emit(EventKind::Disconnected);

        if self.disconnect_requested {
            info!("Disconnected");
        } else if !self.reconnect.is_armed() {
            self.reconnect.schedule();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broken_pipe_reconnects() {
        assert_eq!(
            classify_error(TransportErrorKind::BrokenPipe, 1, 3),
            ErrorAction::Reconnect
        );
    }

    #[test]
    fn test_unreachable_disables_server() {
        assert_eq!(
            classify_error(TransportErrorKind::Unreachable, 5, 3),
            ErrorAction::DisableServer
        );
    }

    #[test]
    fn test_timeout_below_limit_disables_server() {
        assert_eq!(
            classify_error(TransportErrorKind::Timeout, 2, 3),
            ErrorAction::DisableServer
        );
    }

    #[test]
    fn test_timeout_at_limit_reconnects_directly() {
        assert_eq!(
            classify_error(TransportErrorKind::Timeout, 3, 3),
            ErrorAction::CountAndReconnect
        );
    }

    #[test]
    fn test_other_is_only_reported() {
        assert_eq!(
            classify_error(TransportErrorKind::Other, 0, 3),
            ErrorAction::Report
        );
    }
}
