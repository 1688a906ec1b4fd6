//! Registration right after the transport comes up.
//!
//! The engine does not wait for the server's welcome numeric: once the
//! login lines are written the session counts as registered.

use slircbot_proto::Command;
use tracing::{error, info};

use super::{IrcConnection, Session};
use crate::network::{ConnectionState, EventKind};
use crate::pool::Server;
use crate::transport::IrcStream;

impl IrcConnection {
    pub(super) async fn on_connected(&mut self, server: &Server, stream: IrcStream) {
        let session = match Session::new(stream, server.host.clone(), &self.config.encoding) {
            Ok(session) => session,
            Err(e) => {
                error!(error = %e, "Cannot start session");
                self.emit(EventKind::Error(e.to_string()));
                self.on_close();
                return;
            }
        };
        self.session = Some(session);
        self.set_state(ConnectionState::HandshakeInProgress);
        self.keepalive.start();

        let nick = self.nicks.generate();
        for command in self.registration_lines(server, &nick) {
            if let Err(err) = self.write_line(command.into()).await {
                self.on_transport_error(err);
                return;
            }
        }

        self.connected = true;
        self.set_state(ConnectionState::Connected);
        self.reset_backoff();
        info!(host = %server.host, port = server.port, nick = %nick, "Registered");
        self.nick = Some(nick.clone());
        self.emit(EventKind::Registered { nick });
    }

    /// Login lines, in wire order. The server password wins over the network's.
    fn registration_lines(&self, server: &Server, nick: &str) -> Vec<Command> {
        let password = server
            .password
            .as_deref()
            .or(self.config.password.as_deref());
        Command::registration(
            password,
            nick,
            &self.config.user,
            self.config.invisible,
            &self.config.realname,
        )
    }

    fn reset_backoff(&mut self) {
        self.attempts = 0;
        self.reconnect.reset();
        if let Some(index) = self.current {
            self.pool.reset(index);
        }
    }
}
