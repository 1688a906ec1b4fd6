//! Outbound commands the connection engine writes itself.
//!
//! Each variant renders to one protocol line without its CR-LF terminator;
//! the [`LineCodec`](crate::line::LineCodec) appends that on write.

use std::fmt;

/// A line sent by the engine during registration, keepalive or shutdown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `PASS <password>`
    Pass(String),
    /// `CAP LS ` (the trailing space is part of the literal)
    CapLs,
    /// `CAP END`
    CapEnd,
    /// `NICK <nickname>`
    Nick(String),
    /// `USER <username> <8|0> * :<realname>`
    User {
        /// Username (ident).
        username: String,
        /// Request user mode `+i`.
        invisible: bool,
        /// Real name / GECOS.
        realname: String,
    },
    /// `PONG <param>`
    Pong(String),
    /// `QUIT : <reason>`
    Quit(String),
}

impl Command {
    /// The registration sequence sent right after the transport connects.
    pub fn registration(
        password: Option<&str>,
        nickname: &str,
        username: &str,
        invisible: bool,
        realname: &str,
    ) -> Vec<Command> {
        let mut lines = Vec::with_capacity(5);
        if let Some(pass) = password {
            lines.push(Command::Pass(pass.to_owned()));
        }
        lines.push(Command::CapLs);
        lines.push(Command::CapEnd);
        lines.push(Command::Nick(nickname.to_owned()));
        lines.push(Command::User {
            username: username.to_owned(),
            invisible,
            realname: realname.to_owned(),
        });
        lines
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Pass(pass) => write!(f, "PASS {pass}"),
            Command::CapLs => f.write_str("CAP LS "),
            Command::CapEnd => f.write_str("CAP END"),
            Command::Nick(nick) => write!(f, "NICK {nick}"),
            Command::User {
                username,
                invisible,
                realname,
            } => {
                let mode = if *invisible { 8 } else { 0 };
                write!(f, "USER {username} {mode} * :{realname}")
            }
            Command::Pong(param) => write!(f, "PONG {param}"),
            Command::Quit(reason) => write!(f, "QUIT : {reason}"),
        }
    }
}

impl From<Command> for String {
    fn from(cmd: Command) -> Self {
        cmd.to_string()
    }
}
