//! # slircbot-proto
//!
//! The protocol half of the slircbot connection engine: turning a chunked
//! byte stream into IRC lines, lines into [`ParsedMessage`]s, and the
//! engine's own [`Command`]s back into lines.
//!
//! Nothing in this crate owns a socket or a timer.
//!
//! ## Quick Start
//!
//! ```rust
//! use slircbot_proto::{LineFramer, ParsedMessage};
//!
//! let mut framer = LineFramer::new("utf-8").expect("known encoding");
//! assert!(framer.feed(b"PI").unwrap().is_empty());
//!
//! let lines = framer.feed(b"NG :abc\r\n").unwrap();
//! let msg: ParsedMessage = lines[0].parse().unwrap();
//! assert_eq!(msg.command(), "PING");
//! assert_eq!(msg.params(), ["abc"]);
//! ```
//!
//! ## Acknowledgments
//!
//! This project was inspired by the architectural patterns established by
//! [Aaron Weiss (aatxe)](https://github.com/aatxe) in the
//! [irc](https://github.com/aatxe/irc) crate.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod command;
pub mod error;
pub mod line;
pub mod message;
pub mod prefix;

pub use self::command::Command;
pub use self::error::{MessageParseError, ProtocolError};
#[cfg(feature = "tokio")]
pub use self::line::LineCodec;
pub use self::line::{LineFramer, MAX_HELD_LINE_LEN};
pub use self::message::{ParsedMessage, Tag};
pub use self::prefix::Prefix;
