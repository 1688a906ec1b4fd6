//! Error types for the IRC protocol library.
//!
//! This module defines error types for framing failures and
//! message parsing failures.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Top-level protocol errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The encoding label is not known to the decoder.
    #[error("unknown encoding: {0}")]
    UnknownEncoding(String),

    /// The held partial line plus new unterminated data exceeds the bound.
    ///
    /// Fatal for the connection that produced it.
    #[error("framing overflow: {held} unterminated bytes (limit: {limit})")]
    FramingOverflow {
        /// Bytes that would have been held.
        held: usize,
        /// Maximum bytes the framer may hold.
        limit: usize,
    },

    /// Failed to parse an IRC message.
    #[error("invalid message: {string}")]
    InvalidMessage {
        /// The invalid message string.
        string: String,
        /// The underlying parse error.
        #[source]
        cause: MessageParseError,
    },
}

/// Errors encountered when parsing IRC messages.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum MessageParseError {
    /// Message was empty.
    #[error("empty message")]
    EmptyMessage,

    /// Command was invalid or missing.
    #[error("invalid command")]
    InvalidCommand,

    /// Tags section was not properly terminated.
    #[error("unterminated tags section")]
    UnterminatedTags,

    /// Origin/prefix was not properly terminated.
    #[error("unterminated origin/prefix")]
    UnterminatedOrigin,

    /// Parsing failed with position information.
    #[error("parsing failed at position {position}: {context}")]
    ParseContext {
        /// Byte position where parsing failed.
        position: usize,
        /// Description of what was being parsed.
        context: String,
    },
}
