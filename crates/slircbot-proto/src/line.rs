//! Line framing for IRC byte streams.
//!
//! [`LineFramer`] turns arbitrarily chunked socket reads into decoded,
//! newline-terminated lines while holding at most one partial line between
//! reads. [`LineCodec`] is the write-side counterpart for tokio.

#[cfg(feature = "tokio")]
use std::borrow::Cow;

use bytes::BytesMut;
use encoding::Encoding;

use crate::error::{self, ProtocolError};

/// Maximum number of unterminated bytes the framer will hold.
///
/// Large enough for two maximum-size (512 byte) protocol lines.
pub const MAX_HELD_LINE_LEN: usize = 1024;

fn lookup_encoding(label: &str) -> error::Result<&'static Encoding> {
    Encoding::for_label(label.as_bytes())
        .ok_or_else(|| ProtocolError::UnknownEncoding(label.to_owned()))
}

/// Reassembles protocol lines out of raw byte chunks.
///
/// Lines never straddle calls in the output: a line split across two chunks
/// is emitted once, from the call that delivers its terminator.
#[derive(Debug)]
pub struct LineFramer {
    encoding: &'static Encoding,
    /// Bytes after the last terminator seen so far.
    held: BytesMut,
    max_held: usize,
}

impl LineFramer {
    /// Create a framer decoding lines with the encoding named by `label`.
    ///
    /// # Arguments
    /// * `label` - Encoding label (e.g., "utf-8", "iso-8859-1")
    pub fn new(label: &str) -> error::Result<Self> {
        Self::with_max_held(label, MAX_HELD_LINE_LEN)
    }

    /// Create a framer with a custom hold bound.
    pub fn with_max_held(label: &str, max_held: usize) -> error::Result<Self> {
        Ok(Self {
            encoding: lookup_encoding(label)?,
            held: BytesMut::new(),
            max_held,
        })
    }

    /// Number of bytes currently held as a partial line.
    pub fn held_len(&self) -> usize {
        self.held.len()
    }

    /// Drop any held partial line.
    pub fn clear(&mut self) {
        self.held.clear();
    }

    /// Consume one chunk and return every line it completes, in order.
    ///
    /// Returns [`ProtocolError::FramingOverflow`] without extracting any
    /// line when the bytes left unterminated after this chunk would exceed
    /// the hold bound. The held partial line is discarded in that case.
    pub fn feed(&mut self, chunk: &[u8]) -> error::Result<Vec<String>> {
        let tail_start = chunk
            .iter()
            .rposition(|b| *b == b'\n')
            .map_or(0, |pos| pos + 1);

        let would_hold = if tail_start == 0 {
            self.held.len() + chunk.len()
        } else {
            chunk.len() - tail_start
        };
        if would_hold > self.max_held {
            self.held.clear();
            return Err(ProtocolError::FramingOverflow {
                held: would_hold,
                limit: self.max_held,
            });
        }

        let mut lines = Vec::new();
        let mut start = 0;
        while let Some(offset) = chunk[start..tail_start].iter().position(|b| *b == b'\n') {
            let end = start + offset + 1;
            let segment = &chunk[start..end];
            let line = if self.held.is_empty() {
                self.decode(segment)
            } else {
                self.held.extend_from_slice(segment);
                let joined = self.held.split();
                self.decode(&joined)
            };
            lines.push(line);
            start = end;
        }

        self.held.extend_from_slice(&chunk[tail_start..]);
        Ok(lines)
    }

    fn decode(&self, raw: &[u8]) -> String {
        let mut end = raw.len();
        if end > 0 && raw[end - 1] == b'\n' {
            end -= 1;
        }
        while end > 0 && raw[end - 1] == b'\r' {
            end -= 1;
        }
        let (text, _had_errors) = self.encoding.decode_without_bom_handling(&raw[..end]);
        text.into_owned()
    }
}

/// Write-side codec: encodes one line and terminates it with CR-LF.
#[cfg(feature = "tokio")]
#[derive(Debug, Clone)]
pub struct LineCodec {
    encoding: &'static Encoding,
}

#[cfg(feature = "tokio")]
impl LineCodec {
    /// Create a codec encoding lines with the encoding named by `label`.
    pub fn new(label: &str) -> error::Result<Self> {
        Ok(Self {
            encoding: lookup_encoding(label)?,
        })
    }

    /// Truncate outgoing data at its first line break.
    ///
    /// A line handed to the transport must never smuggle a second command.
    pub fn sanitize(data: &str) -> &str {
        match data.find(['\r', '\n']) {
            Some(pos) => &data[..pos],
            None => data,
        }
    }
}

#[cfg(feature = "tokio")]
impl tokio_util::codec::Encoder<String> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, line: String, dst: &mut BytesMut) -> error::Result<()> {
        let line = Self::sanitize(&line);
        let (bytes, _enc, _had_errors) = self.encoding.encode(line);
        match bytes {
            Cow::Borrowed(b) => dst.extend_from_slice(b),
            Cow::Owned(v) => dst.extend_from_slice(&v),
        }
        dst.extend_from_slice(b"\r\n");
        Ok(())
    }
}
