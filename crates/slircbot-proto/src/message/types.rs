use std::fmt;
use std::str::FromStr;

use crate::error::{MessageParseError, ProtocolError};
use crate::prefix::Prefix;

use super::nom_parser::RawMessage;
use super::tags::{parse_tags_string, Tag};

/// One inbound IRC line in structured form.
///
/// Produced by the parser and never mutated afterwards; all accessors
/// borrow.
///
/// # Example
///
/// ```
/// use slircbot_proto::ParsedMessage;
///
/// let msg: ParsedMessage = ":nick!ident@host PRIVMSG #channel :Hello there".parse().unwrap();
/// assert_eq!(msg.command(), "PRIVMSG");
/// assert_eq!(msg.nick(), Some("nick"));
/// assert_eq!(msg.params(), ["#channel", "Hello there"]);
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParsedMessage {
    tags: Vec<Tag>,
    prefix: Option<String>,
    source: Prefix,
    command: String,
    params: Vec<String>,
}

impl ParsedMessage {
    /// Parse one line. A trailing CR-LF, if present, is ignored.
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let trimmed = line.trim_end_matches(['\r', '\n']);
        let invalid = |cause: MessageParseError| ProtocolError::InvalidMessage {
            string: line.to_owned(),
            cause,
        };

        let raw = RawMessage::parse(trimmed).map_err(invalid)?;

        Ok(ParsedMessage {
            tags: raw.tags.map(parse_tags_string).unwrap_or_default(),
            prefix: raw.prefix.map(str::to_owned),
            source: raw.prefix.map(Prefix::parse).unwrap_or_default(),
            command: raw.command.to_owned(),
            params: raw.params.iter().map(|p| (*p).to_owned()).collect(),
        })
    }

    /// Tags in the order they appeared.
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Value of the first tag named `key`.
    pub fn tag_value(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|tag| tag.key == key)
            .map(|tag| tag.value.as_str())
    }

    /// The raw prefix, without its leading `:`.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Nickname from the prefix, or the bare source.
    pub fn nick(&self) -> Option<&str> {
        self.source.nick.as_deref()
    }

    /// Ident from a `nick!ident@host` prefix.
    pub fn ident(&self) -> Option<&str> {
        self.source.ident.as_deref()
    }

    /// Hostname from a `nick!ident@host` prefix.
    pub fn hostname(&self) -> Option<&str> {
        self.source.hostname.as_deref()
    }

    /// The command name or three-digit numeric, as sent.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// All parameters, trailing included.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Parameter at `index`.
    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }

    /// The numeric code, for three-digit replies.
    pub fn numeric(&self) -> Option<u16> {
        if self.command.len() == 3 {
            self.command.parse().ok()
        } else {
            None
        }
    }
}

impl FromStr for ParsedMessage {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParsedMessage::parse(s)
    }
}

impl fmt::Display for ParsedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.tags.is_empty() {
            f.write_str("@")?;
            for (i, tag) in self.tags.iter().enumerate() {
                if i > 0 {
                    f.write_str(";")?;
                }
                f.write_str(&tag.key)?;
                if !tag.value.is_empty() {
                    write!(f, "={}", tag.value)?;
                }
            }
            f.write_str(" ")?;
        }
        if let Some(prefix) = &self.prefix {
            write!(f, ":{prefix} ")?;
        }
        f.write_str(&self.command)?;
        if let Some((last, middle)) = self.params.split_last() {
            for param in middle {
                write!(f, " {param}")?;
            }
            if last.is_empty() || last.contains(' ') || last.starts_with(':') {
                write!(f, " :{last}")?;
            } else {
                write!(f, " {last}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_line() {
        let msg: ParsedMessage = "@tag=val :nick!ident@host COMMAND p1 p2 :trailing with spaces"
            .parse()
            .unwrap();

        assert_eq!(msg.tags(), &[Tag::new("tag", "val")]);
        assert_eq!(msg.prefix(), Some("nick!ident@host"));
        assert_eq!(msg.nick(), Some("nick"));
        assert_eq!(msg.ident(), Some("ident"));
        assert_eq!(msg.hostname(), Some("host"));
        assert_eq!(msg.command(), "COMMAND");
        assert_eq!(msg.params(), ["p1", "p2", "trailing with spaces"]);
    }

    #[test]
    fn test_parse_simple_ping() {
        let msg: ParsedMessage = "PING :abc\r\n".parse().unwrap();
        assert_eq!(msg.command(), "PING");
        assert_eq!(msg.params(), ["abc"]);
        assert!(msg.tags().is_empty());
        assert_eq!(msg.prefix(), None);
    }

    #[test]
    fn test_bare_source_prefix_is_nick() {
        let msg: ParsedMessage = ":irc.example.net 001 bot :Welcome".parse().unwrap();
        assert_eq!(msg.prefix(), Some("irc.example.net"));
        assert_eq!(msg.nick(), Some("irc.example.net"));
        assert_eq!(msg.ident(), None);
        assert_eq!(msg.numeric(), Some(1));
    }

    #[test]
    fn test_tag_without_value() {
        let msg: ParsedMessage = "@draft/bot;time=now PING x".parse().unwrap();
        assert_eq!(msg.tag_value("draft/bot"), Some(""));
        assert_eq!(msg.tag_value("time"), Some("now"));
        assert_eq!(msg.tag_value("missing"), None);
    }

    #[test]
    fn test_malformed_lines() {
        for line in ["", "@tags-only", ":prefix-only", "12 x", "PING:abc"] {
            assert!(
                matches!(
                    line.parse::<ParsedMessage>(),
                    Err(ProtocolError::InvalidMessage { .. })
                ),
                "expected {line:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_display_round_trip() {
        let line = "@a=1;b :n!u@h PRIVMSG #c :hello world";
        let msg: ParsedMessage = line.parse().unwrap();
        assert_eq!(msg.to_string(), line);
    }

    #[test]
    fn test_param_accessor() {
        let msg: ParsedMessage = "JOIN #rust".parse().unwrap();
        assert_eq!(msg.param(0), Some("#rust"));
        assert_eq!(msg.param(1), None);
        assert_eq!(msg.numeric(), None);
    }
}
