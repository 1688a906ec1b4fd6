//! Nom-based IRC line parser.
//!
//! Each production of the line grammar is its own parser so it can be
//! tested (and fuzzed) in isolation:
//!
//! ```text
//! line        := [tags-part] [prefix-part] command [params-part]
//! tags-part   := "@" tag ("=" value)? (";" tag ("=" value)?)* " "
//! prefix-part := ":" (nick "!" ident "@" hostname | source) " "
//! command     := 1*letter / 3digit
//! params-part := (" " middle-param)* (" :" trailing-param)?
//! ```

use nom::{
    bytes::complete::{take_till, take_till1, take_while1},
    character::complete::char,
    combinator::opt,
    error::{Error, ErrorKind},
    sequence::{preceded, terminated},
    IResult,
};
use smallvec::SmallVec;

use crate::error::MessageParseError;

fn spaces(input: &str) -> IResult<&str, &str> {
    take_while1(|c| c == ' ')(input)
}

/// Parse the tags part: everything between `@` and the first space.
pub(crate) fn parse_tags(input: &str) -> IResult<&str, &str> {
    terminated(preceded(char('@'), take_till(|c| c == ' ')), spaces)(input)
}

/// Parse the prefix part: everything between `:` and the first space.
pub(crate) fn parse_prefix(input: &str) -> IResult<&str, &str> {
    terminated(preceded(char(':'), take_till1(|c| c == ' ')), spaces)(input)
}

/// Parse the command name (1*letter or 3digit).
pub(crate) fn parse_command(input: &str) -> IResult<&str, &str> {
    let (rest, cmd) = take_while1(|c: char| c.is_ascii_alphanumeric())(input)?;

    let is_all_letters = cmd.chars().all(|c| c.is_ascii_alphabetic());
    let is_three_digits = cmd.len() == 3 && cmd.chars().all(|c| c.is_ascii_digit());

    if is_all_letters || is_three_digits {
        Ok((rest, cmd))
    } else {
        Err(nom::Err::Error(Error::new(input, ErrorKind::AlphaNumeric)))
    }
}

/// Parse the parameters following the command.
///
/// Runs of spaces separate parameters. A parameter starting with `:` is the
/// trailing parameter and runs to the end of the line, spaces included.
pub(crate) fn parse_params(input: &str) -> IResult<&str, SmallVec<[&str; 15]>> {
    let mut params: SmallVec<[&str; 15]> = SmallVec::new();
    let mut rest = input;

    loop {
        let trimmed = rest.trim_start_matches(' ');
        if trimmed.is_empty() {
            return Ok((trimmed, params));
        }
        if trimmed.len() == rest.len() {
            return Err(nom::Err::Error(Error::new(rest, ErrorKind::Space)));
        }
        rest = trimmed;

        if let Some(trailing) = rest.strip_prefix(':') {
            params.push(trailing);
            return Ok(("", params));
        }

        let end = rest.find(' ').unwrap_or(rest.len());
        params.push(&rest[..end]);
        rest = &rest[end..];
    }
}

/// Parse a complete line (without its terminator) into borrowed parts.
pub(crate) fn parse_message(input: &str) -> IResult<&str, RawMessage<'_>> {
    let (input, tags) = opt(parse_tags)(input)?;
    let (input, prefix) = opt(parse_prefix)(input)?;
    let (input, command) = parse_command(input)?;
    let (rest, params) = parse_params(input)?;

    Ok((
        rest,
        RawMessage {
            tags,
            prefix,
            command,
            params,
        },
    ))
}

/// A parsed line holding slices of the input.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawMessage<'a> {
    /// Raw tags string (without the leading `@`), if present.
    pub tags: Option<&'a str>,
    /// Raw prefix string (without the leading `:`), if present.
    pub prefix: Option<&'a str>,
    /// The command name.
    pub command: &'a str,
    /// Command parameters, including trailing.
    pub params: SmallVec<[&'a str; 15]>,
}

impl<'a> RawMessage<'a> {
    /// Parse a line, mapping nom failures to [`MessageParseError`].
    pub fn parse(input: &'a str) -> Result<Self, MessageParseError> {
        if input.is_empty() {
            return Err(MessageParseError::EmptyMessage);
        }

        match parse_message(input) {
            Ok((_rest, msg)) => Ok(msg),
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
                Err(classify(input, e.input, e.code))
            }
            Err(nom::Err::Incomplete(_)) => Err(MessageParseError::ParseContext {
                position: input.len(),
                context: "unexpected end of line".to_string(),
            }),
        }
    }
}

fn classify(input: &str, remaining: &str, kind: ErrorKind) -> MessageParseError {
    let position = input.len() - remaining.len();
    match kind {
        ErrorKind::Space => MessageParseError::ParseContext {
            position,
            context: "expected space before parameter".to_string(),
        },
        _ if remaining.starts_with('@') => MessageParseError::UnterminatedTags,
        _ if remaining.starts_with(':') => MessageParseError::UnterminatedOrigin,
        _ => MessageParseError::InvalidCommand,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags_production() {
        assert_eq!(
            parse_tags("@a=1;b PING"),
            Ok(("PING", "a=1;b"))
        );
        assert!(parse_tags("@a=1;b").is_err());
        assert!(parse_tags("PING").is_err());
    }

    #[test]
    fn test_parse_prefix_production() {
        assert_eq!(
            parse_prefix(":nick!user@host PRIVMSG"),
            Ok(("PRIVMSG", "nick!user@host"))
        );
        assert!(parse_prefix(": PRIVMSG").is_err());
        assert!(parse_prefix(":server").is_err());
    }

    #[test]
    fn test_parse_command_production() {
        assert_eq!(parse_command("PING :x"), Ok((" :x", "PING")));
        assert_eq!(parse_command("001 nick"), Ok((" nick", "001")));
        assert!(parse_command("01 nick").is_err());
        assert!(parse_command("PR1VMSG").is_err());
        assert!(parse_command(" PING").is_err());
    }

    #[test]
    fn test_parse_params_middle_and_trailing() {
        let (_, params) = parse_params(" p1 p2 :trailing with spaces").unwrap();
        assert_eq!(params.as_slice(), &["p1", "p2", "trailing with spaces"]);
    }

    #[test]
    fn test_parse_params_collapses_spaces() {
        let (_, params) = parse_params("   a    b  ").unwrap();
        assert_eq!(params.as_slice(), &["a", "b"]);
    }

    #[test]
    fn test_parse_params_empty_trailing() {
        let (_, params) = parse_params(" #chan :").unwrap();
        assert_eq!(params.as_slice(), &["#chan", ""]);
    }

    #[test]
    fn test_parse_params_colon_inside_middle() {
        let (_, params) = parse_params(" a:b :c").unwrap();
        assert_eq!(params.as_slice(), &["a:b", "c"]);
    }

    #[test]
    fn test_parse_params_requires_separator() {
        assert!(parse_params(":abc").is_err());
    }

    #[test]
    fn test_parse_message_all_parts() {
        let (rest, msg) =
            parse_message("@tag=val :nick!ident@host COMMAND p1 p2 :trailing with spaces").unwrap();
        assert_eq!(rest, "");
        assert_eq!(msg.tags, Some("tag=val"));
        assert_eq!(msg.prefix, Some("nick!ident@host"));
        assert_eq!(msg.command, "COMMAND");
        assert_eq!(msg.params.len(), 3);
    }

    #[test]
    fn test_classify_errors() {
        assert_eq!(
            RawMessage::parse("@only-tags"),
            Err(MessageParseError::UnterminatedTags)
        );
        assert_eq!(
            RawMessage::parse(":only.prefix"),
            Err(MessageParseError::UnterminatedOrigin)
        );
        assert_eq!(
            RawMessage::parse("12345 x"),
            Err(MessageParseError::InvalidCommand)
        );
        assert!(matches!(
            RawMessage::parse("PING:abc"),
            Err(MessageParseError::ParseContext { position: 4, .. })
        ));
        assert_eq!(RawMessage::parse(""), Err(MessageParseError::EmptyMessage));
    }
}
