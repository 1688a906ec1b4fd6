//! IRC message prefix splitting.
//!
//! A prefix identifies the origin of a message: either a bare source
//! (usually a server name) or a user's `nick!ident@hostname` mask.
//!
//! # Reference
//! - RFC 2812 Section 2.3.1: Message format

/// The components derived from a message prefix.
///
/// A bare source token is exposed as the nick, so `:irc.example.net` and
/// `:alice` both yield `nick == Some(..)` with no ident or hostname.
#[derive(Clone, Eq, PartialEq, Debug, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Prefix {
    /// Nickname, or the whole source for bare prefixes.
    pub nick: Option<String>,
    /// Ident (username) between `!` and `@`.
    pub ident: Option<String>,
    /// Hostname after `@`.
    pub hostname: Option<String>,
}

impl Prefix {
    /// Split a prefix string (without the leading `:`).
    ///
    /// This is a lenient parser: partial masks such as `nick@host` keep
    /// whichever components are present.
    pub fn parse(s: &str) -> Self {
        #[derive(Copy, Clone, Eq, PartialEq)]
        enum Part {
            Name,
            User,
            Host,
        }

        let mut name = String::new();
        let mut user = String::new();
        let mut host = String::new();
        let mut part = Part::Name;

        for c in s.chars() {
            match c {
                '!' if part == Part::Name => part = Part::User,
                '@' if part != Part::Host => part = Part::Host,
                _ => match part {
                    Part::Name => &mut name,
                    Part::User => &mut user,
                    Part::Host => &mut host,
                }
                .push(c),
            }
        }

        let non_empty = |s: String| (!s.is_empty()).then_some(s);
        Prefix {
            nick: non_empty(name),
            ident: non_empty(user),
            hostname: non_empty(host),
        }
    }

    /// Whether this prefix is a full `nick!ident@hostname` mask.
    pub fn is_user_mask(&self) -> bool {
        self.nick.is_some() && self.ident.is_some() && self.hostname.is_some()
    }
}

impl From<&str> for Prefix {
    fn from(s: &str) -> Self {
        Prefix::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_mask() {
        let prefix = Prefix::parse("nick!ident@host.example.com");
        assert_eq!(prefix.nick.as_deref(), Some("nick"));
        assert_eq!(prefix.ident.as_deref(), Some("ident"));
        assert_eq!(prefix.hostname.as_deref(), Some("host.example.com"));
        assert!(prefix.is_user_mask());
    }

    #[test]
    fn test_bare_source_is_nick() {
        let prefix = Prefix::parse("irc.example.net");
        assert_eq!(prefix.nick.as_deref(), Some("irc.example.net"));
        assert_eq!(prefix.ident, None);
        assert_eq!(prefix.hostname, None);
        assert!(!prefix.is_user_mask());
    }

    #[test]
    fn test_nick_at_host() {
        let prefix = Prefix::parse("nick@host");
        assert_eq!(prefix.nick.as_deref(), Some("nick"));
        assert_eq!(prefix.ident, None);
        assert_eq!(prefix.hostname.as_deref(), Some("host"));
    }

    #[test]
    fn test_second_bang_belongs_to_ident() {
        let prefix = Prefix::parse("a!b!c@d");
        assert_eq!(prefix.ident.as_deref(), Some("b!c"));
    }
}
