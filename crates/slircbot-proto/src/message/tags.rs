//! IRCv3 message tag splitting.

/// A single message tag.
///
/// A tag written without `=` carries an empty value.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tag {
    /// Tag key, including any vendor prefix or `+` client marker.
    pub key: String,
    /// Tag value, verbatim.
    pub value: String,
}

impl Tag {
    /// Create a tag from a key and value.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Split a raw tags string (without the leading `@`) into ordered tags.
///
/// Tags are separated by `;`; each tag splits on its first `=`.
pub(crate) fn parse_tags_string(tags_str: &str) -> Vec<Tag> {
    tags_str
        .split(';')
        .filter(|s| !s.is_empty())
        .map(|tag| match tag.split_once('=') {
            Some((key, value)) => Tag::new(key, value),
            None => Tag::new(tag, ""),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_on_first_equals() {
        let tags = parse_tags_string("a=1;b=x=y;c");
        assert_eq!(
            tags,
            vec![Tag::new("a", "1"), Tag::new("b", "x=y"), Tag::new("c", "")]
        );
    }

    #[test]
    fn test_empty_segments_are_skipped() {
        assert_eq!(parse_tags_string(";;a=1;"), vec![Tag::new("a", "1")]);
        assert!(parse_tags_string("").is_empty());
    }

    #[test]
    fn test_values_are_not_unescaped() {
        let tags = parse_tags_string("k=with\\sspace");
        assert_eq!(tags[0].value, "with\\sspace");
    }
}
