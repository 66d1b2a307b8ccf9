//! Hierarchical paths, the default leaf payload of a name tree.
//!
//! Text form is `/` for the empty path, otherwise `/segment/segment...`.
//! Segment bytes outside `[A-Za-z0-9_:.#$%-]` are written as `\xHH`.

use std::fmt;
use std::str::FromStr;

use chumsky::prelude::*;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::parser::{Extra, SyntaxError, parse_all};

const LABEL_PUNCTUATION: &str = "_:.#$%-";

fn is_label(character: char) -> bool {
    character.is_ascii_alphanumeric() || LABEL_PUNCTUATION.contains(character)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Empty segments are skipped; they have no text form.
    pub fn new<S: Into<String>>(segments: impl IntoIterator<Item = S>) -> Self {
        Self {
            segments: segments
                .into_iter()
                .map(Into::into)
                .filter(|segment| !segment.is_empty())
                .collect(),
        }
    }

    pub fn read(text: &str) -> Result<Self, SyntaxError> {
        parse_all(path(), text)
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether `prefix` matches this path segment by segment.
    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// The rest of the path after `prefix`, if it is a prefix.
    pub fn strip_prefix(&self, prefix: &Path) -> Option<Path> {
        self.segments
            .strip_prefix(prefix.segments.as_slice())
            .map(|rest| Path { segments: rest.to_vec() })
    }

    pub fn concat(&self, suffix: &Path) -> Path {
        let mut segments = Vec::with_capacity(self.len() + suffix.len());
        segments.extend_from_slice(&self.segments);
        segments.extend_from_slice(&suffix.segments);
        Path { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            f.write_str("/")?;
            for byte in segment.bytes() {
                let character = char::from(byte);
                if byte.is_ascii() && is_label(character) {
                    write!(f, "{character}")?;
                } else {
                    write!(f, "\\x{byte:02x}")?;
                }
            }
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = SyntaxError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::read(text)
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Path {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Path::read(&text).map_err(serde::de::Error::custom)
    }
}

/// Grammar for a single path, usable as the leaf syntax of a tree.
pub fn path<'src>() -> impl Parser<'src, &'src str, Path, Extra<'src>> + Clone {
    let escaped = just("\\x")
        .ignore_then(
            any()
                .filter(char::is_ascii_hexdigit)
                .repeated()
                .exactly(2)
                .to_slice(),
        )
        .try_map(|hex: &str, span| {
            u8::from_str_radix(hex, 16).map_err(|error| Rich::custom(span, error))
        });

    let label = any()
        .filter(|character: &char| is_label(*character))
        .map(|character: char| character as u8);

    let segment = choice((escaped, label))
        .repeated()
        .at_least(1)
        .collect::<Vec<u8>>()
        .try_map(|bytes, span| {
            String::from_utf8(bytes)
                .map_err(|_| Rich::custom(span, "path segment is not valid UTF-8"))
        });

    just('/')
        .ignore_then(segment)
        .repeated()
        .at_least(1)
        .collect::<Vec<String>>()
        .map(|segments| Path { segments })
        .or(just('/').to(Path::empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_path() {
        assert_eq!(Path::read("/").unwrap(), Path::empty());
        assert_eq!(Path::empty().to_string(), "/");
    }

    #[test]
    fn segments_are_split_on_slash() {
        let path = Path::read("/s/srv-1/http:80").unwrap();
        assert_eq!(path.segments(), ["s", "srv-1", "http:80"]);
        assert_eq!(path.to_string(), "/s/srv-1/http:80");
    }

    #[test]
    fn escapes_round_trip() {
        let path = Path::new(["hello world", "é"]);
        let shown = path.to_string();
        assert_eq!(shown, "/hello\\x20world/\\xc3\\xa9");
        assert_eq!(Path::read(&shown).unwrap(), path);
    }

    #[test]
    fn escaped_label_bytes_are_decoded() {
        assert_eq!(Path::read("/\\x61b").unwrap(), Path::new(["ab"]));
    }

    #[test]
    fn malformed_paths_are_rejected() {
        for text in ["", "foo", "/foo/", "/foo//bar", "/a b", "/\\x4", "/\\xff"] {
            assert!(Path::read(text).is_err(), "{text:?} should not parse");
        }
    }

    #[test]
    fn prefix_operations() {
        let path = Path::read("/a/b/c").unwrap();
        let prefix = Path::read("/a/b").unwrap();
        assert!(path.starts_with(&prefix));
        assert!(path.starts_with(&Path::empty()));
        assert!(!prefix.starts_with(&path));
        assert_eq!(path.strip_prefix(&prefix), Some(Path::new(["c"])));
        assert_eq!(path.strip_prefix(&Path::new(["b"])), None);
        assert_eq!(prefix.concat(&Path::new(["x", "y"])), Path::new(["a", "b", "x", "y"]));
    }

    #[test]
    fn new_skips_empty_segments() {
        assert_eq!(Path::new(["a", "", "b"]).len(), 2);
    }

    #[test]
    fn serializes_as_text() {
        let path = Path::new(["a", "b c"]);
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, r#""/a/b\\x20c""#);
        assert_eq!(serde_json::from_str::<Path>(&json).unwrap(), path);
    }
}
