//! Hierarchical names for addressing diffs
//!
//! Provides [`Name`], a bracket-escaping path used to locate every comparable
//! unit inside the two sides being compared.

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

/// Separator between name segments
pub const SEPARATOR: char = '/';

const OPEN: char = '{';
const CLOSE: char = '}';
const ESCAPE: char = '\\';

/// Address of a comparable unit
///
/// An ordered chain of segments; the empty chain is the root ([`Name::root`]).
/// A segment that contains [`SEPARATOR`] is stored wrapped in `{...}` so that
/// it stays one segment when the name is printed and parsed again. A `\`
/// makes the next character literal, so segments may carry unbalanced
/// brackets.
///
/// # Examples
/// - `META-INF/MANIFEST.MF` → `["META-INF", "MANIFEST.MF"]`
/// - `a/{b/c}/d` → `["a", "{b/c}", "d"]`
/// - `a\{b/c` → `["a\{b", "c"]`
///
/// # Ordering
/// Shorter names sort before longer ones; names of equal depth compare
/// segment by segment from the root.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Name(Arc<[String]>);

impl Name {
    /// Empty name (root)
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(Arc::from(Vec::new()))
    }

    /// Parse a name, honouring `{...}` brackets
    ///
    /// # Errors
    /// - [`NameError::UnexpectedClose`] for a `}` with no matching `{`
    /// - [`NameError::UnterminatedBracket`] for a `{` that is never closed
    /// - [`NameError::EmptySegment`] for `//`, or a leading/trailing separator
    /// - [`NameError::DanglingEscape`] for a `\` at the end of the input
    pub fn parse(input: &str) -> Result<Self, NameError> {
        if input.is_empty() {
            return Ok(Self::root());
        }

        let mut segments = Vec::new();
        let mut depth = 0usize;
        let mut opened_at = 0usize;
        let mut start = 0usize;
        let mut escaped_at = None;

        for (offset, c) in input.char_indices() {
            if escaped_at.take().is_some() {
                continue;
            }
            match c {
                ESCAPE => escaped_at = Some(offset),
                OPEN => {
                    if depth == 0 {
                        opened_at = offset;
                    }
                    depth += 1;
                }
                CLOSE => {
                    if depth == 0 {
                        return Err(NameError::UnexpectedClose {
                            input: input.to_string(),
                            offset,
                        });
                    }
                    depth -= 1;
                }
                SEPARATOR if depth == 0 => {
                    segments.push(Self::checked_segment(input, start, offset)?);
                    start = offset + SEPARATOR.len_utf8();
                }
                _ => {}
            }
        }

        if let Some(offset) = escaped_at {
            return Err(NameError::DanglingEscape {
                input: input.to_string(),
                offset,
            });
        }
        if depth > 0 {
            return Err(NameError::UnterminatedBracket {
                input: input.to_string(),
                offset: opened_at,
            });
        }
        segments.push(Self::checked_segment(input, start, input.len())?);

        Ok(Self(segments.into()))
    }

    fn checked_segment(input: &str, start: usize, end: usize) -> Result<String, NameError> {
        if start == end {
            return Err(NameError::EmptySegment {
                input: input.to_string(),
                offset: start,
            });
        }
        Ok(input[start..end].to_string())
    }

    /// Name made of a single segment, bracketed when needed
    #[inline]
    #[must_use]
    pub fn single(segment: &str) -> Self {
        Self::root().append_segment(segment)
    }

    /// Raw segments from root to leaf
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Check if this is the root name
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Parent name; the root has none
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        match self.0.split_last() {
            Some((_, parent)) => Some(Self(parent.into())),
            None => None,
        }
    }

    /// Last raw segment (if not root)
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Append all segments of `other`
    #[must_use]
    pub fn append(&self, other: &Name) -> Self {
        if other.is_root() {
            return self.clone();
        }
        if self.is_root() {
            return other.clone();
        }
        self.0.iter().chain(other.0.iter()).cloned().collect()
    }

    /// Append one literal segment
    ///
    /// Brackets and escapes in `segment` are escaped, and a segment that
    /// contains a separator is wrapped in brackets. The stored segment parses
    /// back as exactly one segment, and distinct inputs stay distinct. An
    /// empty segment leaves the name unchanged.
    #[must_use]
    pub fn append_segment(&self, segment: &str) -> Self {
        if segment.is_empty() {
            return self.clone();
        }
        self.0
            .iter()
            .cloned()
            .chain(std::iter::once(encode_segment(segment)))
            .collect()
    }

    /// Check if `prefix` is this name or one of its ancestors
    #[inline]
    #[must_use]
    pub fn starts_with_name(&self, prefix: &Name) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Check if this name ends with all segments of `suffix`
    #[inline]
    #[must_use]
    pub fn ends_with_name(&self, suffix: &Name) -> bool {
        self.0.ends_with(&suffix.0)
    }

    /// Segments of `self` below `ancestor`, if `ancestor` is a prefix
    #[must_use]
    pub fn strip_prefix(&self, ancestor: &Name) -> Option<Self> {
        self.0.strip_prefix(&*ancestor.0).map(|rest| Self(rest.into()))
    }
}

fn encode_segment(segment: &str) -> String {
    let mut encoded = String::with_capacity(segment.len() + 2);
    if segment.contains(SEPARATOR) {
        encoded.push(OPEN);
    }
    for c in segment.chars() {
        if matches!(c, OPEN | CLOSE | ESCAPE) {
            encoded.push(ESCAPE);
        }
        encoded.push(c);
    }
    if segment.contains(SEPARATOR) {
        encoded.push(CLOSE);
    }
    encoded
}

impl Default for Name {
    fn default() -> Self {
        Self::root()
    }
}

impl Ord for Name {
    fn cmp(&self, other: &Self) -> Ordering {
        self.depth()
            .cmp(&other.depth())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Name {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "{SEPARATOR}")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Name({:?})", self.to_string())
    }
}

impl FromStr for Name {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Name {
    type Error = NameError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl FromIterator<String> for Name {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl serde::Serialize for Name {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Name {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Errors raised while parsing a [`Name`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    /// `{` without a matching `}`
    #[error("unterminated bracket at offset {offset} in '{input}'")]
    UnterminatedBracket {
        /// Offending input
        input: String,
        /// Byte offset of the opening bracket
        offset: usize,
    },

    /// `}` without a preceding `{`
    #[error("unexpected closing bracket at offset {offset} in '{input}'")]
    UnexpectedClose {
        /// Offending input
        input: String,
        /// Byte offset of the closing bracket
        offset: usize,
    },

    /// Two separators in a row, or a separator at either end
    #[error("empty segment at offset {offset} in '{input}'")]
    EmptySegment {
        /// Offending input
        input: String,
        /// Byte offset where the empty segment starts
        offset: usize,
    },

    /// `\` with no character after it
    #[error("dangling escape at offset {offset} in '{input}'")]
    DanglingEscape {
        /// Offending input
        input: String,
        /// Byte offset of the escape
        offset: usize,
    },
}

impl NameError {
    /// Byte offset of the problem within the input
    #[inline]
    #[must_use]
    pub fn offset(&self) -> usize {
        match self {
            Self::UnterminatedBracket { offset, .. }
            | Self::UnexpectedClose { offset, .. }
            | Self::EmptySegment { offset, .. }
            | Self::DanglingEscape { offset, .. } => *offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> Name {
        Name::parse(s).unwrap()
    }

    #[test]
    fn name_root() {
        let root = Name::root();
        assert!(root.is_root());
        assert_eq!(root.depth(), 0);
        assert_eq!(root.to_string(), "");
        assert_eq!(root, Name::default());
        assert!(root.parent().is_none());
    }

    #[test]
    fn name_parse_segments() {
        let n = name("META-INF/MANIFEST.MF");
        assert_eq!(n.segments(), &["META-INF", "MANIFEST.MF"]);
        assert_eq!(n.depth(), 2);
    }

    #[test]
    fn name_parse_brackets_keep_one_segment() {
        let n = name("a/{b/c}/d");
        assert_eq!(n.segments(), &["a", "{b/c}", "d"]);
    }

    #[test]
    fn name_parse_nested_brackets() {
        let n = name("{a/{b/c}}/d");
        assert_eq!(n.segments(), &["{a/{b/c}}", "d"]);
    }

    #[test]
    fn name_parse_unterminated() {
        let err = Name::parse("a/{b/c").unwrap_err();
        assert!(matches!(err, NameError::UnterminatedBracket { offset: 2, .. }));
    }

    #[test]
    fn name_parse_unexpected_close() {
        let err = Name::parse("a/b}").unwrap_err();
        assert!(matches!(err, NameError::UnexpectedClose { offset: 3, .. }));
        assert_eq!(err.offset(), 3);
    }

    #[test]
    fn name_parse_empty_segment() {
        assert!(matches!(
            Name::parse("a//b"),
            Err(NameError::EmptySegment { offset: 2, .. })
        ));
        assert!(matches!(
            Name::parse("/a"),
            Err(NameError::EmptySegment { offset: 0, .. })
        ));
        assert!(matches!(
            Name::parse("a/"),
            Err(NameError::EmptySegment { offset: 2, .. })
        ));
    }

    #[test]
    fn name_error_carries_input() {
        let err = Name::parse("x}").unwrap_err();
        assert!(err.to_string().contains("'x}'"));
    }

    #[test]
    fn name_append_segment_brackets_separator() {
        let n = name("META-INF/MANIFEST.MF").append_segment("com/acme/Foo.class");
        assert_eq!(n.last(), Some("{com/acme/Foo.class}"));
        assert_eq!(n.to_string(), "META-INF/MANIFEST.MF/{com/acme/Foo.class}");
        assert_eq!(Name::parse(&n.to_string()).unwrap(), n);
    }

    #[test]
    fn name_append_segment_unbalanced_brackets_reparse() {
        let n = Name::root().append_segment("a}/b");
        assert_eq!(n.to_string(), "{a\\}/b}");
        assert_eq!(Name::parse(&n.to_string()).unwrap(), n);

        let open = name("lib").append_segment("a{b");
        assert_eq!(open.last(), Some("a\\{b"));
        assert_eq!(Name::parse(&open.to_string()).unwrap(), open);
    }

    #[test]
    fn name_append_segment_distinct_inputs_stay_distinct() {
        assert_ne!(Name::single("a//b"), Name::single("{a//b}"));
        assert_ne!(Name::single("{x}"), Name::single("x"));
        assert_ne!(Name::single("a\\"), Name::single("a"));
    }

    #[test]
    fn name_parse_escapes() {
        let n = name("a\\{b/c");
        assert_eq!(n.segments(), &["a\\{b", "c"]);
        assert!(matches!(
            Name::parse("a\\"),
            Err(NameError::DanglingEscape { offset: 1, .. })
        ));
    }

    #[test]
    fn name_append_segment_plain() {
        let n = name("META-INF/MANIFEST.MF").append_segment("Class-Path");
        assert_eq!(n.to_string(), "META-INF/MANIFEST.MF/Class-Path");
    }

    #[test]
    fn name_append_empty_segment_is_noop() {
        let n = name("a/b");
        assert_eq!(n.append_segment(""), n);
    }

    #[test]
    fn name_append() {
        let n = name("a/b").append(&name("c/d"));
        assert_eq!(n.segments(), &["a", "b", "c", "d"]);
        assert_eq!(Name::root().append(&name("x")), name("x"));
        assert_eq!(name("x").append(&Name::root()), name("x"));
    }

    #[test]
    fn name_parent_and_last() {
        let n = name("a/b/c");
        assert_eq!(n.parent(), Some(name("a/b")));
        assert_eq!(n.last(), Some("c"));
        assert_eq!(name("a").parent(), Some(Name::root()));
    }

    #[test]
    fn name_starts_and_ends_with() {
        let n = name("a/b/c");
        assert!(n.starts_with_name(&name("a/b")));
        assert!(n.starts_with_name(&n));
        assert!(n.starts_with_name(&Name::root()));
        assert!(!n.starts_with_name(&name("a/c")));
        assert!(n.ends_with_name(&name("b/c")));
        assert!(!n.ends_with_name(&name("a/b")));
    }

    #[test]
    fn name_strip_prefix() {
        let n = name("a/b/c");
        assert_eq!(n.strip_prefix(&name("a")), Some(name("b/c")));
        assert_eq!(n.strip_prefix(&name("x")), None);
    }

    #[test]
    fn name_ordering_prefix_first() {
        assert!(name("a") < name("a/b"));
        assert!(Name::root() < name("a"));
    }

    #[test]
    fn name_ordering_same_depth_by_segments() {
        assert!(name("a/b") < name("a/c"));
        assert!(name("a/z") < name("b/a"));
    }

    #[test]
    fn name_ordering_shallower_first() {
        // parent chains are compared first, so depth dominates
        assert!(name("z") < name("a/b"));
    }

    #[test]
    fn name_serde_as_string() {
        let n = name("a/{b/c}");
        let json = serde_json::to_string(&n).unwrap();
        assert_eq!(json, "\"a/{b/c}\"");
        let back: Name = serde_json::from_str(&json).unwrap();
        assert_eq!(back, n);
        assert!(serde_json::from_str::<Name>("\"a/{\"").is_err());
    }
}
