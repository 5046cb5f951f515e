//! Dotted categories for diffs
//!
//! Provides [`Kind`], a hierarchical tag such as `entry.manifest.attribute`.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

const DOT: char = '.';

/// Hierarchical diff category
///
/// Stored with a trailing `.` so that sub-kind checks are plain prefix tests
/// (`entry.` is a prefix of `entry.manifest.` but not of `entrypoint.`).
///
/// Each segment must start with an ASCII letter or `_`, followed by ASCII
/// letters, digits, `_` or `-`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Kind(Arc<str>);

impl Kind {
    /// Parse a dotted kind
    ///
    /// # Errors
    /// - [`KindError::Empty`] for an empty string
    /// - [`KindError::InvalidSegment`] with the offset of the first bad character
    pub fn parse(input: &str) -> Result<Self, KindError> {
        if input.is_empty() {
            return Err(KindError::Empty);
        }

        let mut segment_start = true;
        for (offset, c) in input.char_indices() {
            let valid = if c == DOT {
                // a dot may only close a non-empty segment
                !segment_start
            } else if segment_start {
                c.is_ascii_alphabetic() || c == '_'
            } else {
                c.is_ascii_alphanumeric() || c == '_' || c == '-'
            };
            if !valid {
                return Err(KindError::InvalidSegment {
                    input: input.to_string(),
                    offset,
                });
            }
            segment_start = c == DOT;
        }
        if segment_start {
            return Err(KindError::InvalidSegment {
                input: input.to_string(),
                offset: input.len(),
            });
        }

        Ok(Self(format!("{input}{DOT}").into()))
    }

    /// Kind with `suffix` appended
    #[must_use]
    pub fn sub_kind(&self, suffix: &Kind) -> Self {
        Self(format!("{}{}", self.0, suffix.0).into())
    }

    /// Parse `suffix` and append it
    ///
    /// # Errors
    /// Returns error if `suffix` is not a valid kind
    pub fn child(&self, suffix: &str) -> Result<Self, KindError> {
        Kind::parse(suffix).map(|suffix| self.sub_kind(&suffix))
    }

    /// Check if this kind equals `other` or lies below it
    #[inline]
    #[must_use]
    pub fn is_sub_kind_of(&self, other: &Kind) -> bool {
        self.0.starts_with(&*other.0)
    }

    /// Dotted form without the trailing separator
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0[..self.0.len() - DOT.len_utf8()]
    }

    /// Number of dotted segments
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.matches(DOT).count()
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Kind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Kind({:?})", self.as_str())
    }
}

impl FromStr for Kind {
    type Err = KindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Kind {
    type Error = KindError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl serde::Serialize for Kind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for Kind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Errors raised while parsing a [`Kind`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KindError {
    /// Empty input
    #[error("kind must not be empty")]
    Empty,

    /// Character outside the identifier grammar
    #[error("invalid kind '{input}' at offset {offset}")]
    InvalidSegment {
        /// Offending input
        input: String,
        /// Byte offset of the first invalid character
        offset: usize,
    },
}
