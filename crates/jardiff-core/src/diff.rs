//! Diff records
//!
//! Provides [`Diff`], one finding at one address, and [`Verb`], its outcome.

use crate::kind::Kind;
use crate::name::Name;
use crate::pair::Pair;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};

/// Outcome category of a diff
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verb {
    /// Present only on the right
    Added,

    /// Present only on the left
    Removed,

    /// Present on both sides with different values
    Changed,

    /// Left side could not be evaluated
    ErrLeft,

    /// Right side could not be evaluated
    ErrRight,
}

impl Verb {
    /// All verbs in declaration order
    pub const ALL: [Verb; 5] = [
        Verb::Added,
        Verb::Removed,
        Verb::Changed,
        Verb::ErrLeft,
        Verb::ErrRight,
    ];

    /// Check if the verb reports an evaluation failure
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::ErrLeft | Self::ErrRight)
    }

    /// Upper-case label
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "ADDED",
            Self::Removed => "REMOVED",
            Self::Changed => "CHANGED",
            Self::ErrLeft => "ERR_LEFT",
            Self::ErrRight => "ERR_RIGHT",
        }
    }
}

impl Display for Verb {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One difference between left and right
///
/// # Identity
/// Equality, hashing and ordering use `(name, kind, verb)` only. Hints are
/// presentation data: two diffs that differ only in hints are the same
/// finding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diff {
    name: Name,
    kind: Kind,
    verb: Verb,
    hints: Pair<Option<String>>,
}

impl Diff {
    /// Create diff without hints
    #[inline]
    #[must_use]
    pub fn new(name: Name, kind: Kind, verb: Verb) -> Self {
        Self::with_hints(name, kind, verb, Pair::default())
    }

    /// Create diff with hints
    #[inline]
    #[must_use]
    pub fn with_hints(name: Name, kind: Kind, verb: Verb, hints: Pair<Option<String>>) -> Self {
        Self {
            name,
            kind,
            verb,
            hints,
        }
    }

    /// Address
    #[inline]
    #[must_use]
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Category
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// Outcome
    #[inline]
    #[must_use]
    pub fn verb(&self) -> Verb {
        self.verb
    }

    /// Presentation hints for each side
    #[inline]
    #[must_use]
    pub fn hints(&self) -> &Pair<Option<String>> {
        &self.hints
    }

    fn identity(&self) -> (&Name, &Kind, Verb) {
        (&self.name, &self.kind, self.verb)
    }
}

impl PartialEq for Diff {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Diff {}

impl Hash for Diff {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl Ord for Diff {
    fn cmp(&self, other: &Self) -> Ordering {
        self.identity().cmp(&other.identity())
    }
}

impl PartialOrd for Diff {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Diff {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let hint = |h: &Option<String>| h.clone().unwrap_or_else(|| "-".to_string());
        write!(
            f,
            "{} {} {} ({}, {})",
            self.name,
            self.kind,
            self.verb,
            hint(&self.hints.left),
            hint(&self.hints.right)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn diff(name: &str, kind: &str, verb: Verb) -> Diff {
        Diff::new(Name::parse(name).unwrap(), Kind::parse(kind).unwrap(), verb)
    }

    #[test]
    fn diff_identity_ignores_hints() {
        let plain = diff("a", "entry", Verb::Changed);
        let hinted = Diff::with_hints(
            plain.name().clone(),
            plain.kind().clone(),
            Verb::Changed,
            Pair::new(Some("x".into()), Some("y".into())),
        );
        assert_eq!(plain, hinted);

        let set: HashSet<_> = [plain, hinted].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn diff_ordering_name_kind_verb() {
        let mut diffs = vec![
            diff("b", "entry", Verb::Added),
            diff("a", "entry.time", Verb::Added),
            diff("a", "entry", Verb::Removed),
            diff("a", "entry", Verb::Added),
        ];
        diffs.sort();
        let rendered: Vec<_> = diffs
            .iter()
            .map(|d| format!("{}:{}:{}", d.name(), d.kind(), d.verb()))
            .collect();
        assert_eq!(
            rendered,
            vec![
                "a:entry:ADDED",
                "a:entry:REMOVED",
                "a:entry.time:ADDED",
                "b:entry:ADDED"
            ]
        );
    }

    #[test]
    fn diff_display_four_fields() {
        let d = Diff::with_hints(
            Name::parse("META-INF/MANIFEST.MF/Class-Path").unwrap(),
            Kind::parse("entry.manifest.attribute").unwrap(),
            Verb::Changed,
            Pair::new(Some(".".into()), Some(".,foo".into())),
        );
        assert_eq!(
            d.to_string(),
            "META-INF/MANIFEST.MF/Class-Path entry.manifest.attribute CHANGED (., .,foo)"
        );
        assert_eq!(
            diff("x", "entry", Verb::Added).to_string(),
            "x entry ADDED (-, -)"
        );
    }

    #[test]
    fn verb_serde_screaming_snake() {
        assert_eq!(serde_json::to_string(&Verb::ErrLeft).unwrap(), "\"ERR_LEFT\"");
        assert!(Verb::ErrRight.is_error());
        assert!(!Verb::Changed.is_error());
    }
}
