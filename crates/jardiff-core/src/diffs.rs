//! Diff accumulation
//!
//! Provides [`Diffs`], the ordered, deduplicated result of a comparison, and
//! [`DiffsView`], a filtered read-only window onto it.
//!
//! # Identity collisions
//! Diffs are identified by `(name, kind, verb)`. When a diff with an identity
//! already present is inserted, the earlier one is kept with its hints.
//! [`Diffs::merge`] keeps the receiver's entries. [`Diffs::refined_by`] is the
//! one exception: replacement diffs win.

use crate::diff::{Diff, Verb};
use crate::kind::Kind;
use crate::name::Name;
use crate::refinement::Refinement;
use serde::{Deserialize, Serialize};
use std::collections::btree_set;
use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};

/// Ordered, deduplicated set of diffs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diffs {
    diffs: BTreeSet<Diff>,
}

impl Diffs {
    /// Create empty collection
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a diff
    ///
    /// Returns `false` if an equal diff was already present; that one is kept.
    pub fn insert(&mut self, diff: Diff) -> bool {
        self.diffs.insert(diff)
    }

    /// Insert a diff, replacing an equal one
    pub fn replace(&mut self, diff: Diff) -> Option<Diff> {
        self.diffs.replace(diff)
    }

    /// Remove a diff by identity
    pub fn remove(&mut self, diff: &Diff) -> bool {
        self.diffs.remove(diff)
    }

    /// Check if a diff with this identity is present
    #[inline]
    #[must_use]
    pub fn contains(&self, diff: &Diff) -> bool {
        self.diffs.contains(diff)
    }

    /// Stored diff with the same identity, hints included
    #[inline]
    #[must_use]
    pub fn get(&self, diff: &Diff) -> Option<&Diff> {
        self.diffs.get(diff)
    }

    /// Number of diffs
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.diffs.len()
    }

    /// Check if empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diffs.is_empty()
    }

    /// Iterate in `(name, kind, verb)` order
    #[inline]
    pub fn iter(&self) -> btree_set::Iter<'_, Diff> {
        self.diffs.iter()
    }

    /// Combine two partial results
    ///
    /// Folds the smaller collection into the larger one. On identity
    /// collisions the entry from `self` is kept whichever side is larger, so
    /// the identities of the result never depend on argument order.
    #[must_use]
    pub fn merge(mut self, mut other: Diffs) -> Diffs {
        if self.len() >= other.len() {
            for diff in other.diffs {
                self.diffs.insert(diff);
            }
            self
        } else {
            for diff in self.diffs {
                other.diffs.replace(diff);
            }
            other
        }
    }

    /// Apply a refinement
    ///
    /// An empty refinement is the identity. Otherwise every superseded diff is
    /// removed, then the refinement's diffs are added, replacing any equal
    /// survivor.
    #[must_use]
    pub fn refined_by(&self, refinement: &Refinement) -> Diffs {
        if refinement.is_empty() {
            return self.clone();
        }
        let mut refined = self.clone();
        for superseded in refinement.superseded() {
            refined.diffs.remove(superseded);
        }
        for diff in refinement.diffs() {
            refined.diffs.replace(diff.clone());
        }
        refined
    }

    /// Unfiltered view
    #[inline]
    #[must_use]
    pub fn view(&self) -> DiffsView<'_> {
        DiffsView {
            diffs: self,
            filters: Vec::new(),
        }
    }

    /// Diffs matching `predicate`
    #[must_use]
    pub fn filter<F>(&self, predicate: F) -> DiffsView<'_>
    where
        F: Fn(&Diff) -> bool + 'static,
    {
        self.view().filter(predicate)
    }

    /// Diffs whose kind is `kind` or a sub-kind of it
    #[must_use]
    pub fn with_kind(&self, kind: &Kind) -> DiffsView<'_> {
        self.view().with_kind(kind)
    }

    /// Diffs of exactly `kind`
    #[must_use]
    pub fn with_exact_kind(&self, kind: &Kind) -> DiffsView<'_> {
        self.view().with_exact_kind(kind)
    }

    /// Diffs at `name` or below it
    #[must_use]
    pub fn with_name(&self, name: &Name) -> DiffsView<'_> {
        self.view().with_name(name)
    }

    /// Diffs exactly at `name`
    #[must_use]
    pub fn with_exact_name(&self, name: &Name) -> DiffsView<'_> {
        self.view().with_exact_name(name)
    }

    /// Diffs with one of `verbs`
    #[must_use]
    pub fn with_verbs(&self, verbs: &[Verb]) -> DiffsView<'_> {
        self.view().with_verbs(verbs)
    }
}

impl FromIterator<Diff> for Diffs {
    fn from_iter<I: IntoIterator<Item = Diff>>(iter: I) -> Self {
        let mut diffs = Self::new();
        diffs.extend(iter);
        diffs
    }
}

impl Extend<Diff> for Diffs {
    fn extend<I: IntoIterator<Item = Diff>>(&mut self, iter: I) {
        for diff in iter {
            self.diffs.insert(diff);
        }
    }
}

impl IntoIterator for Diffs {
    type Item = Diff;
    type IntoIter = btree_set::IntoIter<Diff>;

    fn into_iter(self) -> Self::IntoIter {
        self.diffs.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diffs {
    type Item = &'a Diff;
    type IntoIter = btree_set::Iter<'a, Diff>;

    fn into_iter(self) -> Self::IntoIter {
        self.diffs.iter()
    }
}

impl Display for Diffs {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_joined(f, self.iter())
    }
}

fn write_joined<'a>(f: &mut Formatter<'_>, diffs: impl Iterator<Item = &'a Diff>) -> fmt::Result {
    for (i, diff) in diffs.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{diff}")?;
    }
    Ok(())
}

type DiffPredicate = Box<dyn Fn(&Diff) -> bool>;

/// Filtered read-only window onto a [`Diffs`]
///
/// Filters compose by conjunction and are evaluated lazily on iteration;
/// nothing is copied.
pub struct DiffsView<'a> {
    diffs: &'a Diffs,
    filters: Vec<DiffPredicate>,
}

impl<'a> DiffsView<'a> {
    /// Narrow by an arbitrary predicate
    #[must_use]
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Diff) -> bool + 'static,
    {
        self.filters.push(Box::new(predicate));
        self
    }

    /// Narrow to `kind` and its sub-kinds
    #[must_use]
    pub fn with_kind(self, kind: &Kind) -> Self {
        let kind = kind.clone();
        self.filter(move |d| d.kind().is_sub_kind_of(&kind))
    }

    /// Narrow to exactly `kind`
    #[must_use]
    pub fn with_exact_kind(self, kind: &Kind) -> Self {
        let kind = kind.clone();
        self.filter(move |d| *d.kind() == kind)
    }

    /// Narrow to `name` and its descendants
    #[must_use]
    pub fn with_name(self, name: &Name) -> Self {
        let name = name.clone();
        self.filter(move |d| d.name().starts_with_name(&name))
    }

    /// Narrow to exactly `name`
    #[must_use]
    pub fn with_exact_name(self, name: &Name) -> Self {
        let name = name.clone();
        self.filter(move |d| *d.name() == name)
    }

    /// Narrow to the given verbs
    #[must_use]
    pub fn with_verbs(self, verbs: &[Verb]) -> Self {
        let verbs = verbs.to_vec();
        self.filter(move |d| verbs.contains(&d.verb()))
    }

    /// Iterate matching diffs in order
    pub fn iter(&self) -> impl Iterator<Item = &'a Diff> + '_ {
        self.diffs
            .iter()
            .filter(move |d| self.filters.iter().all(|f| f(d)))
    }

    /// Number of matching diffs
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Check if nothing matches
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Copy the matching diffs out
    #[must_use]
    pub fn to_diffs(&self) -> Diffs {
        self.iter().cloned().collect()
    }
}

impl fmt::Debug for DiffsView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl Display for DiffsView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_joined(f, self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pair::Pair;

    fn diff(name: &str, kind: &str, verb: Verb) -> Diff {
        Diff::new(Name::parse(name).unwrap(), Kind::parse(kind).unwrap(), verb)
    }

    fn hinted(name: &str, hint: &str) -> Diff {
        Diff::with_hints(
            Name::parse(name).unwrap(),
            Kind::parse("entry").unwrap(),
            Verb::Changed,
            Pair::new(Some(hint.to_string()), None),
        )
    }

    fn left_hint(diffs: &Diffs, probe: &Diff) -> Option<String> {
        diffs.get(probe).and_then(|d| d.hints().left.clone())
    }

    #[test]
    fn diffs_dedup_first_insert_wins() {
        let mut diffs = Diffs::new();
        assert!(diffs.insert(hinted("a", "first")));
        assert!(!diffs.insert(hinted("a", "second")));
        assert_eq!(diffs.len(), 1);
        assert_eq!(left_hint(&diffs, &hinted("a", "")).as_deref(), Some("first"));
    }

    #[test]
    fn diffs_merge_left_biased_both_ways() {
        let small: Diffs = [hinted("a", "small")].into_iter().collect();
        let large: Diffs = [hinted("a", "large"), hinted("b", "large")]
            .into_iter()
            .collect();

        let merged = small.clone().merge(large.clone());
        assert_eq!(merged.len(), 2);
        assert_eq!(left_hint(&merged, &hinted("a", "")).as_deref(), Some("small"));

        let merged = large.merge(small);
        assert_eq!(left_hint(&merged, &hinted("a", "")).as_deref(), Some("large"));
    }

    #[test]
    fn diffs_refined_by_empty_is_identity() {
        let diffs: Diffs = [diff("a", "entry", Verb::Changed)].into_iter().collect();
        assert_eq!(diffs.refined_by(&Refinement::empty()), diffs);
    }

    #[test]
    fn diffs_refined_by_replaces() {
        let coarse = diff("META-INF/MANIFEST.MF", "entry", Verb::Changed);
        let other = diff("a.class", "entry", Verb::Changed);
        let diffs: Diffs = [coarse.clone(), other.clone()].into_iter().collect();

        let fine = diff("META-INF/MANIFEST.MF/Class-Path", "entry.manifest.attribute", Verb::Changed);
        let refinement = Refinement::new([coarse.clone()], [fine.clone()].into_iter().collect());
        let refined = diffs.refined_by(&refinement);

        assert!(!refined.contains(&coarse));
        assert!(refined.contains(&fine));
        assert!(refined.contains(&other));
    }

    #[test]
    fn diffs_refined_by_replacement_hints_win() {
        let diffs: Diffs = [hinted("a", "old")].into_iter().collect();
        let refinement = Refinement::new(Vec::new(), [hinted("a", "new")].into_iter().collect());
        let refined = diffs.refined_by(&refinement);
        assert_eq!(left_hint(&refined, &hinted("a", "")).as_deref(), Some("new"));
    }

    #[test]
    fn diffs_views_filter_without_copy() {
        let diffs: Diffs = [
            diff("a", "entry", Verb::Added),
            diff("a/x", "entry.manifest", Verb::Changed),
            diff("b", "entry.time", Verb::Changed),
            diff("ab", "entry", Verb::Removed),
        ]
        .into_iter()
        .collect();
        let entry = Kind::parse("entry").unwrap();
        let a = Name::parse("a").unwrap();

        assert_eq!(diffs.with_kind(&entry).len(), 4);
        assert_eq!(diffs.with_exact_kind(&entry).len(), 2);
        assert_eq!(diffs.with_name(&a).len(), 2);
        assert_eq!(diffs.with_exact_name(&a).len(), 1);
        assert_eq!(diffs.with_verbs(&[Verb::Changed]).len(), 2);
        assert_eq!(
            diffs
                .with_kind(&entry)
                .with_verbs(&[Verb::Changed])
                .with_name(&a)
                .to_string(),
            "a/x entry.manifest CHANGED (-, -)"
        );
    }

    #[test]
    fn diffs_display_comma_joined() {
        let diffs: Diffs = [diff("b", "entry", Verb::Added), diff("a", "entry", Verb::Removed)]
            .into_iter()
            .collect();
        assert_eq!(diffs.to_string(), "a entry REMOVED (-, -), b entry ADDED (-, -)");
        assert_eq!(Diffs::new().to_string(), "");
    }

    #[test]
    fn diffs_serialize_as_list() {
        let diffs: Diffs = [diff("a", "entry", Verb::Added)].into_iter().collect();
        let json = serde_json::to_value(&diffs).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["verb"], "ADDED");
        assert_eq!(json[0]["name"], "a");
        assert_eq!(json[0]["kind"], "entry");
    }
}
