//! Union-based set comparison
//!
//! Provides [`SetDiffer`]: for each member of the union of both sides,
//! `ADDED` if only on the right, `REMOVED` if only on the left, and an
//! intersection callback if on both.

use crate::diff::Diff;
use crate::differ::Differ;
use crate::differs::Hinter;
use crate::emitter::Emitter;
use crate::pair::Pair;
use indexmap::IndexSet;
use std::collections::BTreeSet;
use std::fmt::{self, Display};
use std::hash::Hash;
use std::sync::Arc;

/// Requirements on set members
pub trait Member: Clone + Eq + Hash + Send + Sync + 'static {}

impl<T> Member for T where T: Clone + Eq + Hash + Send + Sync + 'static {}

/// Container that accumulates the union of both sides
///
/// Its iteration order is the order in which members are reported.
pub trait UnionSet<T>: Send {
    /// Add a member; duplicates are ignored
    fn insert_member(&mut self, member: T);

    /// Members in report order
    fn into_members(self: Box<Self>) -> Vec<T>;
}

impl<T: Ord + Send> UnionSet<T> for BTreeSet<T> {
    fn insert_member(&mut self, member: T) {
        self.insert(member);
    }

    fn into_members(self: Box<Self>) -> Vec<T> {
        self.into_iter().collect()
    }
}

impl<T: Hash + Eq + Send> UnionSet<T> for IndexSet<T> {
    fn insert_member(&mut self, member: T) {
        self.insert(member);
    }

    fn into_members(self: Box<Self>) -> Vec<T> {
        self.into_iter().collect()
    }
}

/// Factory for a fresh union container
pub type UnionSupplier<T> = Arc<dyn Fn() -> Box<dyn UnionSet<T>> + Send + Sync>;

/// Emitter for one member, derived from the set's emitter
pub type Projection<T> = Arc<dyn Fn(&Emitter, &T) -> Emitter + Send + Sync>;

/// Callback for members present on both sides
pub type Intersection<T> = Arc<dyn Fn(&Emitter, &T) -> Vec<Diff> + Send + Sync>;

/// Sorted union (the default)
#[must_use]
pub fn sorted_union<T: Ord + Send + 'static>() -> UnionSupplier<T> {
    Arc::new(|| Box::new(BTreeSet::new()) as Box<dyn UnionSet<T>>)
}

/// Union in first-seen order, left side first
#[must_use]
pub fn insertion_ordered_union<T: Hash + Eq + Send + 'static>() -> UnionSupplier<T> {
    Arc::new(|| Box::new(IndexSet::new()) as Box<dyn UnionSet<T>>)
}

/// Child segment named after the member's display form
#[must_use]
pub fn child_by_display<T: Display>() -> Projection<T> {
    Arc::new(|emitter: &Emitter, member: &T| emitter.for_child(&member.to_string()))
}

/// Parameterised set-union comparison
///
/// # Defaults
/// - projection: child segment from the member's `Display`
/// - union: sorted
/// - hinter: none
/// - intersection: no diff
pub struct SetDiffer<T> {
    projection: Projection<T>,
    union: UnionSupplier<T>,
    hinter: Option<Hinter<T>>,
    intersection: Intersection<T>,
}

impl<T> Clone for SetDiffer<T> {
    fn clone(&self) -> Self {
        Self {
            projection: Arc::clone(&self.projection),
            union: Arc::clone(&self.union),
            hinter: self.hinter.clone(),
            intersection: Arc::clone(&self.intersection),
        }
    }
}

impl<T> fmt::Debug for SetDiffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetDiffer")
            .field("member", &std::any::type_name::<T>())
            .field("hinted", &self.hinter.is_some())
            .finish_non_exhaustive()
    }
}

impl<T: Member + Ord + Display> Default for SetDiffer<T> {
    fn default() -> Self {
        Self::new(child_by_display(), sorted_union())
    }
}

impl<T: Member> SetDiffer<T> {
    /// Create with explicit projection and union container
    #[must_use]
    pub fn new(projection: Projection<T>, union: UnionSupplier<T>) -> Self {
        Self {
            projection,
            union,
            hinter: None,
            intersection: Arc::new(|_: &Emitter, _: &T| Vec::new()),
        }
    }

    /// Replace the member projection
    #[must_use]
    pub fn with_projection<F>(mut self, projection: F) -> Self
    where
        F: Fn(&Emitter, &T) -> Emitter + Send + Sync + 'static,
    {
        self.projection = Arc::new(projection);
        self
    }

    /// Replace the union container
    #[must_use]
    pub fn with_union(mut self, union: UnionSupplier<T>) -> Self {
        self.union = union;
        self
    }

    /// Hint `ADDED` / `REMOVED` diffs with the member
    #[must_use]
    pub fn with_hinter(mut self, hinter: Hinter<T>) -> Self {
        self.hinter = Some(hinter);
        self
    }

    /// Compare members present on both sides
    #[must_use]
    pub fn with_intersection<F>(mut self, intersection: F) -> Self
    where
        F: Fn(&Emitter, &T) -> Vec<Diff> + Send + Sync + 'static,
    {
        self.intersection = Arc::new(intersection);
        self
    }

    /// Member hinter, if any
    #[inline]
    #[must_use]
    pub fn hinter(&self) -> Option<&Hinter<T>> {
        self.hinter.as_ref()
    }

    /// Compare two collections
    pub fn diff<C>(&self, emitter: &Emitter, values: Pair<&C>) -> Vec<Diff>
    where
        for<'a> &'a C: IntoIterator<Item = &'a T>,
    {
        let hint: &dyn Fn(&T) -> Option<String> = &|member: &T| self.hint(member);
        self.diff_members(emitter, values, Pair::new(hint, hint), &*self.intersection)
    }

    /// Core union walk
    ///
    /// `hints.left` hints `REMOVED` members, `hints.right` hints `ADDED`
    /// members; `intersection` replaces the configured callback.
    pub fn diff_members<'a, I>(
        &self,
        emitter: &Emitter,
        members: Pair<I>,
        hints: Pair<&dyn Fn(&T) -> Option<String>>,
        intersection: &dyn Fn(&Emitter, &T) -> Vec<Diff>,
    ) -> Vec<Diff>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let Pair { left, right } = members;
        let left: IndexSet<&T> = left.into_iter().collect();
        let right: IndexSet<&T> = right.into_iter().collect();

        let mut union = (self.union)();
        for member in left.iter().chain(right.iter()) {
            union.insert_member((*member).clone());
        }

        let mut diffs = Vec::new();
        for member in union.into_members() {
            let member_emitter = (self.projection)(emitter, &member);
            match (left.contains(&member), right.contains(&member)) {
                (false, true) => diffs.push(member_emitter.added_with((hints.right)(&member))),
                (true, false) => diffs.push(member_emitter.removed_with((hints.left)(&member))),
                (true, true) => diffs.extend(intersection(&member_emitter, &member)),
                (false, false) => {}
            }
        }
        diffs
    }

    fn hint(&self, member: &T) -> Option<String> {
        self.hinter.as_ref().and_then(|h| h(member))
    }

    /// Wrap as a [`Differ`] over collections of `T`
    #[must_use]
    pub fn into_differ<C>(self) -> Differ<C>
    where
        C: 'static,
        for<'a> &'a C: IntoIterator<Item = &'a T>,
    {
        Differ::new(move |emitter, element| self.diff(emitter, element.values().as_ref()))
    }
}
