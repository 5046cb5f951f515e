//! Diff minting context
//!
//! Provides [`Emitter`], the ambient `(kind, name)` a differ uses to build
//! its diffs. Emitters are values: every navigation returns a new emitter.

use crate::diff::{Diff, Verb};
use crate::element::Element;
use crate::failure::Failure;
use crate::kind::Kind;
use crate::name::Name;
use crate::pair::Pair;

/// Current kind and name for new diffs
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Emitter {
    kind: Kind,
    name: Name,
}

impl Emitter {
    /// Emitter at the root name
    #[inline]
    #[must_use]
    pub fn new(kind: Kind) -> Self {
        Self::at(kind, Name::root())
    }

    /// Emitter at an explicit name
    #[inline]
    #[must_use]
    pub fn at(kind: Kind, name: Name) -> Self {
        Self { kind, name }
    }

    /// Current kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// Current name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Descend one name segment
    #[inline]
    #[must_use]
    pub fn for_child(&self, segment: &str) -> Self {
        self.for_name(self.name.append_segment(segment))
    }

    /// Same kind, different name
    #[inline]
    #[must_use]
    pub fn for_name(&self, name: Name) -> Self {
        Self::at(self.kind.clone(), name)
    }

    /// Same name, narrower kind
    #[inline]
    #[must_use]
    pub fn of_sub_kind(&self, suffix: &Kind) -> Self {
        Self::at(self.kind.sub_kind(suffix), self.name.clone())
    }

    /// Same name, replaced kind
    #[inline]
    #[must_use]
    pub fn of_kind(&self, kind: Kind) -> Self {
        Self::at(kind, self.name.clone())
    }

    /// Emitter positioned at `element`
    ///
    /// An element whose name already lies below this emitter's name is taken
    /// as absolute; any other name is taken as relative to the emitter.
    #[must_use]
    pub fn for_sub_element<V>(&self, element: &Element<V>) -> Self {
        if element.name().starts_with_name(&self.name) {
            self.for_name(element.name().clone())
        } else {
            self.for_name(self.name.append(element.name()))
        }
    }

    /// Diff with the given verb and hints at the current position
    #[inline]
    #[must_use]
    pub fn diff(&self, verb: Verb, hints: Pair<Option<String>>) -> Diff {
        Diff::with_hints(self.name.clone(), self.kind.clone(), verb, hints)
    }

    /// `ADDED` without hint
    #[inline]
    #[must_use]
    pub fn added(&self) -> Diff {
        self.added_with(None)
    }

    /// `ADDED` with an optional hint for the right side
    #[inline]
    #[must_use]
    pub fn added_with(&self, hint: Option<String>) -> Diff {
        self.diff(Verb::Added, Pair::new(None, hint))
    }

    /// `REMOVED` without hint
    #[inline]
    #[must_use]
    pub fn removed(&self) -> Diff {
        self.removed_with(None)
    }

    /// `REMOVED` with an optional hint for the left side
    #[inline]
    #[must_use]
    pub fn removed_with(&self, hint: Option<String>) -> Diff {
        self.diff(Verb::Removed, Pair::new(hint, None))
    }

    /// `CHANGED` without hints
    #[inline]
    #[must_use]
    pub fn changed(&self) -> Diff {
        self.diff(Verb::Changed, Pair::default())
    }

    /// `CHANGED` with hints for both sides
    #[inline]
    #[must_use]
    pub fn changed_with(&self, hints: Pair<Option<String>>) -> Diff {
        self.diff(Verb::Changed, hints)
    }

    /// `ERR_LEFT` hinted by the failure
    #[inline]
    #[must_use]
    pub fn err_left(&self, failure: &Failure) -> Diff {
        self.diff(Verb::ErrLeft, Pair::new(Some(failure.hint()), None))
    }

    /// `ERR_RIGHT` hinted by the failure
    #[inline]
    #[must_use]
    pub fn err_right(&self, failure: &Failure) -> Diff {
        self.diff(Verb::ErrRight, Pair::new(None, Some(failure.hint())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_emitter() -> Emitter {
        Emitter::new(Kind::parse("entry").unwrap())
    }

    #[test]
    fn emitter_for_child_and_sub_kind() {
        let em = entry_emitter()
            .for_child("META-INF")
            .for_child("MANIFEST.MF")
            .of_sub_kind(&Kind::parse("manifest").unwrap());
        assert_eq!(em.name().to_string(), "META-INF/MANIFEST.MF");
        assert_eq!(em.kind().as_str(), "entry.manifest");
    }

    #[test]
    fn emitter_for_sub_element_absolute() {
        let em = entry_emitter().for_child("lib");
        let el = Element::new(Name::parse("lib/a.jar").unwrap(), Pair::both(()));
        assert_eq!(em.for_sub_element(&el).name().to_string(), "lib/a.jar");
    }

    #[test]
    fn emitter_for_sub_element_relative() {
        let em = entry_emitter().for_child("lib");
        let el = Element::new(Name::parse("a.jar").unwrap(), Pair::both(()));
        assert_eq!(em.for_sub_element(&el).name().to_string(), "lib/a.jar");

        let root_el = Element::root(Pair::both(()));
        assert_eq!(em.for_sub_element(&root_el).name().to_string(), "lib");
    }

    #[test]
    fn emitter_mints_hinted_diffs() {
        let em = entry_emitter().for_child("x");
        let added = em.added_with(Some("new".into()));
        assert_eq!(added.verb(), Verb::Added);
        assert_eq!(added.hints(), &Pair::new(None, Some("new".into())));

        let removed = em.removed_with(Some("old".into()));
        assert_eq!(removed.hints(), &Pair::new(Some("old".into()), None));

        assert_eq!(em.changed().hints(), &Pair::default());
    }

    #[test]
    fn emitter_error_hints_from_failure() {
        let em = entry_emitter();
        let failure = Failure::new("broken");
        assert_eq!(em.err_left(&failure).hints().left.as_deref(), Some("broken"));
        assert_eq!(em.err_right(&failure).hints().right.as_deref(), Some("broken"));
    }
}
