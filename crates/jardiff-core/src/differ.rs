//! The differ contract
//!
//! Provides [`Differ`], a shareable function from an [`Emitter`] and an
//! [`Element`] to the diffs found there. Differs carry no state; composition
//! is function composition.

use crate::diff::Diff;
use crate::element::Element;
use crate::emitter::Emitter;
use crate::kind::Kind;
use std::fmt;
use std::sync::Arc;

type DiffFn<T> = dyn Fn(&Emitter, &Element<T>) -> Vec<Diff> + Send + Sync;

/// Comparison function over elements of `T`
///
/// Implementations must only mint diffs through the emitter they receive
/// (or emitters derived from it), so that address and kind always follow the
/// caller's context.
pub struct Differ<T> {
    f: Arc<DiffFn<T>>,
}

impl<T> Clone for Differ<T> {
    fn clone(&self) -> Self {
        Self {
            f: Arc::clone(&self.f),
        }
    }
}

impl<T> fmt::Debug for Differ<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Differ")
            .field("type", &std::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}

impl<T: 'static> Differ<T> {
    /// Wrap a comparison function
    #[inline]
    #[must_use]
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Emitter, &Element<T>) -> Vec<Diff> + Send + Sync + 'static,
    {
        Self { f: Arc::new(f) }
    }

    /// Differ that never reports anything
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::new(|_, _| Vec::new())
    }

    /// Run the comparison
    #[inline]
    #[must_use]
    pub fn diff(&self, emitter: &Emitter, element: &Element<T>) -> Vec<Diff> {
        (self.f)(emitter, element)
    }

    /// Run several differs over the same element, in order
    #[must_use]
    pub fn concat<I>(differs: I) -> Self
    where
        I: IntoIterator<Item = Differ<T>>,
    {
        let differs: Vec<_> = differs.into_iter().collect();
        Self::new(move |emitter, element| {
            differs
                .iter()
                .flat_map(|d| d.diff(emitter, element))
                .collect()
        })
    }

    /// Run `self`, then `next`
    #[must_use]
    pub fn and(self, next: Differ<T>) -> Self {
        Self::concat([self, next])
    }

    /// Adapt to a source type `S` by projecting each side
    #[must_use]
    pub fn projecting<S, F>(self, project: F) -> Differ<S>
    where
        S: 'static,
        F: Fn(&S) -> T + Send + Sync + 'static,
    {
        Differ::new(move |emitter, element: &Element<S>| {
            self.diff(emitter, &element.map(&project))
        })
    }

    /// Descend the emitter by one name segment before diffing
    #[must_use]
    pub fn emit_child(self, segment: impl Into<String>) -> Self {
        let segment = segment.into();
        Self::new(move |emitter, element| self.diff(&emitter.for_child(&segment), element))
    }

    /// Narrow the emitter's kind before diffing
    #[must_use]
    pub fn emit_kind(self, suffix: Kind) -> Self {
        Self::new(move |emitter, element| self.diff(&emitter.of_sub_kind(&suffix), element))
    }

    /// Replace the emitter's kind before diffing
    #[must_use]
    pub fn emit_as_kind(self, kind: Kind) -> Self {
        Self::new(move |emitter, element| self.diff(&emitter.of_kind(kind.clone()), element))
    }
}
